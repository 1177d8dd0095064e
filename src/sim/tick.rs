//! Per-frame simulation step
//!
//! Advances the game state by exactly one frame. Order inside a running
//! frame: pause countdown, effect expiry, collisions, terminal check, motion.

use rand::Rng;

use super::collision;
use super::effects::{self, EffectKind};
use super::rect::Rect;
use super::state::{Banner, Brick, GameEvent, GamePhase, GameState};
use crate::palette;

/// Advance the game state by one frame
pub fn tick(state: &mut GameState) {
    // Menu, complexity prompt and terminal phases don't simulate
    if !state.is_running() {
        return;
    }

    state.time_ticks += 1;

    if state.bricks.is_empty() {
        win(state);
        return;
    }

    let arena_width = state.settings.screen_width;

    // Spawn grace: only the paddle moves
    if state.pause_frames > 0 {
        state.pause_frames -= 1;
        state.paddle.advance(arena_width);
        return;
    }

    if state.phase == GamePhase::Countdown {
        state.set_phase(GamePhase::Playing);
    }

    let now = state.time_ticks;
    effects::tick(state, now);

    collision::resolve(state);

    if state.phase == GamePhase::Lost {
        return;
    }
    if state.bricks.is_empty() {
        win(state);
        return;
    }

    state.ball.advance();
    state.paddle.advance(arena_width);
}

fn win(state: &mut GameState) {
    log::info!("All bricks destroyed, score {}", state.score);
    state.set_phase(GamePhase::Won);
    state.events.push(GameEvent::Banner(Banner::Win));
}

/// Lay out the brick grid, centered horizontally, rolling a power-up per brick
pub fn generate_bricks(state: &mut GameState) {
    let settings = &state.settings;
    let (w, h, gap) = (settings.brick_width, settings.brick_height, settings.brick_gap);
    let rows = settings.row_count;
    let roll_max = settings.effect_roll_max;
    let offset_y = settings.brick_offset_y;

    let per_row = (settings.screen_width / (w + gap)).floor().max(0.0) as u32;
    let offset_x = ((settings.screen_width - per_row as f32 * (w + gap)) / 2.0).floor();

    let mut powered = 0;
    for row in 0..rows {
        for col in 0..per_row {
            let roll = state.rng().random_range(0..=roll_max) as usize;
            let effect = EffectKind::ALL.get(roll).copied();
            if effect.is_some() {
                powered += 1;
            }

            let brick = Brick {
                id: state.next_entity_id(),
                bounds: Rect::new(
                    offset_x + col as f32 * (w + gap),
                    offset_y + row as f32 * (h + gap),
                    w,
                    h,
                ),
                color: effect.map_or(palette::BRICK, EffectKind::color),
                effect,
            };
            state.bricks.push(brick);
        }
    }

    log::info!(
        "Generated {} bricks ({} with power-ups)",
        state.bricks.len(),
        powered
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Complexity, Settings};
    use crate::sim::state::{BallTint, Direction};
    use glam::Vec2;

    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(Settings::default(), seed);
        state.start_session(Complexity::default());
        state
    }

    fn drop_through_floor(state: &mut GameState) {
        state.pause_frames = 0;
        state.ball.pos = Vec2::new(250.0, 410.0);
        tick(state);
    }

    #[test]
    fn test_menu_does_not_tick() {
        let mut state = GameState::new(Settings::default(), 1);
        let ball = state.ball.clone();
        tick(&mut state);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.ball, ball);
    }

    #[test]
    fn test_countdown_freezes_ball_but_not_paddle() {
        let mut state = started(1);
        let ball_pos = state.ball.pos;
        let paddle_x = state.paddle.bounds.x;
        state.paddle.set_intent(Direction::Right, true);

        let pause = state.pause_frames;
        for _ in 0..pause {
            tick(&mut state);
            assert_eq!(state.phase, GamePhase::Countdown);
        }
        assert_eq!(state.ball.pos, ball_pos);
        assert!(state.paddle.bounds.x > paddle_x);

        tick(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.ball.pos, ball_pos + state.ball.vel);
    }

    #[test]
    fn test_grid_layout() {
        let state = GameState::new(Settings::default(), 1);
        assert_eq!(state.bricks.len(), 24);
        assert_eq!(state.bricks[0].bounds, Rect::new(6.0, 30.0, 60.0, 20.0));
        assert_eq!(state.bricks[9].bounds, Rect::new(67.0, 51.0, 60.0, 20.0));
        for brick in &state.bricks {
            let expected = brick.effect.map_or(palette::BRICK, EffectKind::color);
            assert_eq!(brick.color, expected);
        }
    }

    #[test]
    fn test_effect_draws_cover_every_kind() {
        let settings = Settings {
            row_count: 40,
            ..Settings::default()
        };
        let state = GameState::new(settings, 2024);
        for kind in EffectKind::ALL {
            assert!(state.bricks.iter().any(|b| b.effect == Some(kind)));
        }
        // Most bricks are plain (7 of 11 draws)
        let plain = state.bricks.iter().filter(|b| b.effect.is_none()).count();
        assert!(plain * 2 > state.bricks.len());
    }

    #[test]
    fn test_win_with_lives_left() {
        let mut state = started(3);
        state.pause_frames = 0;
        state.bricks.truncate(1);
        let brick = state.bricks[0].bounds;
        state.bricks[0].effect = None;
        // Just under the last brick, moving up
        state.ball.pos = Vec2::new(brick.center().x, brick.bottom() + 6.0);
        state.ball.vel = Vec2::new(0.0, -20.0);
        tick(&mut state);
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.lives, 3);
        assert!(state.drain_events().contains(&GameEvent::Banner(Banner::Win)));
    }

    #[test]
    fn test_lost_with_bricks_left_stops_updates() {
        let mut state = started(4);
        state.lives = 1;
        let paddle_x = state.paddle.bounds.x;
        state.paddle.set_intent(Direction::Left, true);
        drop_through_floor(&mut state);
        assert_eq!(state.phase, GamePhase::Lost);
        assert!(!state.bricks.is_empty());
        assert_eq!(state.paddle.bounds.x, paddle_x);

        let ball = state.ball.clone();
        let ticks = state.time_ticks;
        tick(&mut state);
        assert_eq!(state.ball, ball);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_three_drops_from_playing_to_lost() {
        let mut state = started(5);
        assert_eq!(state.ball.vel.y, 20.0);
        assert_eq!(state.paddle.speed, 6.0);

        // Run the countdown out so the game is properly playing
        while state.phase == GamePhase::Countdown {
            tick(&mut state);
        }
        state.score = 7;

        drop_through_floor(&mut state);
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        drop_through_floor(&mut state);
        assert_eq!(state.lives, 1);
        drop_through_floor(&mut state);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::Lost);
        assert_eq!(state.score, 7);

        let phases: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::PhaseChanged { from, to } => Some((from, to)),
                _ => None,
            })
            .collect();
        assert_eq!(phases.last(), Some(&(GamePhase::Playing, GamePhase::Lost)));
    }

    #[test]
    fn test_effect_expires_during_play() {
        let mut state = started(6);
        state.pause_frames = 0;
        effects::activate(&mut state, EffectKind::TripleScore);
        let duration = state.settings.effect_duration_frames();
        // Keep the ball bouncing in the middle of nowhere
        for _ in 0..duration {
            state.ball.pos = Vec2::new(250.0, 200.0);
            tick(&mut state);
        }
        assert!(state.active_effect.is_none());
        assert_eq!(state.points_per_brick, 1);
    }

    #[test]
    fn test_tint_resets_each_frame() {
        let mut state = started(8);
        state.pause_frames = 0;
        state.ball.tint = BallTint::WallHit;
        state.ball.pos = Vec2::new(250.0, 200.0);
        tick(&mut state);
        assert_eq!(state.ball.tint, BallTint::Idle);
    }

    #[test]
    fn test_determinism() {
        let mut a = started(99999);
        let mut b = started(99999);
        for i in 0..600 {
            let dir = if (i / 50) % 2 == 0 {
                Direction::Left
            } else {
                Direction::Right
            };
            a.paddle.toggle_intent(dir);
            b.paddle.toggle_intent(dir);
            tick(&mut a);
            tick(&mut b);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.ball, b.ball);
        assert_eq!(a.score, b.score);
        assert_eq!(a.bricks.len(), b.bricks.len());
    }
}
