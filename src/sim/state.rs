//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{ActiveEffect, EffectKind};
use super::rect::Rect;
use crate::consts::SPAWN_DRIFT;
use crate::palette::{self, Rgba};
use crate::settings::{Complexity, Settings, Tuning};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Main menu, waiting for play/bot/quit
    Menu,
    /// Play was chosen, waiting for the complexity answer
    AwaitingComplexity,
    /// "GET READY!" shown, ball frozen until the first pause runs out
    Countdown,
    /// Active gameplay
    Playing,
    /// Every brick destroyed
    Won,
    /// Out of lives
    Lost,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Horizontal paddle direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// Which edge of a rectangle the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Ball display tint, recomputed every frame from the collision outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallTint {
    #[default]
    Idle,
    PaddleHit,
    WallHit,
    BrickHit,
}

impl BallTint {
    pub fn color(self) -> Rgba {
        match self {
            BallTint::Idle => palette::BALL_IDLE,
            BallTint::PaddleHit => palette::BALL_PADDLE_HIT,
            BallTint::WallHit | BallTint::BrickHit => palette::BALL_WALL_HIT,
        }
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub radius: f32,
    pub tint: BallTint,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius,
            tint: BallTint::Idle,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::around(self.pos, self.radius)
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub bounds: Rect,
    /// Pixels per frame
    pub speed: f32,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Paddle {
    pub fn new(bounds: Rect, speed: f32) -> Self {
        Self {
            bounds,
            speed,
            moving_left: false,
            moving_right: false,
        }
    }

    pub fn set_intent(&mut self, direction: Direction, active: bool) {
        match direction {
            Direction::Left => self.moving_left = active,
            Direction::Right => self.moving_right = active,
        }
    }

    pub fn toggle_intent(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.moving_left = !self.moving_left,
            Direction::Right => self.moving_right = !self.moving_right,
        }
    }

    /// Net horizontal intent: -1, 0 or +1. Opposing intents cancel out.
    pub fn heading(&self) -> f32 {
        f32::from(u8::from(self.moving_right)) - f32::from(u8::from(self.moving_left))
    }

    /// Move by `speed * heading`, staying inside `0..=arena_width`
    pub fn advance(&mut self, arena_width: f32) {
        let max_x = (arena_width - self.bounds.w).max(0.0);
        self.bounds.x = (self.bounds.x + self.speed * self.heading()).clamp(0.0, max_x);
    }
}

/// A brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub bounds: Rect,
    pub color: Rgba,
    /// Power-up granted when destroyed
    pub effect: Option<EffectKind>,
}

/// Centered on-screen messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Banner {
    GetReady,
    Win,
    GameOver,
}

impl Banner {
    pub fn text(self) -> &'static str {
        use crate::consts::*;
        match self {
            Banner::GetReady => GET_READY_TEXT,
            Banner::Win => WIN_TEXT,
            Banner::GameOver => GAME_OVER_TEXT,
        }
    }
}

/// Things that happened during a tick, for sound/message/log dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PaddleHit { edge: Edge },
    WallHit,
    BrickDestroyed { id: u32, edge: Edge, points: u64 },
    LifeLost { remaining: u32 },
    EffectStarted(EffectKind),
    EffectEnded(EffectKind),
    PhaseChanged { from: GamePhase, to: GamePhase },
    Banner(Banner),
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub settings: Settings,
    /// Session speeds (base speeds until a complexity is chosen)
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub points_per_brick: u64,
    /// Frames left before the ball may move
    pub pause_frames: u32,
    /// Simulation frame counter, also the effect clock
    pub time_ticks: u64,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Live bricks, in grid order
    pub bricks: Vec<Brick>,
    pub active_effect: Option<ActiveEffect>,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game in the menu phase
    pub fn new(settings: Settings, seed: u64) -> Self {
        let tuning = settings.tuning(Complexity::default());
        let paddle = Paddle::new(
            Rect::new(
                ((settings.screen_width - settings.paddle_width) / 2.0).floor(),
                settings.screen_height - settings.paddle_height * 2.0,
                settings.paddle_width,
                settings.paddle_height,
            ),
            tuning.paddle_speed,
        );
        let ball = Ball::new(Self::arena_center(&settings), settings.ball_radius, Vec2::ZERO);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            lives: settings.initial_lives,
            settings,
            tuning,
            phase: GamePhase::Menu,
            score: 0,
            points_per_brick: 1,
            pause_frames: 0,
            time_ticks: 0,
            paddle,
            ball,
            bricks: Vec::new(),
            active_effect: None,
            events: Vec::new(),
            next_id: 1,
        };

        super::tick::generate_bricks(&mut state);
        state.spawn_ball();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn arena(&self) -> Rect {
        Rect::new(0.0, 0.0, self.settings.screen_width, self.settings.screen_height)
    }

    fn arena_center(settings: &Settings) -> Vec2 {
        Vec2::new(
            (settings.screen_width / 2.0).floor(),
            (settings.screen_height / 2.0).floor(),
        )
    }

    /// Countdown or playing
    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Countdown | GamePhase::Playing)
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// The session has started but the ball has not been released yet
    pub fn awaiting_start(&self) -> bool {
        self.phase == GamePhase::Countdown
    }

    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Menu "play" choice. Returns false outside the menu.
    pub fn select_play(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            return false;
        }
        self.set_phase(GamePhase::AwaitingComplexity);
        true
    }

    /// Apply the complexity, respawn the ball at session speed and start the countdown
    pub fn start_session(&mut self, complexity: Complexity) {
        self.tuning = self.settings.tuning(complexity);
        self.paddle.speed = self.tuning.paddle_speed;
        log::info!(
            "Session start: complexity={} ball_speed={} paddle_speed={}",
            complexity,
            self.tuning.ball_speed,
            self.tuning.paddle_speed
        );
        self.spawn_ball();
        self.set_phase(GamePhase::Countdown);
        self.events.push(GameEvent::Banner(Banner::GetReady));
    }

    /// Replace the ball with a fresh one at the arena center and restart the pause
    pub fn spawn_ball(&mut self) {
        let drift = self.rng.random_range(-SPAWN_DRIFT..=SPAWN_DRIFT) as f32;
        self.ball = Ball::new(
            Self::arena_center(&self.settings),
            self.settings.ball_radius,
            Vec2::new(drift, self.tuning.ball_speed),
        );
        self.pause_frames = self.settings.pause_frames();
    }

    /// The ball fell through the floor
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost {
            remaining: self.lives,
        });
        if self.lives == 0 {
            self.set_phase(GamePhase::Lost);
            self.events.push(GameEvent::Banner(Banner::GameOver));
        } else {
            log::debug!("Life lost, {} remaining", self.lives);
            self.spawn_ball();
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_layout() {
        let state = GameState::new(Settings::default(), 42);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.lives, 3);
        assert_eq!(state.points_per_brick, 1);
        assert_eq!(state.paddle.bounds, Rect::new(195.0, 300.0, 110.0, 50.0));
        assert_eq!(state.ball.pos, Vec2::new(250.0, 200.0));
        assert_eq!(state.bricks.len(), 24);
        assert!(!state.is_running());
    }

    #[test]
    fn test_paddle_heading_sums_intents() {
        let mut paddle = Paddle::new(Rect::new(100.0, 300.0, 110.0, 50.0), 6.0);
        assert_eq!(paddle.heading(), 0.0);
        paddle.set_intent(Direction::Left, true);
        assert_eq!(paddle.heading(), -1.0);
        paddle.set_intent(Direction::Right, true);
        assert_eq!(paddle.heading(), 0.0);
        paddle.advance(500.0);
        assert_eq!(paddle.bounds.x, 100.0);
        paddle.toggle_intent(Direction::Left);
        paddle.advance(500.0);
        assert_eq!(paddle.bounds.x, 106.0);
    }

    #[test]
    fn test_paddle_clamped_to_arena() {
        let mut paddle = Paddle::new(Rect::new(3.0, 300.0, 110.0, 50.0), 6.0);
        paddle.set_intent(Direction::Left, true);
        paddle.advance(500.0);
        assert_eq!(paddle.bounds.x, 0.0);

        let mut paddle = Paddle::new(Rect::new(388.0, 300.0, 110.0, 50.0), 6.0);
        paddle.set_intent(Direction::Right, true);
        paddle.advance(500.0);
        assert_eq!(paddle.bounds.right(), 500.0);
    }

    #[test]
    fn test_spawn_ball_is_centered_and_moving() {
        let mut state = GameState::new(Settings::default(), 7);
        for _ in 0..50 {
            state.ball.pos = Vec2::new(1.0, 1.0);
            state.pause_frames = 0;
            state.spawn_ball();
            assert_eq!(state.ball.pos, Vec2::new(250.0, 200.0));
            assert!((-2.0..=2.0).contains(&state.ball.vel.x));
            assert_eq!(state.ball.vel.x, state.ball.vel.x.round());
            assert_eq!(state.ball.vel.y, 20.0);
            assert_eq!(state.pause_frames, 180);
        }
    }

    #[test]
    fn test_select_play_only_from_menu() {
        let mut state = GameState::new(Settings::default(), 1);
        assert!(state.select_play());
        assert_eq!(state.phase, GamePhase::AwaitingComplexity);
        assert!(!state.select_play());
    }

    #[test]
    fn test_start_session_applies_tuning() {
        let mut state = GameState::new(Settings::default(), 1);
        state.start_session(Complexity::new(10).unwrap());
        assert_eq!(state.phase, GamePhase::Countdown);
        assert!(state.awaiting_start());
        assert!((state.ball.vel.y - 40.0).abs() < 1e-4);
        assert!(state.paddle.speed.abs() < 1e-4);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Banner(Banner::GetReady))
        );
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = GameState::new(Settings::default(), 99);
        let b = GameState::new(Settings::default(), 99);
        let effects_a: Vec<_> = a.bricks.iter().map(|b| b.effect).collect();
        let effects_b: Vec<_> = b.bricks.iter().map(|b| b.effect).collect();
        assert_eq!(effects_a, effects_b);
        assert_eq!(a.ball.vel, b.ball.vel);
    }

    #[test]
    fn test_state_serializes() {
        let state = GameState::new(Settings::default(), 5);
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.bricks, state.bricks);
        assert_eq!(restored.paddle, state.paddle);
    }
}
