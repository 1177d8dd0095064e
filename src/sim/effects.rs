//! Timed power-ups
//!
//! At most one effect is active. Activating a new one reverts the old one
//! first. Expiry is measured on the simulation frame counter.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState};
use crate::consts::MIN_VERTICAL_SPEED;
use crate::palette::{self, Rgba};

/// Power-up kinds carried by special bricks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Paddle grows by half its base width
    WidenPaddle,
    /// Ball loses one unit of vertical speed
    SlowBall,
    /// Each brick is worth 3 points
    TripleScore,
    /// One extra life (kept after expiry)
    ExtraLife,
}

/// Apply / revert pair for an effect kind
#[derive(Clone, Copy)]
pub struct EffectHandlers {
    pub apply: fn(&mut GameState),
    pub revert: fn(&mut GameState),
}

impl EffectKind {
    /// Index order used by the brick grid draw
    pub const ALL: [EffectKind; 4] = [
        EffectKind::WidenPaddle,
        EffectKind::SlowBall,
        EffectKind::TripleScore,
        EffectKind::ExtraLife,
    ];

    pub fn color(self) -> Rgba {
        match self {
            EffectKind::WidenPaddle => palette::EFFECT_WIDEN,
            EffectKind::SlowBall => palette::EFFECT_SLOW,
            EffectKind::TripleScore => palette::EFFECT_TRIPLE,
            EffectKind::ExtraLife => palette::EFFECT_LIFE,
        }
    }

    pub fn handlers(self) -> EffectHandlers {
        match self {
            EffectKind::WidenPaddle => EffectHandlers {
                apply: widen_paddle,
                revert: restore_paddle,
            },
            EffectKind::SlowBall => EffectHandlers {
                apply: slow_ball,
                revert: restore_ball,
            },
            EffectKind::TripleScore => EffectHandlers {
                apply: triple_score,
                revert: single_score,
            },
            EffectKind::ExtraLife => EffectHandlers {
                apply: extra_life,
                revert: |_| {},
            },
        }
    }
}

/// The currently running effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    /// Frame the effect was activated on
    pub started_at: u64,
    /// Vertical speed actually removed by `SlowBall` (restored on revert)
    #[serde(default)]
    pub slowed_by: f32,
}

/// Start `kind`, reverting whatever effect is currently active
pub fn activate(state: &mut GameState, kind: EffectKind) {
    if let Some(previous) = state.active_effect {
        revert(state, previous);
    }

    state.active_effect = Some(ActiveEffect {
        kind,
        started_at: state.time_ticks,
        slowed_by: 0.0,
    });
    (kind.handlers().apply)(state);
    state.events.push(GameEvent::EffectStarted(kind));
    log::debug!("Effect {:?} started at tick {}", kind, state.time_ticks);
}

/// Expire the active effect once its duration has elapsed
pub fn tick(state: &mut GameState, now: u64) {
    let Some(active) = state.active_effect else {
        return;
    };
    if now.saturating_sub(active.started_at) >= state.settings.effect_duration_frames() {
        revert(state, active);
    }
}

fn revert(state: &mut GameState, active: ActiveEffect) {
    (active.kind.handlers().revert)(state);
    state.active_effect = None;
    state.events.push(GameEvent::EffectEnded(active.kind));
    log::debug!("Effect {:?} ended at tick {}", active.kind, state.time_ticks);
}

fn widen_paddle(state: &mut GameState) {
    let dw = state.settings.paddle_width / 2.0;
    state.paddle.bounds.inflate_x(dw);
    clamp_paddle(state);
}

fn restore_paddle(state: &mut GameState) {
    let dw = state.settings.paddle_width / 2.0;
    state.paddle.bounds.inflate_x(-dw);
    clamp_paddle(state);
}

fn clamp_paddle(state: &mut GameState) {
    let max_x = (state.settings.screen_width - state.paddle.bounds.w).max(0.0);
    state.paddle.bounds.x = state.paddle.bounds.x.clamp(0.0, max_x);
}

fn slow_ball(state: &mut GameState) {
    let vy = state.ball.vel.y;
    let slowed_by = (vy.abs() - MIN_VERTICAL_SPEED).clamp(0.0, 1.0);
    state.ball.vel.y = vy - vy.signum() * slowed_by;
    if let Some(active) = state.active_effect.as_mut() {
        active.slowed_by = slowed_by;
    }
}

fn restore_ball(state: &mut GameState) {
    let slowed_by = state.active_effect.map_or(0.0, |a| a.slowed_by);
    let vy = state.ball.vel.y;
    state.ball.vel.y = vy + vy.signum() * slowed_by;
}

fn triple_score(state: &mut GameState) {
    state.points_per_brick = 3;
}

fn single_score(state: &mut GameState) {
    state.points_per_brick = 1;
}

fn extra_life(state: &mut GameState) {
    state.lives += 1;
}
