//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` is one frame)
//! - Seeded RNG only
//! - Stable iteration order (bricks in grid order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{EdgeProbes, classify_edge, resolve};
pub use effects::{ActiveEffect, EffectKind};
pub use rect::Rect;
pub use state::{
    Ball, BallTint, Banner, Brick, Direction, Edge, GameEvent, GamePhase, GameState, Paddle,
};
pub use tick::{generate_bricks, tick};
