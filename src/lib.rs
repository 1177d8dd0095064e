//! Brick Breaker - single-level Breakout with a bot automation bridge
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, effects, phases)
//! - `game`: Fixed-rate frame loop driving the simulation and collaborators
//! - `bridge`: Thread-safe automation environment (`reset` / `step`)
//! - `bot`: Built-in controllers for the automation bridge
//! - `platform`: Collaborator seams (input, rendering, audio, text entry)
//! - `renderer`: CPU tessellation of the draw list into vertices
//! - `settings`: Session configuration and complexity tuning

pub mod audio;
pub mod bot;
pub mod bridge;
pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use bridge::{Action, BreakoutEnv, EnvOptions};
pub use error::{BridgeError, ComplexityError, SettingsError};
pub use game::{Exit, Game};
pub use settings::{Complexity, Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Default seed when the caller does not supply one
    pub const DEFAULT_SEED: u64 = 0x5EED_B41C;

    /// Horizontal kick given to the ball by a moving paddle ("english")
    pub const PADDLE_ENGLISH: f32 = 1.0;

    /// Ball speed can never be slowed below this magnitude on the vertical axis
    pub const MIN_VERTICAL_SPEED: f32 = 1.0;

    /// Spawned balls draw their horizontal speed from `-SPAWN_DRIFT..=SPAWN_DRIFT`
    pub const SPAWN_DRIFT: i32 = 2;

    /// Shown after a bad complexity answer
    pub const COMPLEXITY_RETRY_PROMPT: &str = "Write number in range [0; 10]";

    pub const GET_READY_TEXT: &str = "GET READY!";
    pub const WIN_TEXT: &str = "YOU WIN!!!";
    pub const GAME_OVER_TEXT: &str = "GAME OVER!";
}

/// Colors for game elements (linear RGBA)
pub mod palette {
    pub type Rgba = [f32; 4];

    pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const BACKGROUND: Rgba = [0.02, 0.02, 0.05, 1.0];

    pub const BRICK: Rgba = [1.0, 0.0, 0.0, 1.0];
    pub const PADDLE: Rgba = [0.0, 0.75, 1.0, 1.0];
    pub const TEXT: Rgba = [1.0, 1.0, 0.0, 1.0];

    /// Ball tints, picked each frame from the collision outcome
    pub const BALL_IDLE: Rgba = [0.53, 0.81, 0.92, 1.0];
    pub const BALL_PADDLE_HIT: Rgba = [0.55, 0.0, 0.0, 1.0];
    pub const BALL_WALL_HIT: Rgba = [1.0, 0.0, 0.0, 1.0];

    /// Power-up brick highlights
    pub const EFFECT_WIDEN: Rgba = [1.0, 0.65, 0.0, 1.0];
    pub const EFFECT_SLOW: Rgba = [0.46, 0.93, 0.78, 1.0];
    pub const EFFECT_TRIPLE: Rgba = [0.41, 0.55, 0.41, 1.0];
    pub const EFFECT_LIFE: Rgba = [1.0, 0.84, 0.0, 1.0];
}
