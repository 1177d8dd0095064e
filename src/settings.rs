//! Game settings and session tuning
//!
//! `Settings` is loaded once at startup and never mutated afterwards. The
//! player's complexity choice produces a separate `Tuning` value for the
//! session instead of rewriting the base speeds.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ComplexityError, SettingsError};

/// Player-chosen difficulty in `0..=10`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Complexity(u8);

impl Complexity {
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, ComplexityError> {
        Self::try_from(i64::from(value))
    }

    /// Parse a text-entry answer. Surrounding whitespace is ignored.
    pub fn parse(answer: &str) -> Result<Self, ComplexityError> {
        let trimmed = answer.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| ComplexityError::NotANumber(trimmed.to_string()))?;
        Self::try_from(value)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Linear speed factor: 1.0 at complexity 0, 2.0 at complexity 10
    pub fn factor(self) -> f32 {
        1.0 + 0.1 * self.0 as f32
    }
}

impl TryFrom<i64> for Complexity {
    type Error = ComplexityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ComplexityError::OutOfRange(value))
        }
    }
}

impl From<Complexity> for i64 {
    fn from(value: Complexity) -> Self {
        i64::from(value.0)
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-session speeds derived from the base settings and the complexity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub complexity: Complexity,
    /// Vertical ball speed (pixels per frame)
    pub ball_speed: f32,
    /// Paddle speed (pixels per frame)
    pub paddle_speed: f32,
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub screen_width: f32,
    pub screen_height: f32,
    pub frame_rate: u32,

    // === Bricks ===
    pub row_count: u32,
    pub brick_width: f32,
    pub brick_height: f32,
    /// Spacing between neighbouring bricks
    pub brick_gap: f32,
    /// Top of the first brick row
    pub brick_offset_y: f32,
    /// Effect draws are uniform over `0..=effect_roll_max`; only the first
    /// few values map to a power-up
    pub effect_roll_max: u32,

    // === Ball ===
    pub ball_speed: f32,
    pub ball_radius: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,

    // === Rules ===
    pub initial_lives: u32,
    pub effect_duration_secs: u32,
    /// Ball freeze after every (re)spawn
    pub pause_secs: u32,
    /// How long banners ("GET READY!", ...) stay on screen
    pub message_duration_secs: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 500.0,
            screen_height: 400.0,
            frame_rate: 60,

            row_count: 3,
            brick_width: 60.0,
            brick_height: 20.0,
            brick_gap: 1.0,
            brick_offset_y: 30.0,
            effect_roll_max: 10,

            ball_speed: 20.0,
            ball_radius: 8.0,

            paddle_width: 110.0,
            paddle_height: 50.0,
            paddle_speed: 6.0,

            initial_lives: 3,
            effect_duration_secs: 20,
            pause_secs: 3,
            message_duration_secs: 2,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Harder settings speed the ball up and slow the paddle down by the same factor
    pub fn tuning(&self, complexity: Complexity) -> Tuning {
        let k = complexity.factor();
        Tuning {
            complexity,
            ball_speed: k * self.ball_speed,
            paddle_speed: (2.0 - k) * self.paddle_speed,
        }
    }

    /// Frames the ball stays frozen after a spawn
    pub fn pause_frames(&self) -> u32 {
        self.pause_secs.saturating_mul(self.frame_rate)
    }

    /// Frames an effect stays active
    pub fn effect_duration_frames(&self) -> u64 {
        u64::from(self.effect_duration_secs) * u64::from(self.frame_rate)
    }

    /// Wall-clock length of one frame
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }

    pub fn message_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.message_duration_secs))
    }

    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
