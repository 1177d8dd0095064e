//! Error types

use thiserror::Error;

/// Rejected complexity answer from the text-entry collaborator.
///
/// Never surfaced to the player as a failure: the prompt simply re-asks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComplexityError {
    #[error("complexity is not a number: {0:?}")]
    NotANumber(String),

    #[error("complexity {0} is outside 0..=10")]
    OutOfRange(i64),
}

/// Automation bridge errors
#[derive(Debug, Error)]
pub enum BridgeError {
    /// `step()` was called before any `reset()`
    #[error("environment not initialized: call reset() before step()")]
    NotInitialized,

    /// Raw action id outside {0 = left, 1 = right}
    #[error("invalid action {0}: expected 0 (left) or 1 (right)")]
    InvalidAction(u8),

    /// The game thread could not be started
    #[error("failed to spawn game thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The game thread panicked before reporting an outcome
    #[error("game thread for episode {0} panicked")]
    GameThread(u64),
}

/// Settings file errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Audio backend failure. Logged by the audio manager, never propagated into gameplay.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to play {sound}: {reason}")]
pub struct AudioError {
    pub sound: &'static str,
    pub reason: String,
}
