//! Platform abstraction layer
//!
//! The game core talks to the outside world through four collaborators:
//! - `EventSource`: keyboard, menu choices and window close
//! - `Renderer`: draws the entity list and banner messages
//! - `AudioSink`: plays named sounds
//! - `TextEntry`: blocking numeric prompt
//!
//! `Headless` implements all of them in memory.

mod headless;

pub use headless::Headless;

use std::time::{Duration, Instant};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::error::AudioError;
use crate::palette::Rgba;
use crate::sim::Direction;
use crate::sim::rect::Rect;

/// Main menu entries (hit-testing happens in the menu collaborator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuChoice {
    Play,
    Bot,
    Quit,
}

/// Input delivered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Arrow key pressed or released
    Key { direction: Direction, pressed: bool },
    Menu(MenuChoice),
    /// Window close: terminates the game unconditionally
    WindowClosed,
}

/// One entry of the per-frame draw list
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Rect { bounds: Rect, color: Rgba },
    Circle { center: Vec2, radius: f32, color: Rgba },
    Text { pos: Vec2, text: String, color: Rgba },
}

pub trait EventSource {
    /// Drain events received since the last poll
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

pub trait Renderer {
    /// Draw the scene, in order, and present it
    fn draw(&mut self, scene: &[Drawable]);

    /// Show a centered message for `duration`
    fn show_message(&mut self, text: &str, duration: Duration);
}

pub trait AudioSink {
    fn play(&mut self, sound: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

pub trait TextEntry {
    /// Block until the player confirms an answer. `error` is shown above the
    /// prompt after a rejected answer. `None` means the window was closed.
    fn ask(&mut self, error: Option<&str>) -> Option<String>;
}

/// Everything the frame loop needs from the platform
pub trait Frontend: EventSource + Renderer + AudioSink + TextEntry {}

impl<T: EventSource + Renderer + AudioSink + TextEntry + ?Sized> Frontend for T {}

/// Sleeps out the rest of each frame to hold a fixed frame rate
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame: Duration,
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new(frame: Duration) -> Self {
        Self { frame, last: None }
    }

    /// Never sleeps (tests, training at full speed)
    pub fn unthrottled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Wait until one frame has passed since the previous call.
    /// Returns the time actually slept.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let slept = match self.last {
            Some(last) => {
                let elapsed = now.duration_since(last);
                let remaining = self.frame.saturating_sub(elapsed);
                if !remaining.is_zero() {
                    std::thread::sleep(remaining);
                }
                remaining
            }
            None => Duration::ZERO,
        };
        self.last = Some(Instant::now());
        slept
    }
}
