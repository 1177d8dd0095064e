//! In-memory platform: scripted input, recorded output

use std::collections::VecDeque;
use std::time::Duration;

use super::{AudioSink, Drawable, EventSource, InputEvent, Renderer, TextEntry};
use crate::audio::SoundEffect;
use crate::error::AudioError;

/// Headless frontend
///
/// Input events are scripted per frame and text-entry answers are queued.
/// With recording on, everything drawn, played and shown is kept for
/// inspection; with it off only the frame counter moves.
#[derive(Debug, Default)]
pub struct Headless {
    frame_events: VecDeque<Vec<InputEvent>>,
    answers: VecDeque<String>,
    record: bool,
    /// Frames presented
    pub frames: u64,
    pub last_scene: Vec<Drawable>,
    pub sounds: Vec<SoundEffect>,
    pub messages: Vec<String>,
    /// The error line shown with each prompt
    pub prompts: Vec<Option<String>>,
}

impl Headless {
    /// Recording frontend for tests
    pub fn new() -> Self {
        Self {
            record: true,
            ..Self::default()
        }
    }

    /// Non-recording frontend for long automated runs
    pub fn quiet() -> Self {
        Self::default()
    }

    /// Queue the events delivered on the next unscripted frame
    pub fn push_frame(&mut self, events: Vec<InputEvent>) -> &mut Self {
        self.frame_events.push_back(events);
        self
    }

    /// Queue an answer for the text-entry prompt
    pub fn push_answer(&mut self, answer: &str) -> &mut Self {
        self.answers.push_back(answer.to_string());
        self
    }
}

impl EventSource for Headless {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.frame_events.pop_front().unwrap_or_default()
    }
}

impl Renderer for Headless {
    fn draw(&mut self, scene: &[Drawable]) {
        self.frames += 1;
        if self.record {
            self.last_scene = scene.to_vec();
        }
    }

    fn show_message(&mut self, text: &str, _duration: Duration) {
        log::info!("{text}");
        if self.record {
            self.messages.push(text.to_string());
        }
    }
}

impl AudioSink for Headless {
    fn play(&mut self, sound: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        if self.record {
            self.sounds.push(sound);
        }
        Ok(())
    }
}

impl TextEntry for Headless {
    fn ask(&mut self, error: Option<&str>) -> Option<String> {
        if self.record {
            self.prompts.push(error.map(str::to_string));
        }
        self.answers.pop_front()
    }
}
