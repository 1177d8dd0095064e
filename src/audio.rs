//! Sound effects
//!
//! Playback itself belongs to the platform's `AudioSink`. The manager only
//! applies volume/mute and swallows backend failures so they never reach
//! gameplay.

use serde::{Deserialize, Serialize};

use crate::platform::AudioSink;
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits ceiling or a side wall
    WallHit,
    /// Ball destroys a brick
    BrickHit,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 3] = [
        SoundEffect::PaddleHit,
        SoundEffect::WallHit,
        SoundEffect::BrickHit,
    ];

    /// Key used by audio backends
    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::PaddleHit => "paddle_hit",
            SoundEffect::WallHit => "wall_hit",
            SoundEffect::BrickHit => "brick_hit",
        }
    }

    /// Asset location, relative to the game's working directory
    pub fn asset_path(self) -> &'static str {
        match self {
            SoundEffect::PaddleHit => "sound_effects/paddle_hit.wav",
            SoundEffect::WallHit => "sound_effects/wall_hit.wav",
            SoundEffect::BrickHit => "sound_effects/brick_hit.wav",
        }
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect. Fire-and-forget: failures are logged only.
    pub fn play<S: AudioSink + ?Sized>(&self, sink: &mut S, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        if let Err(e) = sink.play(effect, vol) {
            log::warn!("{e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AudioError;

    #[derive(Default)]
    struct Recorder {
        played: Vec<(SoundEffect, f32)>,
        fail: bool,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, sound: SoundEffect, volume: f32) -> Result<(), AudioError> {
            if self.fail {
                return Err(AudioError {
                    sound: sound.name(),
                    reason: "device unplugged".into(),
                });
            }
            self.played.push((sound, volume));
            Ok(())
        }
    }

    #[test]
    fn test_names_are_stable() {
        let names: Vec<_> = SoundEffect::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["paddle_hit", "wall_hit", "brick_hit"]);
        assert!(SoundEffect::BrickHit.asset_path().ends_with("brick_hit.wav"));
    }

    #[test]
    fn test_volume_applied() {
        let mut sink = Recorder::default();
        let audio = AudioManager::new();
        audio.play(&mut sink, SoundEffect::WallHit);
        assert_eq!(sink.played, vec![(SoundEffect::WallHit, 0.8)]);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut sink = Recorder::default();
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        AudioManager::from_settings(&settings).play(&mut sink, SoundEffect::PaddleHit);
        assert!(sink.played.is_empty());
    }

    #[test]
    fn test_failures_are_swallowed() {
        let mut sink = Recorder {
            fail: true,
            ..Recorder::default()
        };
        AudioManager::new().play(&mut sink, SoundEffect::BrickHit);
        assert!(sink.played.is_empty());
    }

    #[test]
    fn test_volume_clamped() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_sfx_volume(0.5);
        assert_eq!(audio.effective_volume(), 0.5);
    }
}
