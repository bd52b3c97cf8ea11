//! Audio preferences
//!
//! Mute lives here, outside the simulation: the core only forwards the
//! toggle as an event.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl AudioSettings {
    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_zeroes_volume() {
        let mut settings = AudioSettings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        settings.toggle_mute();
        assert_eq!(settings.effective_volume(), 0.0);
        settings.toggle_mute();
        assert!(settings.effective_volume() > 0.0);
    }

    #[test]
    fn test_volumes_clamp() {
        let mut settings = AudioSettings::default();
        settings.set_master_volume(3.0);
        settings.set_sfx_volume(-1.0);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.effective_volume(), 0.0);
    }
}
