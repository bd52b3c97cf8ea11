//! Cue routing for the audio layer
//!
//! The simulation decides which cue fires and when; a `CueSink` decides how
//! it sounds. `CueRouter` sits in between and applies the audio settings.

use crate::settings::AudioSettings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Player stepped
    Step,
    /// Player run over
    Hit,
    /// Vehicle horn
    Honk,
    /// Level cleared
    LevelUp,
    GameOver,
}

impl SoundCue {
    /// Map a simulation event to its cue, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Step => Some(SoundCue::Step),
            GameEvent::Hit { .. } => Some(SoundCue::Hit),
            GameEvent::Honk { .. } => Some(SoundCue::Honk),
            GameEvent::LevelUp { .. } => Some(SoundCue::LevelUp),
            GameEvent::GameOver => Some(SoundCue::GameOver),
            GameEvent::Respawned
            | GameEvent::CheckpointSaved { .. }
            | GameEvent::CheckpointRestored { .. }
            | GameEvent::Reset
            | GameEvent::MuteToggled => None,
        }
    }

    /// Relative loudness of each cue
    pub fn gain(self) -> f32 {
        match self {
            SoundCue::Step => 0.3,
            SoundCue::Hit => 0.9,
            SoundCue::Honk => 0.6,
            SoundCue::LevelUp => 0.7,
            SoundCue::GameOver => 1.0,
        }
    }
}

/// Playback backend
pub trait CueSink {
    fn play(&mut self, cue: SoundCue, volume: f32);
}

/// Backend that only logs (headless runs, tests)
#[derive(Debug, Default)]
pub struct LogSink;

impl CueSink for LogSink {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        log::debug!("cue {:?} at volume {:.2}", cue, volume);
    }
}

/// Applies settings to simulation events and forwards cues to a sink
pub struct CueRouter<S: CueSink> {
    pub settings: AudioSettings,
    sink: S,
}

impl<S: CueSink> CueRouter<S> {
    pub fn new(settings: AudioSettings, sink: S) -> Self {
        Self { settings, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume one batch of events in order. Returns cues actually played.
    pub fn handle(&mut self, events: &[GameEvent]) -> usize {
        let mut played = 0;
        for event in events {
            if *event == GameEvent::MuteToggled {
                self.settings.toggle_mute();
                log::info!("Audio {}", if self.settings.muted { "muted" } else { "unmuted" });
                continue;
            }
            let Some(cue) = SoundCue::for_event(event) else {
                continue;
            };
            let vol = self.settings.effective_volume() * cue.gain();
            if vol <= 0.0 {
                continue;
            }
            self.sink.play(cue, vol);
            played += 1;
        }
        played
    }
}
