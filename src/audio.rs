//! Audio cue sink
//!
//! The simulation never plays sound itself. Each frame's [`GameEvent`]s are
//! mapped to named cues and handed to whatever [`AudioSink`] the host supplies.

use crate::sim::state::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Player left the ground
    Jump,
    /// Player took damage
    Hit,
    /// Stomp or shield kill
    Crush,
    /// Death by health, withdrawal or falling
    Death,
    /// Caught by the pursuer
    Arrest,
    /// Collectible picked up
    Pickup,
    /// Shield cancelled a death
    ShieldBreak,
    /// Trash can knocked over
    TrashFall,
}

impl AudioCue {
    /// Name the host uses to look the sound up
    pub fn name(self) -> &'static str {
        match self {
            AudioCue::Jump => "jump",
            AudioCue::Hit => "hit",
            AudioCue::Crush => "crush",
            AudioCue::Death => "death",
            AudioCue::Arrest => "arrest",
            AudioCue::Pickup => "pickup",
            AudioCue::ShieldBreak => "shield_break",
            AudioCue::TrashFall => "trash_fall",
        }
    }
}

/// Cue and base volume for an event, if it makes a sound
pub fn cue_for_event(event: &GameEvent) -> Option<(AudioCue, f32)> {
    use crate::sim::state::DeathCause;

    let cue = match event {
        GameEvent::Jumped => (AudioCue::Jump, 0.6),
        GameEvent::Damaged(_) => (AudioCue::Hit, 0.8),
        GameEvent::Stomped(_) | GameEvent::ShieldKill(_) | GameEvent::AttackerDowned => (AudioCue::Crush, 0.7),
        GameEvent::Collected(_) => (AudioCue::Pickup, 0.5),
        GameEvent::ShieldSaved => (AudioCue::ShieldBreak, 0.9),
        GameEvent::HazardSmashed => (AudioCue::TrashFall, 0.7),
        GameEvent::DeathTriggered(DeathCause::Arrested) => (AudioCue::Arrest, 1.0),
        GameEvent::DeathTriggered(_) => (AudioCue::Death, 1.0),
        // The strike's damage already plays the hit
        GameEvent::AttackerStruck
        | GameEvent::FastFell
        | GameEvent::Slowed
        | GameEvent::PursuerRepelled
        | GameEvent::Evaded
        | GameEvent::RunFinished(_) => return None,
    };
    Some(cue)
}

/// Fire-and-forget sound output
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue, volume: f32);
}

/// Discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: AudioCue, _volume: f32) {}
}

/// Logs cues at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue, volume: f32) {
        log::debug!("audio cue {} at {:.2}", cue.name(), volume);
    }
}

/// Keeps every cue it receives, for tests and replays
#[derive(Debug, Default, Clone)]
pub struct CueRecorder {
    pub cues: Vec<(AudioCue, f32)>,
}

impl CueRecorder {
    pub fn count(&self, cue: AudioCue) -> usize {
        self.cues.iter().filter(|(c, _)| *c == cue).count()
    }
}

impl AudioSink for CueRecorder {
    fn play(&mut self, cue: AudioCue, volume: f32) {
        self.cues.push((cue, volume));
    }
}

/// Volume controls in front of a sink
pub struct AudioMixer {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioMixer {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play the cues for a frame's events
    pub fn play_events(&mut self, events: &[GameEvent]) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        for (cue, base) in events.iter().filter_map(cue_for_event) {
            self.sink.play(cue, base * vol);
        }
    }
}
