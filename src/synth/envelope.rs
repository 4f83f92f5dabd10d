use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{AutomationEvent, ScheduledEnvelope, Waveform},
    engine::{AudioBackend, CommandSink, VoiceId},
    error::{Error, Result},
    synth::voice::{ActiveVoice, GainHandle, ToneHandle},
    MIN_TIME,
};

/*
Scheduled ADSR
==============

Unlike a per-sample envelope generator, nothing here runs while a note
sounds. Note-on writes the whole attack and decay into the voice's gain
timeline; note-off rewrites the tail. The audio thread just evaluates the
timeline.

  gain
    1.0 ┐     ╱╲
        │    ╱  ╲ (exponential)
    0.7 │   ╱    ╲___________
        │  ╱ (linear)         ╲ (exponential)
  0.001 └─╱────────────────────╲──→ time
         t0  +attack  +decay   t1  t1+release

Attack    set 0 at t0, linear ramp to 1.0 at t0 + attack
Decay     exponential ramp to the sustain level at t0 + attack + decay
Sustain   nothing scheduled, the last value persists
Release   snapshot value_at(t1), cancel from t1, set the snapshot at t1,
          exponential ramp to the floor at t1 + release, stop the tone
          at t1 + release

The snapshot matters when release lands mid-attack or mid-decay: the
release curve starts from whatever the listener hears at t1.
*/

/// Envelope times (seconds) and levels.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeShape {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f32,
    pub release: f64,
    /// Release target. Exponential ramps cannot reach zero.
    pub floor: f32,
}

impl Default for EnvelopeShape {
    fn default() -> Self {
        Self {
            attack: 0.05,
            decay: 0.1,
            sustain: 0.7,
            release: 0.2,
            floor: 0.001,
        }
    }
}

impl EnvelopeShape {
    pub fn adsr(attack: f64, decay: f64, sustain: f32, release: f64) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, time) in [
            ("attack", self.attack),
            ("decay", self.decay),
            ("release", self.release),
        ] {
            if !time.is_finite() || time < MIN_TIME {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be at least {MIN_TIME:.6}s, got {time}"
                )));
            }
        }
        if !(self.sustain > 0.0 && self.sustain <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "sustain must be in (0, 1], got {}",
                self.sustain
            )));
        }
        if !(self.floor > 0.0 && self.floor < self.sustain) {
            return Err(Error::InvalidConfig(format!(
                "release floor must be in (0, sustain), got {}",
                self.floor
            )));
        }
        Ok(())
    }
}

/// Where a release ramp begins and when the voice goes silent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseRamp {
    pub from: f32,
    pub starts_at: f64,
    pub ends_at: f64,
}

/// Creates voices and writes their envelopes.
pub struct EnvelopeSynth {
    shape: EnvelopeShape,
    next_voice: u64,
}

impl EnvelopeSynth {
    pub fn new(shape: EnvelopeShape) -> Self {
        Self {
            shape,
            next_voice: 1,
        }
    }

    pub fn shape(&self) -> &EnvelopeShape {
        &self.shape
    }

    /// Write attack and decay into `gain`, starting at `now`.
    pub fn schedule_attack<E: ScheduledEnvelope>(&self, gain: &mut E, now: f64) {
        let peak_at = now + self.shape.attack;
        gain.schedule(AutomationEvent::set(now, 0.0));
        gain.schedule(AutomationEvent::linear(peak_at, 1.0));
        gain.schedule(AutomationEvent::exponential(
            peak_at + self.shape.decay,
            self.shape.sustain,
        ));
    }

    /// Replace whatever is pending in `gain` with a release from its current
    /// value.
    pub fn schedule_release<E: ScheduledEnvelope>(&self, gain: &mut E, now: f64) -> ReleaseRamp {
        let from = gain.value_at(now);
        let ends_at = now + self.shape.release;

        gain.release_from(now, from, ends_at, self.shape.floor);

        ReleaseRamp {
            from,
            starts_at: now,
            ends_at,
        }
    }

    /// Create a voice on `backend` and start it now.
    pub fn start<B: AudioBackend>(
        &mut self,
        backend: &B,
        frequency: f64,
        waveform: Waveform,
    ) -> ActiveVoice<B::Sink> {
        let id = VoiceId(self.next_voice);
        self.next_voice += 1;

        let now = backend.current_time();
        let tone = ToneHandle::create(id, frequency, waveform, backend.sink());
        let mut gain = GainHandle::new(id, backend.sink());

        self.schedule_attack(&mut gain, now);
        tone.start(now);

        debug!(voice = id.0, frequency, %waveform, at = now, "voice triggered");

        ActiveVoice {
            tone,
            gain,
            started_at: now,
        }
    }

    /// Release a voice at `now`. The engine stops the tone once the ramp
    /// ends; nothing waits for it.
    pub fn release<S: CommandSink>(&self, voice: ActiveVoice<S>, now: f64) -> ReleaseRamp {
        let ActiveVoice { tone, mut gain, .. } = voice;
        let ramp = self.schedule_release(&mut gain, now);

        debug!(
            voice = tone.id().0,
            from = ramp.from,
            until = ramp.ends_at,
            "voice released"
        );
        ramp
    }
}

impl Default for EnvelopeSynth {
    fn default() -> Self {
        Self::new(EnvelopeShape::default())
    }
}
