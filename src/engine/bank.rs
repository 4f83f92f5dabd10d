//! Audio-thread side of the keyboard: every voice that has been created and
//! not yet torn down, rendered from its scheduled timeline.
//!
//! The bank never decides anything musical. It only replays what the
//! control side scheduled: start and stop times for each oscillator and the
//! gain timeline in between. A voice is dropped at the first block boundary
//! after its stop time, which is how the release tail outlives the
//! control-side bookkeeping.

use crate::{
    dsp::{AutomationParam, Oscillator, ScheduledEnvelope},
    engine::{
        clock::EngineClock,
        command::{CommandReceiver, EngineCommand, VoiceId},
    },
};

/// Initial room for voices; more are allocated if a chord outgrows it.
const VOICE_CAPACITY: usize = 32;

struct ScheduledVoice {
    id: VoiceId,
    osc: Oscillator,
    gain: AutomationParam,
    start_at: Option<f64>,
    stop_at: Option<f64>,
}

impl ScheduledVoice {
    #[inline]
    fn is_sounding(&self, time: f64) -> bool {
        self.start_at.is_some_and(|start| start <= time)
            && self.stop_at.map_or(true, |stop| time < stop)
    }

    fn is_finished(&self, time: f64) -> bool {
        self.stop_at.is_some_and(|stop| stop <= time)
    }
}

pub struct VoiceBank {
    voices: Vec<ScheduledVoice>,
    clock: EngineClock,
    master_gain: f32,
}

impl VoiceBank {
    pub fn new(clock: EngineClock) -> Self {
        Self {
            voices: Vec::with_capacity(VOICE_CAPACITY),
            clock,
            master_gain: 1.0,
        }
    }

    pub fn clock(&self) -> &EngineClock {
        &self.clock
    }

    pub fn time(&self) -> f64 {
        self.clock.seconds()
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    /// Voices still held by the bank, including those in their release tail.
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn contains(&self, id: VoiceId) -> bool {
        self.voices.iter().any(|v| v.id == id)
    }

    /// Apply every pending command from the control side.
    pub fn drain<R: CommandReceiver>(&mut self, rx: &mut R) {
        while let Some(command) = rx.pop() {
            self.apply(command);
        }
    }

    pub fn apply(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Create {
                voice,
                frequency,
                waveform,
            } => {
                self.voices.push(ScheduledVoice {
                    id: voice,
                    osc: Oscillator::new(waveform, frequency),
                    // Silent until the control side schedules its envelope
                    gain: AutomationParam::new(0.0),
                    start_at: None,
                    stop_at: None,
                });
            }
            EngineCommand::Start { voice, at } => {
                if let Some(v) = self.find(voice) {
                    v.start_at = Some(at);
                }
            }
            EngineCommand::Stop { voice, at } => {
                if let Some(v) = self.find(voice) {
                    v.stop_at = Some(at);
                }
            }
            EngineCommand::Schedule { voice, event } => {
                if let Some(v) = self.find(voice) {
                    v.gain.schedule(event);
                }
            }
            EngineCommand::Cancel { voice, from } => {
                if let Some(v) = self.find(voice) {
                    v.gain.cancel_scheduled(from);
                }
            }
            EngineCommand::Release {
                voice,
                at,
                from,
                until,
                floor,
            } => {
                if let Some(v) = self.find(voice) {
                    v.gain.release_from(at, from, until, floor);
                    v.stop_at = Some(until);
                }
            }
            EngineCommand::SetMasterGain { gain } => {
                self.master_gain = gain;
            }
        }
    }

    /// Render one block (at most `MAX_BLOCK_SIZE` frames) and advance the clock.
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);

        let start_frame = self.clock.frames();
        let sample_rate = self.clock.sample_rate();

        for voice in self.voices.iter_mut() {
            for (i, sample) in out.iter_mut().enumerate() {
                let t = self.clock.frames_to_seconds(start_frame + i as u64);
                if !voice.is_sounding(t) {
                    continue;
                }
                *sample += voice.osc.next_sample(sample_rate) * voice.gain.value_at(t);
            }
        }

        for sample in out.iter_mut() {
            *sample *= self.master_gain;
        }

        self.clock.advance(out.len());

        let now = self.clock.seconds();
        self.voices.retain(|v| !v.is_finished(now));
        for voice in self.voices.iter_mut() {
            voice.gain.prune_before(now);
        }
    }

    fn find(&mut self, id: VoiceId) -> Option<&mut ScheduledVoice> {
        self.voices.iter_mut().find(|v| v.id == id)
    }
}
