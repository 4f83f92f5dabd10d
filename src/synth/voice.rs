use crate::{
    dsp::{AutomationEvent, AutomationParam, ScheduledEnvelope, Waveform},
    engine::{CommandSink, EngineCommand, VoiceId},
};

/// Control-side handle to a voice's tone generator.
pub struct ToneHandle<S: CommandSink> {
    voice: VoiceId,
    frequency: f64,
    waveform: Waveform,
    sink: S,
}

impl<S: CommandSink> ToneHandle<S> {
    /// Create the tone generator on the engine. It stays silent until `start`.
    pub fn create(voice: VoiceId, frequency: f64, waveform: Waveform, sink: S) -> Self {
        sink.send(EngineCommand::Create {
            voice,
            frequency: frequency as f32,
            waveform,
        });
        Self {
            voice,
            frequency,
            waveform,
            sink,
        }
    }

    pub fn start(&self, at: f64) {
        self.sink.send(EngineCommand::Start {
            voice: self.voice,
            at,
        });
    }

    /// Schedule the tone to stop; the engine frees the voice at that time.
    pub fn stop(&self, at: f64) {
        self.sink.send(EngineCommand::Stop {
            voice: self.voice,
            at,
        });
    }

    pub fn id(&self) -> VoiceId {
        self.voice
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }
}

/// Control-side handle to a voice's amplitude.
///
/// Keeps a mirror of the timeline it forwards, so the current amplitude can
/// be read without asking the audio thread.
pub struct GainHandle<S: CommandSink> {
    voice: VoiceId,
    timeline: AutomationParam,
    sink: S,
}

impl<S: CommandSink> GainHandle<S> {
    pub fn new(voice: VoiceId, sink: S) -> Self {
        Self {
            voice,
            timeline: AutomationParam::new(0.0),
            sink,
        }
    }

    pub fn timeline(&self) -> &AutomationParam {
        &self.timeline
    }
}

impl<S: CommandSink> ScheduledEnvelope for GainHandle<S> {
    fn schedule(&mut self, event: AutomationEvent) {
        self.timeline.schedule(event);
        self.sink.send(EngineCommand::Schedule {
            voice: self.voice,
            event,
        });
    }

    fn cancel_scheduled(&mut self, from: f64) {
        self.timeline.cancel_scheduled(from);
        self.sink.send(EngineCommand::Cancel {
            voice: self.voice,
            from,
        });
    }

    fn value_at(&self, time: f64) -> f32 {
        self.timeline.value_at(time)
    }

    /// Sent as a single command that also stops the tone at `until`, so the
    /// audio thread can't render a half-rewritten tail.
    fn release_from(&mut self, at: f64, from: f32, until: f64, target: f32) {
        self.timeline.release_from(at, from, until, target);
        self.sink.send(EngineCommand::Release {
            voice: self.voice,
            at,
            from,
            until,
            floor: target,
        });
    }
}

/// One sounding key: its tone generator, its amplitude and when it began.
pub struct ActiveVoice<S: CommandSink> {
    pub tone: ToneHandle<S>,
    pub gain: GainHandle<S>,
    pub started_at: f64,
}

impl<S: CommandSink> ActiveVoice<S> {
    pub fn id(&self) -> VoiceId {
        self.tone.id()
    }

    pub fn frequency(&self) -> f64 {
        self.tone.frequency()
    }
}
