//! One playing session: the backend, the keys that are down, and what the
//! screen should show.

use tracing::{debug, info, warn};

use crate::{
    config::KeyboardConfig,
    dsp::Waveform,
    engine::{AudioBackend, CommandSink, ContextState, EngineCommand},
    input::{Action, InputEvent, InputRouter},
    keys::KeyFrequencyIndex,
    synth::{EnvelopeSynth, ReleaseRamp, VoiceManager},
    visual::VisualState,
};

pub struct Keyboard<B: AudioBackend> {
    backend: B,
    router: InputRouter,
    synth: EnvelopeSynth,
    voices: VoiceManager<B::Sink>,
    visuals: VisualState,
    waveform: Waveform,
    master_gain: f32,
}

impl<B: AudioBackend> Keyboard<B> {
    pub fn new(backend: B, config: &KeyboardConfig) -> Self {
        backend.sink().send(EngineCommand::SetMasterGain {
            gain: config.master_gain,
        });

        Self {
            backend,
            router: InputRouter::new(KeyFrequencyIndex::default()),
            synth: EnvelopeSynth::new(config.envelope),
            voices: VoiceManager::new(),
            visuals: VisualState::new(),
            waveform: config.waveform,
            master_gain: config.master_gain,
        }
    }

    /// Handle one UI event. Returns the transition it caused, if any.
    pub fn handle(&mut self, event: InputEvent) -> Option<Action> {
        if event.is_press() {
            self.ensure_running();
        }

        let action = self.router.route(&event, &self.voices)?;
        match action {
            Action::Start {
                input_code,
                frequency,
            } => {
                if !self.press(input_code, frequency) {
                    return None;
                }
            }
            Action::Stop { input_code } => {
                self.release(input_code);
                self.visuals.set_key_active(input_code, false);
            }
        }
        Some(action)
    }

    /// Start a voice for `input_code`. Nothing reaches the engine unless the
    /// key is free.
    fn press(&mut self, input_code: &str, frequency: f64) -> bool {
        if self.voices.has_voice(input_code) {
            debug!(input_code, "key already sounding");
            return false;
        }
        let voice = self.synth.start(&self.backend, frequency, self.waveform);
        self.voices.start_voice(input_code, voice);
        self.visuals.set_key_active(input_code, true);
        self.visuals.note_started(frequency);
        true
    }

    fn release(&mut self, input_code: &str) -> Option<ReleaseRamp> {
        let voice = self.voices.stop_voice(input_code)?;
        let now = self.backend.current_time();
        Some(self.synth.release(voice, now))
    }

    /// Resume a suspended backend before anything can sound.
    fn ensure_running(&mut self) {
        if self.backend.state() != ContextState::Suspended {
            return;
        }
        match self.backend.resume() {
            Ok(()) => info!("audio backend resumed"),
            Err(err) => warn!(%err, "audio backend failed to resume"),
        }
    }

    /// Waveform for notes started from now on. Sounding notes keep theirs.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        debug!(%waveform, "waveform selected");
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Output level set at construction.
    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    pub fn visuals(&self) -> &VisualState {
        &self.visuals
    }

    pub fn voices(&self) -> &VoiceManager<B::Sink> {
        &self.voices
    }

    pub fn index(&self) -> &KeyFrequencyIndex {
        self.router.index()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Release every sounding key and hand the backend back.
    pub fn shutdown(mut self) -> B {
        let now = self.backend.current_time();
        let released: Vec<_> = self.voices.drain().collect();
        for (input_code, voice) in released {
            self.synth.release(voice, now);
            self.visuals.set_key_active(&input_code, false);
        }
        info!("keyboard shut down");
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::OfflineBackend;

    fn keyboard() -> Keyboard<OfflineBackend> {
        Keyboard::new(OfflineBackend::new(1_000.0), &KeyboardConfig::default())
    }

    fn key_down(code: &str) -> InputEvent {
        InputEvent::KeyDown(code.to_string())
    }

    fn key_up(code: &str) -> InputEvent {
        InputEvent::KeyUp(code.to_string())
    }

    #[test]
    fn construction_sets_master_gain() {
        let kb = keyboard();
        assert_eq!(kb.backend().master_gain(), 0.2);
        assert_eq!(kb.master_gain(), 0.2);
    }

    #[test]
    fn first_press_resumes_the_backend() {
        let mut kb = keyboard();
        assert_eq!(kb.backend().state(), ContextState::Suspended);

        kb.handle(key_down("65"));
        assert_eq!(kb.backend().state(), ContextState::Running);

        kb.handle(key_down("90"));
        assert_eq!(kb.backend().resume_count(), 1);
    }

    #[test]
    fn auto_repeat_does_not_add_voices() {
        let mut kb = keyboard();

        assert!(kb.handle(key_down("90")).is_some());
        assert!(kb.handle(key_down("90")).is_none());
        assert!(kb.handle(InputEvent::PointerDown("90".into())).is_none());

        assert_eq!(kb.voices().len(), 1);
        assert_eq!(kb.backend().voice_count(), 1);
    }

    #[test]
    fn pressing_a_sounding_key_builds_no_engine_voice() {
        let mut kb = keyboard();
        assert!(kb.press("90", 261.63));
        assert!(!kb.press("90", 261.63));

        assert_eq!(kb.voices().len(), 1);
        assert_eq!(kb.backend().voice_count(), 1);
        let creates = kb
            .backend()
            .commands()
            .into_iter()
            .filter(|c| matches!(c, EngineCommand::Create { .. }))
            .count();
        assert_eq!(creates, 1);
    }

    #[test]
    fn release_mid_attack_removes_the_voice_immediately() {
        let mut kb = keyboard();
        kb.handle(key_down("78"));
        kb.backend_mut().render_seconds(0.02);

        kb.handle(key_up("78"));

        assert!(!kb.voices().has_voice("78"));
        assert!(!kb.visuals().is_key_active("78"));
        // The engine still plays the release tail
        assert_eq!(kb.backend().voice_count(), 1);
    }

    #[test]
    fn restarting_a_key_creates_a_new_voice() {
        let mut kb = keyboard();

        kb.handle(key_down("90"));
        let first = kb.voices().get("90").map(|v| v.id());
        kb.handle(key_up("90"));
        kb.handle(key_down("90"));
        let second = kb.voices().get("90").map(|v| v.id());

        assert!(first.is_some() && second.is_some());
        assert_ne!(first, second);
        assert_eq!(kb.voices().len(), 1);
        assert_eq!(kb.backend().voice_count(), 2, "old tail and new note");
    }

    #[test]
    fn waveform_is_read_at_note_start() {
        let mut kb = keyboard();
        kb.set_waveform(Waveform::Sawtooth);
        kb.handle(key_down("90"));
        kb.set_waveform(Waveform::Square);
        kb.handle(key_down("83"));

        let waveforms: Vec<Waveform> = kb
            .backend()
            .commands()
            .into_iter()
            .filter_map(|c| match c {
                EngineCommand::Create { waveform, .. } => Some(waveform),
                _ => None,
            })
            .collect();
        assert_eq!(waveforms, vec![Waveform::Sawtooth, Waveform::Square]);
    }

    #[test]
    fn background_follows_the_latest_note() {
        let mut kb = keyboard();
        kb.handle(key_down("90"));
        kb.handle(key_down("85"));

        let hue = kb.visuals().background().map(|c| c.hue).unwrap();
        assert!((hue - 354.05).abs() < 0.01, "hue {hue}");

        // Releasing doesn't repaint
        kb.handle(key_up("85"));
        assert_eq!(kb.visuals().background().map(|c| c.hue), Some(hue));
    }

    #[test]
    fn shutdown_releases_everything() {
        let mut kb = keyboard();
        kb.handle(key_down("90"));
        kb.handle(key_down("69"));

        let mut backend = kb.shutdown();
        backend.render_seconds(0.3);

        assert_eq!(backend.voice_count(), 0);
    }
}
