//! Input routing: key and pointer events become voice start/stop actions.
//!
//! Each key is either Up or Down, and Down means "has an active voice". The
//! router reads that from the voice manager and never keeps state of its
//! own, so keyboard and pointer input for the same key share one state.

use crate::{engine::CommandSink, keys::KeyFrequencyIndex, synth::VoiceManager};

/// A UI event carrying the input code of the key it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    PointerDown(String),
    PointerUp(String),
    PointerLeave(String),
}

impl InputEvent {
    pub fn input_code(&self) -> &str {
        match self {
            InputEvent::KeyDown(code)
            | InputEvent::KeyUp(code)
            | InputEvent::PointerDown(code)
            | InputEvent::PointerUp(code)
            | InputEvent::PointerLeave(code) => code,
        }
    }

    /// Events that may start a sound, and so need a running backend.
    pub fn is_press(&self) -> bool {
        matches!(self, InputEvent::KeyDown(_) | InputEvent::PointerDown(_))
    }
}

/// An Up → Down or Down → Up transition for one key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Start {
        input_code: &'static str,
        frequency: f64,
    },
    Stop {
        input_code: &'static str,
    },
}

impl Action {
    pub fn input_code(&self) -> &'static str {
        match self {
            Action::Start { input_code, .. } | Action::Stop { input_code } => *input_code,
        }
    }
}

pub struct InputRouter {
    index: KeyFrequencyIndex,
}

impl InputRouter {
    pub fn new(index: KeyFrequencyIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &KeyFrequencyIndex {
        &self.index
    }

    /// Decide what `event` means given the keys currently down.
    ///
    /// `None` for unrecognized keys, presses of keys already down (auto
    /// repeat) and releases of keys already up.
    pub fn route<S: CommandSink>(
        &self,
        event: &InputEvent,
        voices: &VoiceManager<S>,
    ) -> Option<Action> {
        let code = event.input_code();
        let frequency = self.index.lookup_frequency(code)?;
        let input_code = self.index.canonical(code)?;
        let down = voices.has_voice(input_code);

        match event {
            InputEvent::KeyDown(_) | InputEvent::PointerDown(_) if !down => Some(Action::Start {
                input_code,
                frequency,
            }),
            InputEvent::KeyUp(_) | InputEvent::PointerUp(_) | InputEvent::PointerLeave(_)
                if down =>
            {
                Some(Action::Stop { input_code })
            }
            _ => None,
        }
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new(KeyFrequencyIndex::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dsp::Waveform,
        engine::{OfflineBackend, OfflineSink},
        synth::EnvelopeSynth,
    };

    fn down(voices: &mut VoiceManager<OfflineSink>, backend: &OfflineBackend, code: &str) {
        let mut synth = EnvelopeSynth::default();
        voices.start_voice(code, synth.start(backend, 440.0, Waveform::Sine));
    }

    #[test]
    fn press_of_an_up_key_starts_it() {
        let router = InputRouter::default();
        let voices = VoiceManager::<OfflineSink>::new();

        for event in [
            InputEvent::KeyDown("90".into()),
            InputEvent::PointerDown("90".into()),
        ] {
            assert_eq!(
                router.route(&event, &voices),
                Some(Action::Start {
                    input_code: "90",
                    frequency: 261.63
                })
            );
        }
    }

    #[test]
    fn press_of_a_down_key_is_suppressed() {
        let router = InputRouter::default();
        let backend = OfflineBackend::new(48_000.0);
        let mut voices = VoiceManager::new();
        down(&mut voices, &backend, "90");

        assert_eq!(router.route(&InputEvent::KeyDown("90".into()), &voices), None);
        assert_eq!(router.route(&InputEvent::PointerDown("90".into()), &voices), None);
    }

    #[test]
    fn every_release_kind_stops_a_down_key() {
        let router = InputRouter::default();
        let backend = OfflineBackend::new(48_000.0);
        let mut voices = VoiceManager::new();
        down(&mut voices, &backend, "85");

        for event in [
            InputEvent::KeyUp("85".into()),
            InputEvent::PointerUp("85".into()),
            InputEvent::PointerLeave("85".into()),
        ] {
            assert_eq!(
                router.route(&event, &voices),
                Some(Action::Stop { input_code: "85" })
            );
        }
    }

    #[test]
    fn release_of_an_up_key_is_ignored() {
        let router = InputRouter::default();
        let voices = VoiceManager::<OfflineSink>::new();

        assert_eq!(router.route(&InputEvent::KeyUp("85".into()), &voices), None);
        assert_eq!(router.route(&InputEvent::PointerLeave("85".into()), &voices), None);
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let router = InputRouter::default();
        let voices = VoiceManager::<OfflineSink>::new();

        for code in ["65", "", "Escape"] {
            assert_eq!(router.route(&InputEvent::KeyDown(code.into()), &voices), None);
            assert_eq!(router.route(&InputEvent::KeyUp(code.into()), &voices), None);
        }
    }

    #[test]
    fn only_presses_need_audio() {
        assert!(InputEvent::KeyDown("1".into()).is_press());
        assert!(InputEvent::PointerDown("1".into()).is_press());
        assert!(!InputEvent::KeyUp("1".into()).is_press());
        assert!(!InputEvent::PointerLeave("1".into()).is_press());
    }
}
