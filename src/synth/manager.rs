use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{engine::CommandSink, synth::voice::ActiveVoice};

/// Sounding voices keyed by input code. At most one voice per code.
///
/// Owned by the keyboard for the whole session; the input router only ever
/// borrows it to check whether a key is down.
pub struct VoiceManager<S: CommandSink> {
    voices: HashMap<String, ActiveVoice<S>>,
}

impl<S: CommandSink> VoiceManager<S> {
    pub fn new() -> Self {
        Self {
            voices: HashMap::new(),
        }
    }

    pub fn has_voice(&self, input_code: &str) -> bool {
        self.voices.contains_key(input_code)
    }

    /// Record a new voice. Refuses (and keeps the existing voice) when the
    /// code already has one; callers check `has_voice` first.
    pub fn start_voice(&mut self, input_code: &str, voice: ActiveVoice<S>) -> bool {
        if let Some(existing) = self.voices.get(input_code) {
            warn!(
                input_code,
                existing = existing.id().0,
                refused = voice.id().0,
                "voice already active for key, ignoring start"
            );
            return false;
        }
        debug!(input_code, voice = voice.id().0, "voice started");
        self.voices.insert(input_code.to_string(), voice);
        true
    }

    pub fn stop_voice(&mut self, input_code: &str) -> Option<ActiveVoice<S>> {
        let voice = self.voices.remove(input_code);
        if let Some(v) = &voice {
            debug!(input_code, voice = v.id().0, "voice stopped");
        }
        voice
    }

    pub fn get(&self, input_code: &str) -> Option<&ActiveVoice<S>> {
        self.voices.get(input_code)
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn active_codes(&self) -> impl Iterator<Item = &str> {
        self.voices.keys().map(String::as_str)
    }

    /// Remove every voice, e.g. to release them all on shutdown.
    pub fn drain(&mut self) -> impl Iterator<Item = (String, ActiveVoice<S>)> + '_ {
        self.voices.drain()
    }
}

impl<S: CommandSink> Default for VoiceManager<S> {
    fn default() -> Self {
        Self::new()
    }
}
