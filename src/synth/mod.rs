// Purpose: voice bookkeeping and envelope scheduling
// This layer sits above the engine: it decides what each voice does and when

pub mod envelope;
pub mod manager;
pub mod voice;

pub use envelope::{EnvelopeShape, EnvelopeSynth, ReleaseRamp};
pub use manager::VoiceManager;
pub use voice::{ActiveVoice, GainHandle, ToneHandle};
