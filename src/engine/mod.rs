// Purpose: the audio side of the keyboard and the seam to it
// Control code talks to an AudioBackend; the backend feeds a VoiceBank

pub mod backend;
pub mod bank;
pub mod clock;
pub mod command;
pub mod offline;

pub use backend::{AudioBackend, ContextState};
pub use bank::VoiceBank;
pub use clock::EngineClock;
pub use command::{CommandReceiver, CommandSink, EngineCommand, VoiceId};
pub use offline::{OfflineBackend, OfflineSink};
