use crate::{engine::command::CommandSink, error::Result};

/// Whether the backend is currently producing audio.
///
/// Output devices start suspended and are resumed on the first note, the
/// same way a browser audio context waits for a user gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Suspended,
    Running,
}

/// The audio subsystem as seen from the control thread.
pub trait AudioBackend {
    type Sink: CommandSink + Clone;

    /// Seconds on the engine clock. Scheduled times are relative to this.
    fn current_time(&self) -> f64;

    fn state(&self) -> ContextState;

    fn resume(&mut self) -> Result<()>;

    /// A sink for voice handles. Every clone feeds the same engine.
    fn sink(&self) -> Self::Sink;
}
