//! Low-level DSP primitives used by the voice bank.
//!
//! These components are realtime-safe once constructed, making them safe to
//! embed directly inside voice structs on the audio thread.

/// Scheduled parameter timelines (set, linear and exponential ramps).
pub mod automation;
/// Oscillator waveforms.
pub mod oscillator;

pub use automation::{AutomationEvent, AutomationParam, Curve, ScheduledEnvelope};
pub use oscillator::{Oscillator, Waveform};
