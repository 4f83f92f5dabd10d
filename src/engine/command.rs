#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer};
#[cfg(feature = "rtrb")]
use std::{cell::RefCell, rc::Rc};

use crate::dsp::{AutomationEvent, Waveform};

/// Identifies one voice for its whole life, from creation to teardown.
/// Never reused, so a late command for a released voice can't touch a newer
/// voice on the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(pub u64);

/// Control-side → audio-side messages. `Copy` so they can travel through a
/// realtime ring buffer without allocation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum EngineCommand {
    Create {
        voice: VoiceId,
        frequency: f32,
        waveform: Waveform,
    },
    Start {
        voice: VoiceId,
        at: f64,
    },
    Stop {
        voice: VoiceId,
        at: f64,
    },
    Schedule {
        voice: VoiceId,
        event: AutomationEvent,
    },
    Cancel {
        voice: VoiceId,
        from: f64,
    },
    /// Rewrite the gain tail from `at` (hold `from`, exponential ramp to
    /// `floor` at `until`) and stop the tone at `until`, all in one step.
    Release {
        voice: VoiceId,
        at: f64,
        from: f32,
        until: f64,
        floor: f32,
    },
    SetMasterGain {
        gain: f32,
    },
}

/// Where voice handles send their commands.
///
/// Takes `&self`: handles share one sink on the control thread.
pub trait CommandSink {
    fn send(&self, command: EngineCommand);
}

pub trait CommandReceiver {
    fn pop(&mut self) -> Option<EngineCommand>;
}

#[cfg(feature = "rtrb")]
impl CommandReceiver for Consumer<EngineCommand> {
    fn pop(&mut self) -> Option<EngineCommand> {
        Consumer::pop(self).ok()
    }
}

#[cfg(feature = "rtrb")]
impl CommandSink for Rc<RefCell<Producer<EngineCommand>>> {
    fn send(&self, command: EngineCommand) {
        if self.borrow_mut().push(command).is_err() {
            tracing::warn!(?command, "engine command queue full, dropping command");
        }
    }
}
