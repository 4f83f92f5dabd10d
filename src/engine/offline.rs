//! A backend without a device: commands are applied immediately to a local
//! voice bank and recorded, and audio is rendered only when asked for.
//!
//! Used by tests and benches to drive the keyboard deterministically.

use std::{cell::RefCell, rc::Rc};

use crate::{
    engine::{
        backend::{AudioBackend, ContextState},
        bank::VoiceBank,
        clock::EngineClock,
        command::{CommandSink, EngineCommand},
    },
    error::Result,
    MAX_BLOCK_SIZE,
};

struct OfflineEngine {
    bank: VoiceBank,
    log: Vec<EngineCommand>,
}

#[derive(Clone)]
pub struct OfflineSink(Rc<RefCell<OfflineEngine>>);

impl CommandSink for OfflineSink {
    fn send(&self, command: EngineCommand) {
        let mut engine = self.0.borrow_mut();
        engine.log.push(command);
        engine.bank.apply(command);
    }
}

pub struct OfflineBackend {
    engine: Rc<RefCell<OfflineEngine>>,
    clock: EngineClock,
    state: ContextState,
    resumes: usize,
}

impl OfflineBackend {
    pub fn new(sample_rate: f32) -> Self {
        let clock = EngineClock::new(sample_rate);
        let engine = OfflineEngine {
            bank: VoiceBank::new(clock.clone()),
            log: Vec::new(),
        };

        Self {
            engine: Rc::new(RefCell::new(engine)),
            clock,
            state: ContextState::Suspended,
            resumes: 0,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.clock.sample_rate()
    }

    /// Render `frames` samples, advancing the clock by the same amount.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; frames];
        let mut engine = self.engine.borrow_mut();
        for block in out.chunks_mut(MAX_BLOCK_SIZE) {
            engine.bank.render(block);
        }
        out
    }

    pub fn render_seconds(&mut self, seconds: f64) -> Vec<f32> {
        let frames = (seconds * self.clock.sample_rate() as f64).round() as usize;
        self.render(frames)
    }

    /// Every command received so far, in order.
    pub fn commands(&self) -> Vec<EngineCommand> {
        self.engine.borrow().log.clone()
    }

    pub fn clear_commands(&mut self) {
        self.engine.borrow_mut().log.clear();
    }

    /// Voices held by the engine, including release tails.
    pub fn voice_count(&self) -> usize {
        self.engine.borrow().bank.voice_count()
    }

    pub fn master_gain(&self) -> f32 {
        self.engine.borrow().bank.master_gain()
    }

    /// How many times `resume` actually had to wake the backend.
    pub fn resume_count(&self) -> usize {
        self.resumes
    }
}

impl AudioBackend for OfflineBackend {
    type Sink = OfflineSink;

    fn current_time(&self) -> f64 {
        self.clock.seconds()
    }

    fn state(&self) -> ContextState {
        self.state
    }

    fn resume(&mut self) -> Result<()> {
        if self.state == ContextState::Suspended {
            self.state = ContextState::Running;
            self.resumes += 1;
        }
        Ok(())
    }

    fn sink(&self) -> OfflineSink {
        OfflineSink(Rc::clone(&self.engine))
    }
}
