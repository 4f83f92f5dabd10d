use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Frame counter shared between the audio thread (writer) and the control
/// thread (reader). All scheduled times are seconds on this clock.
#[derive(Debug, Clone)]
pub struct EngineClock {
    frames: Arc<AtomicU64>,
    sample_rate: f32,
}

impl EngineClock {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    pub fn advance(&self, frames: usize) {
        self.frames.fetch_add(frames as u64, Ordering::AcqRel);
    }

    pub fn seconds(&self) -> f64 {
        self.frames_to_seconds(self.frames())
    }

    #[inline]
    pub fn frames_to_seconds(&self, frames: u64) -> f64 {
        frames as f64 / self.sample_rate as f64
    }
}
