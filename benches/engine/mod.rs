//! Benchmarks for the pieces the audio callback runs every sample.

mod automation;
mod bank;
mod oscillator;

pub use automation::bench_automation;
pub use bank::bench_bank;
pub use oscillator::bench_oscillator;
