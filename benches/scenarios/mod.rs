//! Benchmarks for whole playing sessions through the keyboard.

mod keyboard;

pub use keyboard::{bench_chords, bench_key_mashing};
