pub mod config; // Startup configuration (builder, TOML)
pub mod dsp;
pub mod engine; // Audio-thread voice bank and backends
pub mod error;
pub mod input; // Key/pointer events → voice commands
pub mod keyboard;
pub mod keys; // Static two-octave key table
pub mod synth; // Voice bookkeeping and envelope scheduling
pub mod visual;

pub use config::KeyboardConfig;
pub use error::{Error, Result};
pub use keyboard::Keyboard;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f64 = 1.0 / 48_000.0;
