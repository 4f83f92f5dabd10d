//! Startup configuration.
//!
//! Built in code with the builder methods, or read from a TOML file when the
//! `serde` feature is enabled:
//!
//! ```toml
//! waveform = "triangle"
//! master_gain = 0.2
//! key_hold_ms = 750
//!
//! [envelope]
//! attack = 0.05
//! decay = 0.1
//! sustain = 0.7
//! release = 0.2
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::Waveform,
    error::{Error, Result},
    synth::EnvelopeShape,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardConfig {
    /// Waveform selected at startup.
    pub waveform: Waveform,
    /// Output level applied after all voices are summed.
    pub master_gain: f32,
    pub envelope: EnvelopeShape,
    /// Hosts that never see key releases treat a key as released after
    /// this long without a press or repeat. Must outlast the host's
    /// auto-repeat delay (660 ms on stock X11).
    pub key_hold_ms: u64,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            master_gain: 0.2,
            envelope: EnvelopeShape::default(),
            key_hold_ms: 750,
        }
    }
}

impl KeyboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn master_gain(mut self, gain: f32) -> Self {
        self.master_gain = gain;
        self
    }

    pub fn envelope(mut self, envelope: EnvelopeShape) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn key_hold_ms(mut self, millis: u64) -> Self {
        self.key_hold_ms = millis;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.master_gain) {
            return Err(Error::InvalidConfig(format!(
                "master_gain must be in [0, 1], got {}",
                self.master_gain
            )));
        }
        if self.key_hold_ms == 0 {
            return Err(Error::InvalidConfig("key_hold_ms must be positive".into()));
        }
        self.envelope.validate()
    }

    #[cfg(feature = "serde")]
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
