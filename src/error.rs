use thiserror::Error;

/// Errors surfaced by the keyboard library.
///
/// None of these are fatal to a running keyboard: the event path degrades to
/// no-ops and only configuration loading hands errors back to the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown waveform `{0}` (expected sine, square, sawtooth or triangle)")]
    UnknownWaveform(String),

    #[cfg(feature = "serde")]
    #[error("failed to parse configuration")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to read configuration file")]
    ConfigRead(#[from] std::io::Error),

    #[error("audio backend could not resume: {0}")]
    Resume(String),
}

pub type Result<T> = std::result::Result<T, Error>;
