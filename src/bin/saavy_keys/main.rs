//! saavy-keys - play a two-octave synth keyboard in the terminal
//!
//! Run with: cargo run --bin saavy-keys -- --waveform triangle

mod app;
mod audio;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use rtrb::RingBuffer;
use tracing::{info, level_filters::LevelFilter};

use saavy_keys::{dsp::Waveform, KeyboardConfig};

use app::{App, VIS_BUFFER_SIZE};
use audio::StreamBackend;

#[derive(Parser, Debug)]
#[command(name = "saavy-keys", version, about = "Two-octave keyboard synth for the terminal")]
struct Cli {
    /// TOML file with startup settings; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Waveform at startup (sine, square, sawtooth, triangle)
    #[arg(short, long)]
    waveform: Option<Waveform>,

    /// Master output gain in [0, 1]
    #[arg(short, long)]
    gain: Option<f32>,

    /// Attack time in seconds
    #[arg(long)]
    attack: Option<f64>,

    /// Decay time in seconds
    #[arg(long)]
    decay: Option<f64>,

    /// Sustain level in (0, 1]
    #[arg(long)]
    sustain: Option<f32>,

    /// Release time in seconds
    #[arg(long)]
    release: Option<f64>,

    /// Milliseconds without auto-repeat before a key counts as released
    /// (terminals that do not report key releases)
    #[arg(long)]
    hold_ms: Option<u64>,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Log debug events too
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> EyreResult<KeyboardConfig> {
        let mut config = match &self.config {
            Some(path) => KeyboardConfig::load(path)
                .wrap_err_with(|| format!("failed to load {}", path.display()))?,
            None => KeyboardConfig::default(),
        };

        if let Some(waveform) = self.waveform {
            config.waveform = waveform;
        }
        if let Some(gain) = self.gain {
            config.master_gain = gain;
        }
        if let Some(attack) = self.attack {
            config.envelope.attack = attack;
        }
        if let Some(decay) = self.decay {
            config.envelope.decay = decay;
        }
        if let Some(sustain) = self.sustain {
            config.envelope.sustain = sustain;
        }
        if let Some(release) = self.release {
            config.envelope.release = release;
        }
        if let Some(hold_ms) = self.hold_ms {
            config.key_hold_ms = hold_ms;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(cli: &Cli) -> EyreResult<()> {
    let Some(path) = &cli.log else {
        return Ok(());
    };
    let file = File::create(path).wrap_err_with(|| format!("failed to create {}", path.display()))?;
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli)?;
    let config = cli.config()?;
    info!(?config, "starting");

    let (scope_tx, scope_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * 4);
    let backend = StreamBackend::open(scope_tx)?;

    let mut terminal = ratatui::init();
    let result = App::new(backend, scope_rx, &config).run(&mut terminal);
    ratatui::restore();

    result
}
