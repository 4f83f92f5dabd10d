//! cpal output stream backing the keyboard.

use std::{cell::RefCell, rc::Rc};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Producer, PushError, RingBuffer};
use tracing::{debug, error, info};

use saavy_keys::{
    engine::{AudioBackend, ContextState, EngineClock, EngineCommand, VoiceBank},
    Error, MAX_BLOCK_SIZE,
};

/// Capacity of the control → audio command queue.
const COMMAND_QUEUE_LEN: usize = 1024;

pub type CommandQueue = Rc<RefCell<Producer<EngineCommand>>>;

pub struct StreamBackend {
    stream: cpal::Stream,
    clock: EngineClock,
    commands: CommandQueue,
    state: ContextState,
    channels: usize,
}

impl StreamBackend {
    /// Open the default output device. The stream is built paused and only
    /// plays once the keyboard resumes it.
    ///
    /// Every rendered (mono) sample is also pushed to `scope_tx` for the
    /// visualizers; samples are dropped when the UI falls behind.
    pub fn open(scope_tx: Producer<f32>) -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        info!(
            device = %device.name().unwrap_or_default(),
            sample_rate, channels, "opened output device"
        );

        let clock = EngineClock::new(sample_rate);
        let (command_tx, command_rx) = RingBuffer::<EngineCommand>::new(COMMAND_QUEUE_LEN);

        let stream = device
            .build_output_stream(
                &config.into(),
                {
                    let mut bank = VoiceBank::new(clock.clone());
                    let mut command_rx = command_rx;
                    let mut scope_tx = scope_tx;
                    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
                    move |data: &mut [f32], _| {
                        bank.drain(&mut command_rx);

                        let total_frames = data.len() / channels;
                        let mut frames_written = 0;
                        while frames_written < total_frames {
                            let frames_remaining = total_frames - frames_written;
                            let frames_to_render = frames_remaining.min(MAX_BLOCK_SIZE);

                            let block = &mut render_buf[..frames_to_render];
                            bank.render(block);

                            // Duplicate mono to all channels
                            let out_off = frames_written * channels;
                            for (i, &s) in block.iter().enumerate() {
                                for ch in 0..channels {
                                    data[out_off + i * channels + ch] = s;
                                }
                            }

                            for &s in block.iter() {
                                if let Err(PushError::Full(_)) = scope_tx.push(s) {
                                    break;
                                }
                            }

                            frames_written += frames_to_render;
                        }
                    }
                },
                |err| error!(%err, "audio stream error"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        // Some hosts start streams on build; hold it until the first note.
        if let Err(err) = stream.pause() {
            debug!(%err, "stream could not be paused after build");
        }

        Ok(Self {
            stream,
            clock,
            commands: Rc::new(RefCell::new(command_tx)),
            state: ContextState::Suspended,
            channels,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.clock.sample_rate()
    }

    pub fn channels(&self) -> usize {
        self.channels
    }
}

impl AudioBackend for StreamBackend {
    type Sink = CommandQueue;

    fn current_time(&self) -> f64 {
        self.clock.seconds()
    }

    fn state(&self) -> ContextState {
        self.state
    }

    fn resume(&mut self) -> saavy_keys::Result<()> {
        self.stream
            .play()
            .map_err(|err| Error::Resume(err.to_string()))?;
        self.state = ContextState::Running;
        Ok(())
    }

    fn sink(&self) -> CommandQueue {
        Rc::clone(&self.commands)
    }
}
