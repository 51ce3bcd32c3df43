//! Real-time output through cpal's default host and device.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer};
use tracing::{debug, error, info};

use crate::{
    device::AudioDevice,
    error::DroneError,
    graph::{GraphCommand, GraphRenderer},
    MAX_BLOCK_SIZE,
};

pub struct CpalDevice {
    stream: cpal::Stream,
    name: String,
    sample_rate: u32,
}

impl CpalDevice {
    /// Open the default output device. The stream is built suspended.
    ///
    /// When `tap` is given, every mixed output sample is also pushed into it
    /// (samples are dropped while it is full).
    pub fn open_default(
        commands: Consumer<GraphCommand>,
        tap: Option<Producer<f32>>,
    ) -> Result<Self, DroneError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| DroneError::device("no default output device available"))?;
        let name = device.name().unwrap_or_else(|_| "unknown".to_string());
        let config = device
            .default_output_config()
            .map_err(|e| DroneError::device(format!("failed to fetch output config: {e}")))?;

        if config.sample_format() != cpal::SampleFormat::F32 {
            return Err(DroneError::device(format!(
                "unsupported sample format {:?} on {}",
                config.sample_format(),
                name
            )));
        }

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        info!(device = %name, sample_rate, channels, "opening output stream");

        let mut renderer = GraphRenderer::new(sample_rate, commands);
        if let Some(tap) = tap {
            renderer = renderer.with_tap(tap);
        }
        let mut block = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let block = &mut block[..frames];
                        renderer.render(block);

                        // Copy to output (mono to all channels)
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            let s = s.clamp(-1.0, 1.0);
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                        }

                        frames_written += frames;
                    }
                },
                |err| error!("audio stream error: {err}"),
                None,
            )
            .map_err(|e| DroneError::device(format!("failed to build output stream: {e}")))?;

        // Some hosts start streams as soon as they are built
        if let Err(err) = stream.pause() {
            debug!("could not pause freshly built stream: {err}");
        }

        Ok(Self {
            stream,
            name,
            sample_rate,
        })
    }
}

impl AudioDevice for CpalDevice {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn resume(&mut self) -> Result<(), DroneError> {
        self.stream
            .play()
            .map_err(|e| DroneError::device(format!("failed to resume {}: {e}", self.name)))
    }

    fn suspend(&mut self) -> Result<(), DroneError> {
        self.stream
            .pause()
            .map_err(|e| DroneError::device(format!("failed to suspend {}: {e}", self.name)))
    }
}
