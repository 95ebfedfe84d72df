//! Microphone amplitude sensing
//!
//! A cpal input stream runs on the audio thread. Each callback folds its
//! samples into fixed-size blocks; every full block publishes its RMS into a
//! single lock-free slot that the game loop reads once per tick. Latest
//! value wins, nothing on the audio thread ever blocks or allocates.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use atomic_float::AtomicF32;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use thiserror::Error;

use crate::consts::{BLOCK_SIZE, SAMPLE_RATE};

/// Microphone startup failures. Any of these is fatal: the game cannot be
/// played without input.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio input device available")]
    NoInputDevice,
    #[error("audio input device '{0}' not found")]
    DeviceNotFound(String),
    #[error("failed to enumerate audio devices: {0}")]
    Devices(#[from] cpal::DevicesError),
    #[error("failed to query input configuration: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to open input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start input stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("unsupported input sample format {0:?}")]
    UnsupportedFormat(SampleFormat),
}

/// Root-mean-square of a block of samples
pub fn rms(block: &[f32]) -> f32 {
    if block.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = block.iter().map(|s| s * s).sum();
    (sum_squares / block.len() as f32).sqrt()
}

/// Shared single-slot amplitude cell. Cheap to clone; one writer, any readers.
#[derive(Debug, Clone)]
pub struct AmplitudeHandle(Arc<AtomicF32>);

impl Default for AmplitudeHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl AmplitudeHandle {
    pub fn new() -> Self {
        Self(Arc::new(AtomicF32::new(0.0)))
    }

    /// Latest published RMS
    #[inline]
    pub fn load(&self) -> f32 {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn store(&self, value: f32) {
        self.0.store(value, Ordering::Relaxed);
    }
}

/// Collects mono samples into fixed blocks and publishes each block's RMS
#[derive(Debug)]
pub struct BlockAccumulator {
    block: Vec<f32>,
    block_size: usize,
    handle: AmplitudeHandle,
}

impl BlockAccumulator {
    pub fn new(block_size: usize, handle: AmplitudeHandle) -> Self {
        let block_size = block_size.max(1);
        Self {
            block: Vec::with_capacity(block_size),
            block_size,
            handle,
        }
    }

    pub fn push(&mut self, sample: f32) {
        self.block.push(sample);
        if self.block.len() == self.block_size {
            self.handle.store(rms(&self.block));
            self.block.clear();
        }
    }

    /// Feed an interleaved buffer; only the first channel is used
    pub fn push_interleaved<T>(&mut self, data: &[T], channels: usize)
    where
        T: SizedSample,
        f32: FromSample<T>,
    {
        for frame in data.chunks(channels.max(1)) {
            self.push(f32::from_sample(frame[0]));
        }
    }
}

/// Live microphone capture. Dropping it stops the stream.
pub struct AmplitudeSampler {
    _stream: cpal::Stream,
    handle: AmplitudeHandle,
    device_name: String,
    sample_rate: u32,
}

impl AmplitudeSampler {
    /// Open the named input device (or the default one) and start capturing
    pub fn start(device_name: Option<&str>) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = match device_name {
            Some(name) => host
                .input_devices()?
                .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                .ok_or_else(|| AudioError::DeviceNotFound(name.to_string()))?,
            None => host.default_input_device().ok_or(AudioError::NoInputDevice)?,
        };
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let supported = preferred_config(&device)?;
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let sample_rate = config.sample_rate.0;
        let channels = config.channels as usize;

        let handle = AmplitudeHandle::new();
        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, channels, handle.clone())?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, channels, handle.clone())?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, channels, handle.clone())?,
            SampleFormat::I32 => build_stream::<i32>(&device, &config, channels, handle.clone())?,
            other => return Err(AudioError::UnsupportedFormat(other)),
        };
        stream.play()?;

        log::info!(
            "Microphone active: '{}' ({} Hz, {} ch, {:?}, {} frame blocks)",
            device_name,
            sample_rate,
            channels,
            sample_format,
            BLOCK_SIZE
        );

        Ok(Self {
            _stream: stream,
            handle,
            device_name,
            sample_rate,
        })
    }

    /// Reader side of the amplitude slot
    pub fn handle(&self) -> AmplitudeHandle {
        self.handle.clone()
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Mono at the preferred rate if the device offers it, otherwise its default
fn preferred_config(device: &cpal::Device) -> Result<cpal::SupportedStreamConfig, AudioError> {
    let preferred = device.supported_input_configs().ok().and_then(|mut configs| {
        configs.find_map(|range| {
            let fits = range.channels() == 1
                && range.min_sample_rate().0 <= SAMPLE_RATE
                && range.max_sample_rate().0 >= SAMPLE_RATE;
            fits.then(|| range.with_sample_rate(cpal::SampleRate(SAMPLE_RATE)))
        })
    });
    match preferred {
        Some(config) => Ok(config),
        None => Ok(device.default_input_config()?),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    handle: AmplitudeHandle,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let mut accumulator = BlockAccumulator::new(BLOCK_SIZE, handle);
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            accumulator.push_interleaved(data, channels);
        },
        // The last published amplitude stays in the slot; the game keeps running
        |err| log::warn!("Audio input stream error: {err}"),
        None,
    )?;
    Ok(stream)
}
