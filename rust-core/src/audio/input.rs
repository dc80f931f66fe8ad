//! Microphone capture using cpal
//!
//! Captures mono audio (channel 0 of the device) at the tone's sample rate
//! and pushes normalised samples into the ring buffer.

use super::buffer::AudioProducer;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    Device, SampleFormat, SampleRate, Stream, StreamConfig, SupportedStreamConfig,
    SupportedStreamConfigRange,
};
use log::{error, info};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No audio device found")]
    NoDevice,

    #[error("Failed to get device name: {0}")]
    DeviceName(String),

    #[error("Failed to query device configs: {0}")]
    DefaultConfig(String),

    #[error("Failed to build stream: {0}")]
    BuildStream(String),

    #[error("Failed to play stream: {0}")]
    PlayStream(String),

    #[error("Device does not support {0} Hz with f32 or i16 samples")]
    UnsupportedSampleRate(u32),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),
}

/// Audio device information
#[derive(Debug, Clone)]
pub struct AudioDeviceInfo {
    pub name: String,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Pick the first f32/i16 config range that covers `sample_rate`
pub(crate) fn pick_config<I>(
    mut ranges: I,
    sample_rate: u32,
) -> Result<SupportedStreamConfig, AudioError>
where
    I: Iterator<Item = SupportedStreamConfigRange>,
{
    ranges
        .find(|range| {
            matches!(range.sample_format(), SampleFormat::F32 | SampleFormat::I16)
                && range.min_sample_rate().0 <= sample_rate
                && sample_rate <= range.max_sample_rate().0
        })
        .map(|range| range.with_sample_rate(SampleRate(sample_rate)))
        .ok_or(AudioError::UnsupportedSampleRate(sample_rate))
}

/// Normalise a signed 16-bit sample to [-1, 1]
#[inline]
pub fn i16_to_unit(sample: i16) -> f64 {
    sample as f64 / i16::MAX as f64
}

/// Audio input stream
pub struct AudioInput {
    stream: Stream,
    device_info: AudioDeviceInfo,
}

impl AudioInput {
    /// Create audio input from default device
    ///
    /// # Arguments
    /// * `producer` - Ring buffer producer for captured audio
    /// * `sample_rate` - Required capture rate in Hz
    pub fn from_default_device(
        producer: AudioProducer,
        sample_rate: u32,
    ) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(AudioError::NoDevice)?;

        Self::from_device(device, producer, sample_rate)
    }

    /// Create audio input from specific device
    pub fn from_device(
        device: Device,
        producer: AudioProducer,
        sample_rate: u32,
    ) -> Result<Self, AudioError> {
        let name = device
            .name()
            .map_err(|e| AudioError::DeviceName(e.to_string()))?;

        let ranges = device
            .supported_input_configs()
            .map_err(|e| AudioError::DefaultConfig(e.to_string()))?;
        let config = pick_config(ranges, sample_rate)?;

        let sample_format = config.sample_format();
        let channels = config.channels();

        let device_info = AudioDeviceInfo {
            name,
            sample_rate,
            channels,
        };

        let stream_config: StreamConfig = config.into();
        let stride = channels.max(1) as usize;
        let mut producer = producer;

        let err_fn = |err: cpal::StreamError| error!("Audio input error: {}", err);

        // Keep channel 0 of interleaved data
        let stream = match sample_format {
            SampleFormat::F32 => device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let samples: Vec<f64> =
                        data.iter().step_by(stride).map(|&s| s as f64).collect();
                    producer.write(&samples);
                },
                err_fn,
                None,
            ),
            SampleFormat::I16 => device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let samples: Vec<f64> =
                        data.iter().step_by(stride).map(|&s| i16_to_unit(s)).collect();
                    producer.write(&samples);
                },
                err_fn,
                None,
            ),
            other => return Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
        }
        .map_err(|e| AudioError::BuildStream(e.to_string()))?;

        info!(
            "Capturing from '{}' ({} Hz, {} ch, {:?})",
            device_info.name, device_info.sample_rate, device_info.channels, sample_format
        );

        Ok(Self {
            stream,
            device_info,
        })
    }

    /// Start capturing audio
    pub fn start(&self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::PlayStream(e.to_string()))
    }

    /// Pause audio capture
    pub fn pause(&self) -> Result<(), AudioError> {
        self.stream
            .pause()
            .map_err(|e| AudioError::PlayStream(e.to_string()))
    }

    /// Get device information
    pub fn device_info(&self) -> &AudioDeviceInfo {
        &self.device_info
    }
}

/// List available audio input devices
pub fn list_input_devices() -> Result<Vec<AudioDeviceInfo>, AudioError> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    let device_iter = host
        .input_devices()
        .map_err(|e| AudioError::DeviceName(e.to_string()))?;

    for device in device_iter {
        if let Ok(name) = device.name() {
            if let Ok(config) = device.default_input_config() {
                devices.push(AudioDeviceInfo {
                    name,
                    sample_rate: config.sample_rate().0,
                    channels: config.channels(),
                });
            }
        }
    }

    Ok(devices)
}
