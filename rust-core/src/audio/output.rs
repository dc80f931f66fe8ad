//! Carrier tone playback using cpal
//!
//! Plays a continuous sine at the carrier frequency on every output channel.

use super::input::{pick_config, AudioDeviceInfo, AudioError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use log::{error, info};
use std::f64::consts::TAU;

/// Phase-accumulating sine oscillator
#[derive(Debug, Clone)]
pub struct ToneGenerator {
    phase: f64,
    increment: f64,
    amplitude: f64,
}

impl ToneGenerator {
    /// # Arguments
    /// * `frequency_hz` - Tone frequency
    /// * `sample_rate` - Output sample rate in Hz
    /// * `amplitude` - Peak amplitude, clamped to [0, 1]
    pub fn new(frequency_hz: f64, sample_rate: u32, amplitude: f64) -> Self {
        Self {
            phase: 0.0,
            increment: TAU * frequency_hz / sample_rate as f64,
            amplitude: amplitude.clamp(0.0, 1.0),
        }
    }

    /// Next sample in [-amplitude, amplitude]
    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        let sample = self.amplitude * self.phase.sin();
        self.phase += self.increment;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        sample
    }

    /// Fill interleaved `data` with the tone, same sample on every channel
    pub fn fill_interleaved<T>(
        &mut self,
        data: &mut [T],
        channels: usize,
        convert: impl Fn(f64) -> T,
    ) where
        T: Copy,
    {
        for frame in data.chunks_mut(channels.max(1)) {
            let value = convert(self.next_sample());
            frame.fill(value);
        }
    }
}

/// Scale a unit sample to signed 16-bit
#[inline]
pub fn unit_to_i16(sample: f64) -> i16 {
    (sample * i16::MAX as f64) as i16
}

/// Tone output stream
pub struct ToneOutput {
    stream: Stream,
    device_info: AudioDeviceInfo,
}

impl ToneOutput {
    /// Create tone output on the default device
    pub fn from_default_device(tone: ToneGenerator, sample_rate: u32) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoDevice)?;

        Self::from_device(device, tone, sample_rate)
    }

    /// Create tone output on a specific device
    pub fn from_device(
        device: Device,
        tone: ToneGenerator,
        sample_rate: u32,
    ) -> Result<Self, AudioError> {
        let name = device
            .name()
            .map_err(|e| AudioError::DeviceName(e.to_string()))?;

        let ranges = device
            .supported_output_configs()
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
        let channels = channels as usize;
        let mut tone = tone;

        let err_fn = |err: cpal::StreamError| error!("Audio output error: {}", err);

        let stream = match sample_format {
            SampleFormat::F32 => device.build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    tone.fill_interleaved(data, channels, |s| s as f32);
                },
                err_fn,
                None,
            ),
            SampleFormat::I16 => device.build_output_stream(
                &stream_config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    tone.fill_interleaved(data, channels, unit_to_i16);
                },
                err_fn,
                None,
            ),
            other => return Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
        }
        .map_err(|e| AudioError::BuildStream(e.to_string()))?;

        info!(
            "Playing tone on '{}' ({} Hz, {} ch, {:?})",
            device_info.name, device_info.sample_rate, device_info.channels, sample_format
        );

        Ok(Self {
            stream,
            device_info,
        })
    }

    /// Start playing the tone
    pub fn start(&self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::PlayStream(e.to_string()))
    }

    /// Pause playback
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

/// List available audio output devices
pub fn list_output_devices() -> Result<Vec<AudioDeviceInfo>, AudioError> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    let device_iter = host
        .output_devices()
        .map_err(|e| AudioError::DeviceName(e.to_string()))?;

    for device in device_iter {
        if let Ok(name) = device.name() {
            if let Ok(config) = device.default_output_config() {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_rate_tone() {
        // 11025 Hz at 44100 Hz is exactly four samples per period
        let mut tone = ToneGenerator::new(11_025.0, 44_100, 1.0);
        let samples: Vec<f64> = (0..8).map(|_| tone.next_sample()).collect();
        let expected = [0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0];

        for (s, e) in samples.iter().zip(expected.iter()) {
            assert!((s - e).abs() < 1e-9, "{} != {}", s, e);
        }
    }

    #[test]
    fn test_amplitude_is_clamped() {
        let mut tone = ToneGenerator::new(11_025.0, 44_100, 3.0);
        tone.next_sample();
        assert!((tone.next_sample() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fill_interleaved_duplicates_channels() {
        let mut tone = ToneGenerator::new(11_025.0, 44_100, 0.5);
        let mut data = [0.0f32; 8];
        tone.fill_interleaved(&mut data, 2, |s| s as f32);

        assert_eq!(data[0], data[1]);
        assert!((data[2] - 0.5).abs() < 1e-6);
        assert_eq!(data[2], data[3]);
        assert!((data[6] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_carrier_tone_lands_in_carrier_bin() {
        use crate::spectrum::{magnitude_spectrum, FftEngine};

        let mut tone = ToneGenerator::new(18_500.0, 44_100, 1.0);
        let mut real: Vec<f64> = (0..2048).map(|_| tone.next_sample()).collect();
        let mut imag = vec![0.0; 2048];

        FftEngine::new(2048).unwrap().transform(&mut real, &mut imag);
        let mut spectrum = vec![0.0; 1024];
        magnitude_spectrum(&real, &imag, &mut spectrum);

        // 18500 Hz falls between bins 859 and 860
        let peak = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert!(peak == 859 || peak == 860, "peak at {}", peak);
    }

    #[test]
    fn test_unit_to_i16() {
        assert_eq!(unit_to_i16(1.0), i16::MAX);
        assert_eq!(unit_to_i16(0.0), 0);
        assert_eq!(unit_to_i16(-1.0), -i16::MAX);
    }
}
