//! Carrier bin placement and bin/frequency mapping
//!
//! Ties the sample rate, FFT size and tone frequency together so the
//! analysis window bounds can never drift from the configuration.

use crate::config::DetectorConfig;
use crate::error::ConfigError;
use std::ops::RangeInclusive;

/// Where the carrier sits in the half spectrum and how wide the window is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarrierLayout {
    carrier_hz: f64,
    half_width: usize,
    carrier_bin: usize,
    num_bins: usize,
    hz_per_bin: f64,
}

impl CarrierLayout {
    /// Derive the layout for a tone at `carrier_hz`
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    /// * `fft_size` - Transform length
    /// * `carrier_hz` - Transmitted tone frequency
    /// * `half_width` - Bins kept on each side of the carrier bin
    pub fn new(
        sample_rate: u32,
        fft_size: usize,
        carrier_hz: f64,
        half_width: usize,
    ) -> Result<Self, ConfigError> {
        if sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate(sample_rate as f64));
        }
        if !fft_size.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo(fft_size));
        }

        let nyquist_hz = sample_rate as f64 / 2.0;
        if !carrier_hz.is_finite() || carrier_hz <= 0.0 || carrier_hz >= nyquist_hz {
            return Err(ConfigError::InvalidCarrier { carrier_hz, nyquist_hz });
        }

        let num_bins = fft_size / 2;
        let carrier_bin = ((carrier_hz / nyquist_hz) * num_bins as f64).floor() as usize;

        let start = carrier_bin as i64 - half_width as i64;
        let end = carrier_bin as i64 + half_width as i64;
        if start < 0 || end >= num_bins as i64 {
            return Err(ConfigError::WindowOutOfBounds { start, end, bins: num_bins });
        }

        Ok(Self {
            carrier_hz,
            half_width,
            carrier_bin,
            num_bins,
            hz_per_bin: nyquist_hz / num_bins as f64,
        })
    }

    pub fn from_config(config: &DetectorConfig) -> Result<Self, ConfigError> {
        Self::new(config.sample_rate, config.fft_size, config.carrier_hz, config.half_width)
    }

    /// Spectrum bin nearest (at or below) the carrier frequency
    pub fn carrier_bin(&self) -> usize {
        self.carrier_bin
    }

    /// Index of the carrier bin inside the window
    pub fn center(&self) -> usize {
        self.half_width
    }

    /// Number of bins in the carrier window
    pub fn window_len(&self) -> usize {
        2 * self.half_width + 1
    }

    /// Spectrum bins covered by the carrier window
    pub fn window_range(&self) -> RangeInclusive<usize> {
        (self.carrier_bin - self.half_width)..=(self.carrier_bin + self.half_width)
    }

    /// One-sided spectrum length this layout was validated against
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    pub fn hz_per_bin(&self) -> f64 {
        self.hz_per_bin
    }

    pub fn carrier_hz(&self) -> f64 {
        self.carrier_hz
    }

    /// Slice the carrier window out of a one-sided magnitude spectrum
    pub fn carrier_window<'a>(&self, spectrum: &'a [f64]) -> &'a [f64] {
        &spectrum[self.window_range()]
    }

    /// Frequency represented by a window index
    ///
    /// Offsets are measured from the nominal carrier frequency rather than
    /// the centre of the carrier bin, so the window centre maps exactly to
    /// `carrier_hz`.
    pub fn bin_to_frequency(&self, index: isize) -> f64 {
        (index - self.half_width as isize) as f64 * self.hz_per_bin + self.carrier_hz
    }
}

impl Default for CarrierLayout {
    fn default() -> Self {
        // Default constants place the window at bins 826..=892 of 1024,
        // well inside the bounds `new` checks
        let config = DetectorConfig::default();
        let nyquist_hz = config.sample_rate as f64 / 2.0;
        let num_bins = config.fft_size / 2;
        Self {
            carrier_hz: config.carrier_hz,
            half_width: config.half_width,
            carrier_bin: ((config.carrier_hz / nyquist_hz) * num_bins as f64).floor() as usize,
            num_bins,
            hz_per_bin: nyquist_hz / num_bins as f64,
        }
    }
}
