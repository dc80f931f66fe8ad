//! Detector and session configuration
//!
//! Every size used by the pipeline (carrier bin, window bounds, Hz per bin)
//! is derived from the handful of values in [`DetectorConfig`].

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Sample rate the tone is played and captured at
pub const SAMPLE_RATE: u32 = 44_100;

/// Transmitted tone frequency in Hz
pub const CARRIER_HZ: f64 = 18_500.0;

/// Samples per analysis frame
pub const FFT_SIZE: usize = 2048;

/// Bins on each side of the carrier bin inside the analysis window
pub const HALF_WIDTH: usize = 33;

/// Width of the carrier window (carrier bin plus both sides)
pub const WINDOW_LEN: usize = 2 * HALF_WIDTH + 1;

/// Band-growth threshold as a fraction of the carrier magnitude
pub const BAND_THRESHOLD_RATIO: f64 = 0.1;

/// Strong-peak threshold as a fraction of the carrier magnitude
pub const PEAK_THRESHOLD_RATIO: f64 = 0.3;

/// Idle-state band width on the low-frequency side
pub const LEFT_BASELINE_WIDTH: usize = 4;

/// Idle-state band width on the high-frequency side
pub const RIGHT_BASELINE_WIDTH: usize = 5;

/// Analysis-side configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// FFT size (must be a power of two)
    pub fft_size: usize,

    /// Carrier tone frequency in Hz
    pub carrier_hz: f64,

    /// Bins on each side of the carrier bin
    pub half_width: usize,

    /// Multiply each frame by a Blackman window before transforming
    pub apply_blackman: bool,

    pub band_threshold_ratio: f64,
    pub peak_threshold_ratio: f64,
    pub left_baseline: usize,
    pub right_baseline: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            fft_size: FFT_SIZE,
            carrier_hz: CARRIER_HZ,
            half_width: HALF_WIDTH,
            apply_blackman: false,
            band_threshold_ratio: BAND_THRESHOLD_RATIO,
            peak_threshold_ratio: PEAK_THRESHOLD_RATIO,
            left_baseline: LEFT_BASELINE_WIDTH,
            right_baseline: RIGHT_BASELINE_WIDTH,
        }
    }
}

/// Whole-session configuration (audio shell plus detector)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Delay between starting the tone and starting capture
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Longest wait for one full frame before analysing a partial one
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Tone amplitude in [0, 1]
    #[serde(default = "default_tone_amplitude")]
    pub tone_amplitude: f64,

    /// Capture ring buffer capacity in samples (0 = four frames)
    #[serde(default)]
    pub ring_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            settle_ms: default_settle_ms(),
            read_timeout_ms: default_read_timeout_ms(),
            tone_amplitude: default_tone_amplitude(),
            ring_capacity: 0,
        }
    }
}

impl SessionConfig {
    /// Ring buffer capacity, falling back to four frames
    pub fn effective_ring_capacity(&self) -> usize {
        if self.ring_capacity == 0 {
            4 * self.detector.fft_size
        } else {
            self.ring_capacity
        }
    }
}

fn default_settle_ms() -> u64 {
    300
}

fn default_read_timeout_ms() -> u64 {
    500
}

fn default_tone_amplitude() -> f64 {
    1.0
}

/// Parse a session configuration from TOML text
pub fn parse_config(content: &str) -> Result<SessionConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Load a session configuration from a TOML file
pub fn load_config(path: &Path) -> Result<SessionConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
    parse_config(&content)
}
