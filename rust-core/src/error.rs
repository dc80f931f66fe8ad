//! Configuration errors raised while setting up the detection pipeline

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("FFT length must be a power of two (got {0})")]
    NotPowerOfTwo(usize),

    #[error("Sample rate must be a positive finite number of Hz (got {0})")]
    InvalidSampleRate(f64),

    #[error("Carrier frequency {carrier_hz} Hz must lie strictly between 0 Hz and Nyquist ({nyquist_hz} Hz)")]
    InvalidCarrier { carrier_hz: f64, nyquist_hz: f64 },

    #[error("Carrier window {start}..={end} does not fit inside the {bins}-bin half spectrum")]
    WindowOutOfBounds { start: i64, end: i64, bins: usize },

    #[error("Failed to read config file: {0}")]
    Io(String),

    #[error("Failed to parse config file: {0}")]
    Parse(String),
}
