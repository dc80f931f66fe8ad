//! Spectral analysis with a fixed-size FFT

pub mod fft;
pub mod windowing;
pub mod analysis;

pub use fft::FftEngine;
pub use windowing::blackman_window;
pub use analysis::magnitude_spectrum;
