//! Fixed-size radix-2 FFT engine
//!
//! In-place decimation-in-time transform over paired real/imaginary buffers.
//! Twiddle tables are computed once per engine so a transform call never
//! allocates.

use super::windowing::{apply_window_inplace, blackman_window};
use crate::error::ConfigError;
use std::f64::consts::PI;

/// Radix-2 FFT engine for one transform length
#[derive(Debug, Clone)]
pub struct FftEngine {
    /// FFT size (number of samples)
    n: usize,

    /// log2(n)
    m: u32,

    /// cos(-2πi/n) for i in 0..n/2
    cos: Vec<f64>,

    /// sin(-2πi/n) for i in 0..n/2
    sin: Vec<f64>,

    /// Blackman window of length n, applied only on request
    window: Vec<f64>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples, must be a power of two)
    pub fn new(fft_size: usize) -> Result<Self, ConfigError> {
        if !fft_size.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo(fft_size));
        }

        let half = fft_size / 2;
        let cos = (0..half)
            .map(|i| (-2.0 * PI * i as f64 / fft_size as f64).cos())
            .collect();
        let sin = (0..half)
            .map(|i| (-2.0 * PI * i as f64 / fft_size as f64).sin())
            .collect();

        Ok(Self {
            n: fft_size,
            m: fft_size.trailing_zeros(),
            cos,
            sin,
            window: blackman_window(fft_size),
        })
    }

    /// Transform `real`/`imag` in place (no 1/N scaling)
    ///
    /// # Panics
    /// If either buffer length differs from the engine's FFT size.
    pub fn transform(&self, real: &mut [f64], imag: &mut [f64]) {
        let n = self.n;
        assert_eq!(real.len(), n, "real buffer length does not match FFT size");
        assert_eq!(imag.len(), n, "imag buffer length does not match FFT size");

        // Bit-reverse permutation; 0 and n-1 map to themselves
        let mut j = 0;
        for i in 1..n.saturating_sub(1) {
            let mut n1 = n / 2;
            while j >= n1 {
                j -= n1;
                n1 /= 2;
            }
            j += n1;
            if i < j {
                real.swap(i, j);
                imag.swap(i, j);
            }
        }

        // Butterflies
        let mut n2 = 1;
        for stage in 0..self.m {
            let n1 = n2;
            n2 += n2;
            let stride = 1usize << (self.m - stage - 1);
            for j in 0..n1 {
                let c = self.cos[j * stride];
                let s = self.sin[j * stride];
                for k in (j..n).step_by(n2) {
                    let t1 = c * real[k + n1] - s * imag[k + n1];
                    let t2 = s * real[k + n1] + c * imag[k + n1];
                    real[k + n1] = real[k] - t1;
                    imag[k + n1] = imag[k] - t2;
                    real[k] += t1;
                    imag[k] += t2;
                }
            }
        }
    }

    /// Multiply a frame by the precomputed Blackman window
    pub fn apply_window(&self, frame: &mut [f64]) {
        assert_eq!(frame.len(), self.n, "frame length does not match FFT size");
        apply_window_inplace(frame, &self.window);
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.n
    }

    /// Number of meaningful one-sided bins for a real input (n/2)
    pub fn num_bins(&self) -> usize {
        self.n / 2
    }

    pub fn cos_table(&self) -> &[f64] {
        &self.cos
    }

    pub fn sin_table(&self) -> &[f64] {
        &self.sin
    }

    /// Blackman window coefficients
    pub fn blackman(&self) -> &[f64] {
        &self.window
    }
}
