//! Window functions applied to frames before the transform
//!
//! The detector runs un-windowed by default; the Blackman window is an
//! opt-in pre-processing step.

use std::f64::consts::PI;

/// Generate Blackman window coefficients
///
/// w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
/// Mainlobe width: 12π/M, Sidelobe attenuation: ~74 dB
///
/// # Arguments
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn blackman_window(length: usize) -> Vec<f64> {
    // A single-point window has no (M-1) denominator to divide by
    if length <= 1 {
        return vec![1.0; length];
    }

    let m = length as f64;
    (0..length)
        .map(|n| {
            let angle1 = 2.0 * PI * n as f64 / (m - 1.0);
            let angle2 = 4.0 * PI * n as f64 / (m - 1.0);
            0.42 - 0.5 * angle1.cos() + 0.08 * angle2.cos()
        })
        .collect()
}

/// Multiply a signal by precomputed window coefficients in place
pub fn apply_window_inplace(signal: &mut [f64], window: &[f64]) {
    for (s, w) in signal.iter_mut().zip(window.iter()) {
        *s *= w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blackman_shape() {
        let length = 161;
        let blackman = blackman_window(length);

        assert_eq!(blackman.len(), length);

        // Symmetric, ~0 at the edges, 1.0 in the middle
        assert!((blackman[0] - blackman[length - 1]).abs() < 1e-10);
        assert!(blackman[0].abs() < 1e-10);
        assert!((blackman[length / 2] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(blackman_window(0).is_empty());
        assert_eq!(blackman_window(1), vec![1.0]);
    }

    #[test]
    fn test_apply_window_inplace() {
        let window = blackman_window(101);
        let mut signal = vec![2.0; 101];
        apply_window_inplace(&mut signal, &window);

        assert!(signal[0].abs() < 1e-10);
        assert!((signal[50] - 2.0).abs() < 1e-10);
    }
}
