//! Magnitude spectrum from transformed coefficients

use num_complex::Complex;

/// Write |X[k]| for k = 0..out.len() into `out`
///
/// For a real input only the first n/2 bins carry information, so callers
/// normally pass an `out` of half the transform length.
///
/// # Panics
/// If `out` is longer than either coefficient buffer.
pub fn magnitude_spectrum(real: &[f64], imag: &[f64], out: &mut [f64]) {
    assert!(
        out.len() <= real.len() && out.len() <= imag.len(),
        "magnitude buffer longer than the spectrum"
    );

    for (k, mag) in out.iter_mut().enumerate() {
        *mag = Complex::new(real[k], imag[k]).norm();
    }
}
