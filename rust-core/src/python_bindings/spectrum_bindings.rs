//! Python bindings for the FFT engine

use pyo3::prelude::*;
use pyo3::exceptions::PyValueError;
use numpy::{PyArray1, PyReadonlyArray1};
use crate::spectrum::{magnitude_spectrum, FftEngine};

/// Radix-2 FFT engine exposed to Python
#[pyclass(name = "FftEngine")]
pub struct PyFftEngine {
    engine: FftEngine,
}

#[pymethods]
impl PyFftEngine {
    /// Create a new FFT engine
    ///
    /// Args:
    ///     fft_size: Transform length (must be a power of two)
    #[new]
    #[pyo3(signature = (fft_size=2048))]
    fn new(fft_size: usize) -> PyResult<Self> {
        let engine = FftEngine::new(fft_size)
            .map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?;
        Ok(Self { engine })
    }

    /// Transform a real/imaginary pair
    ///
    /// Args:
    ///     real: Real part, length fft_size
    ///     imag: Imaginary part, length fft_size
    ///
    /// Returns:
    ///     Tuple of (real, imag) numpy arrays holding the unnormalised DFT
    fn transform<'py>(
        &self,
        py: Python<'py>,
        real: PyReadonlyArray1<f64>,
        imag: PyReadonlyArray1<f64>,
    ) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
        let (mut re, mut im) = self.coefficients(real, imag)?;
        self.engine.transform(&mut re, &mut im);
        Ok((PyArray1::from_vec(py, re), PyArray1::from_vec(py, im)))
    }

    /// One-sided magnitude spectrum of a real frame
    ///
    /// Args:
    ///     frame: Real samples, length fft_size
    ///
    /// Returns:
    ///     fft_size / 2 magnitudes as numpy array
    fn magnitude<'py>(
        &self,
        py: Python<'py>,
        frame: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let mut re = to_vec(&frame)?;
        check_len(re.len(), self.engine.fft_size())?;
        let mut im = vec![0.0; re.len()];
        self.engine.transform(&mut re, &mut im);

        let mut spectrum = vec![0.0; self.engine.num_bins()];
        magnitude_spectrum(&re, &im, &mut spectrum);
        Ok(PyArray1::from_vec(py, spectrum))
    }

    /// Blackman window coefficients
    fn blackman<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.engine.blackman())
    }

    /// Get FFT size
    fn fft_size(&self) -> usize {
        self.engine.fft_size()
    }
}

impl PyFftEngine {
    fn coefficients(
        &self,
        real: PyReadonlyArray1<f64>,
        imag: PyReadonlyArray1<f64>,
    ) -> PyResult<(Vec<f64>, Vec<f64>)> {
        let re = to_vec(&real)?;
        let im = to_vec(&imag)?;
        check_len(re.len(), self.engine.fft_size())?;
        check_len(im.len(), self.engine.fft_size())?;
        Ok((re, im))
    }
}

pub(crate) fn to_vec(array: &PyReadonlyArray1<f64>) -> PyResult<Vec<f64>> {
    array
        .as_slice()
        .map(|s| s.to_vec())
        .map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))
}

pub(crate) fn check_len(got: usize, expected: usize) -> PyResult<()> {
    if got != expected {
        return Err(PyErr::new::<PyValueError, _>(format!(
            "expected {} samples, got {}",
            expected, got
        )));
    }
    Ok(())
}
