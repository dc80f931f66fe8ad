//! Python bindings for gesture analysis

use pyo3::prelude::*;
use pyo3::exceptions::PyValueError;
use numpy::PyReadonlyArray1;
use crate::config::DetectorConfig;
use crate::gesture::{BandAnalyzer, BaselineState, GestureDetector, GestureResult};
use super::spectrum_bindings::{check_len, to_vec};

fn to_tuple(result: GestureResult) -> (String, u32) {
    (result.direction.to_string(), result.frequency_hz)
}

/// Band analyzer with its own baseline state
#[pyclass(name = "GestureAnalyzer")]
pub struct PyGestureAnalyzer {
    analyzer: BandAnalyzer,
    baseline: BaselineState,
}

#[pymethods]
impl PyGestureAnalyzer {
    #[new]
    fn new() -> Self {
        Self {
            analyzer: BandAnalyzer::default(),
            baseline: BaselineState::new(),
        }
    }

    /// Classify a carrier window
    ///
    /// Args:
    ///     window: Magnitudes around the carrier bin (67 values)
    ///
    /// Returns:
    ///     Tuple of (direction, frequency_hz); direction is "Pull", "Push" or "None"
    fn analyze_window(&mut self, window: PyReadonlyArray1<f64>) -> PyResult<(String, u32)> {
        let window = to_vec(&window)?;
        check_len(window.len(), self.analyzer.layout().window_len())?;
        Ok(to_tuple(self.analyzer.analyze(&window, &mut self.baseline)))
    }

    /// Baseline (left, right) widths, or None before the first window
    fn baseline(&self) -> Option<(usize, usize)> {
        self.baseline.widths()
    }
}

/// Full frame-to-gesture pipeline
#[pyclass(name = "GestureDetector")]
pub struct PyGestureDetector {
    detector: GestureDetector,
}

#[pymethods]
impl PyGestureDetector {
    /// Create a detector
    ///
    /// Args:
    ///     sample_rate: Sample rate in Hz
    ///     fft_size: Frame length (power of two)
    ///     carrier_hz: Carrier tone frequency
    ///     apply_blackman: Window frames before transforming
    #[new]
    #[pyo3(signature = (sample_rate=44100, fft_size=2048, carrier_hz=18500.0, apply_blackman=false))]
    fn new(
        sample_rate: u32,
        fft_size: usize,
        carrier_hz: f64,
        apply_blackman: bool,
    ) -> PyResult<Self> {
        let config = DetectorConfig {
            sample_rate,
            fft_size,
            carrier_hz,
            apply_blackman,
            ..DetectorConfig::default()
        };
        let detector = GestureDetector::new(&config)
            .map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?;
        Ok(Self { detector })
    }

    /// Classify one frame of samples in [-1, 1]
    fn process_frame(&mut self, frame: PyReadonlyArray1<f64>) -> PyResult<(String, u32)> {
        let frame = frame
            .as_slice()
            .map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?;
        Ok(to_tuple(self.detector.process_frame(frame)))
    }

    /// Forget the baseline; the next frame recalibrates
    fn reset(&mut self) {
        self.detector.reset();
    }
}
