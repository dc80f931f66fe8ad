//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod spectrum_bindings;
mod gesture_bindings;
mod session_bindings;

/// Python module definition
#[pymodule]
fn doppler_gesture(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<spectrum_bindings::PyFftEngine>()?;
    m.add_class::<gesture_bindings::PyGestureAnalyzer>()?;
    m.add_class::<gesture_bindings::PyGestureDetector>()?;
    m.add_class::<session_bindings::PyGestureSession>()?;

    Ok(())
}
