//! Python bindings for a live gesture session

use pyo3::prelude::*;
use pyo3::exceptions::PyRuntimeError;
use crate::audio::session::{GestureSession, GestureSink};
use crate::config::{load_config, SessionConfig};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Keeps the most recent labels for Python to poll
struct QueueSink {
    labels: Arc<Mutex<VecDeque<String>>>,
}

impl GestureSink for QueueSink {
    fn show(&mut self, label: &str) {
        if let Ok(mut queue) = self.labels.lock() {
            queue.push_back(label.to_string());
            // Keep queue size reasonable
            while queue.len() > 64 {
                queue.pop_front();
            }
        }
    }
}

/// Live session exposed to Python
///
/// All audio and analysis runs in Rust threads; Python only polls labels.
#[pyclass(name = "GestureSession", unsendable)]
pub struct PyGestureSession {
    session: GestureSession,
    labels: Arc<Mutex<VecDeque<String>>>,
}

#[pymethods]
impl PyGestureSession {
    /// Create a session
    ///
    /// Args:
    ///     config_path: Optional TOML config file
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<PathBuf>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => load_config(&path)
                .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))?,
            None => SessionConfig::default(),
        };
        let session = GestureSession::new(config)
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))?;

        Ok(Self {
            session,
            labels: Arc::new(Mutex::new(VecDeque::new())),
        })
    }

    /// Start tone playback, capture and analysis
    fn start(&mut self) -> PyResult<()> {
        let sink = QueueSink {
            labels: Arc::clone(&self.labels),
        };
        self.session
            .start(sink)
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))
    }

    /// Stop the session
    fn stop(&mut self) {
        self.session.stop();
    }

    fn is_running(&self) -> bool {
        self.session.is_running()
    }

    /// Pop all labels shown since the last call
    fn take_labels(&self) -> Vec<String> {
        match self.labels.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}
