//! Doppler Gesture - ultrasonic push/pull detection
//!
//! Plays a steady ultrasonic carrier, listens for its reflection and
//! classifies hand motion from the Doppler-shifted energy either side of
//! the carrier bin.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod audio;
pub mod config;
pub mod error;
pub mod gesture;
pub mod spectrum;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use config::{DetectorConfig, SessionConfig};
pub use error::ConfigError;
pub use gesture::{analyze_window, BaselineState, Direction, GestureDetector, GestureResult};
pub use spectrum::FftEngine;
