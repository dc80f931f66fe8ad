//! Doppler gesture detection around the carrier bin

pub mod layout;
pub mod band;
pub mod analyzer;
pub mod detector;

pub use layout::CarrierLayout;
pub use band::{scan_side, PeakSpan, Side, SideScan};
pub use analyzer::{
    analyze_window, BandAnalyzer, BaselineState, Calibration, Direction, GestureResult,
};
pub use detector::GestureDetector;
