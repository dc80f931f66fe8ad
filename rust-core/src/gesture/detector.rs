//! Frame-to-gesture pipeline
//!
//! Owns every buffer the hot loop touches so processing a frame never
//! allocates.

use super::analyzer::{BandAnalyzer, BaselineState, GestureResult};
use crate::config::DetectorConfig;
use crate::error::ConfigError;
use crate::spectrum::{magnitude_spectrum, FftEngine};
use log::debug;

/// Transform engine, analyzer and baseline for one analysis stream
pub struct GestureDetector {
    engine: FftEngine,
    analyzer: BandAnalyzer,
    baseline: BaselineState,
    apply_blackman: bool,

    /// Reusable transform buffers
    real: Vec<f64>,
    imag: Vec<f64>,
    magnitudes: Vec<f64>,
}

impl GestureDetector {
    pub fn new(config: &DetectorConfig) -> Result<Self, ConfigError> {
        let engine = FftEngine::new(config.fft_size)?;
        let analyzer = BandAnalyzer::from_config(config)?;

        let layout = analyzer.layout();
        debug!(
            "Carrier bin {} (window {:?}, {:.3} Hz/bin)",
            layout.carrier_bin(),
            layout.window_range(),
            layout.hz_per_bin()
        );

        let n = engine.fft_size();
        Ok(Self {
            real: vec![0.0; n],
            imag: vec![0.0; n],
            magnitudes: vec![0.0; engine.num_bins()],
            engine,
            analyzer,
            baseline: BaselineState::new(),
            apply_blackman: config.apply_blackman,
        })
    }

    /// Classify one frame of normalised samples
    ///
    /// A frame shorter than the FFT size is zero-padded; extra samples are
    /// ignored.
    pub fn process_frame(&mut self, frame: &[f64]) -> GestureResult {
        let copy_len = frame.len().min(self.real.len());
        self.real[..copy_len].copy_from_slice(&frame[..copy_len]);
        self.real[copy_len..].fill(0.0);
        self.imag.fill(0.0);

        if self.apply_blackman {
            self.engine.apply_window(&mut self.real);
        }

        self.engine.transform(&mut self.real, &mut self.imag);
        magnitude_spectrum(&self.real, &self.imag, &mut self.magnitudes);

        let window = self.analyzer.layout().carrier_window(&self.magnitudes);
        self.analyzer.analyze(window, &mut self.baseline)
    }

    /// Magnitude spectrum of the most recent frame
    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn baseline(&self) -> &BaselineState {
        &self.baseline
    }

    pub fn fft_size(&self) -> usize {
        self.engine.fft_size()
    }

    /// Start a new session: the next frame recalibrates the baseline
    pub fn reset(&mut self) {
        self.baseline = BaselineState::new();
    }
}
