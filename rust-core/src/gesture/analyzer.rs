//! Push/pull classification from the carrier window
//!
//! Motion toward the microphone shifts reflected energy above the carrier
//! (push), motion away shifts it below (pull). Each side of the window is
//! checked for a band wider than the idle baseline and for isolated strong
//! peaks; the winning side also yields an estimate of the shifted frequency.

use super::band::{scan_side, Side, SideScan};
use super::layout::CarrierLayout;
use crate::config::{
    DetectorConfig, BAND_THRESHOLD_RATIO, LEFT_BASELINE_WIDTH, PEAK_THRESHOLD_RATIO,
    RIGHT_BASELINE_WIDTH, WINDOW_LEN,
};
use crate::error::ConfigError;
use log::debug;
use std::fmt;

/// Detected gesture direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Energy below the carrier: hand moving away
    Pull,
    /// Energy above the carrier: hand moving closer
    Push,
    /// No shift beyond the idle baseline
    None,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Pull => "Pull",
            Direction::Push => "Push",
            Direction::None => "None",
        };
        f.write_str(name)
    }
}

/// Classification of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureResult {
    pub direction: Direction,

    /// Estimated frequency of the dominant shifted component, whole Hz
    pub frequency_hz: u32,
}

impl GestureResult {
    /// Display text for the result, or `None` when nothing should be shown
    pub fn label(&self) -> Option<String> {
        match self.direction {
            Direction::None => None,
            direction => Some(format!("{}\n{} Hz", direction, self.frequency_hz)),
        }
    }
}

/// Thresholds and idle band widths used by the analyzer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Band-growth threshold as a fraction of the carrier magnitude
    pub band_threshold_ratio: f64,

    /// Strong-peak threshold as a fraction of the carrier magnitude
    pub peak_threshold_ratio: f64,

    pub left_baseline: usize,
    pub right_baseline: usize,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            band_threshold_ratio: BAND_THRESHOLD_RATIO,
            peak_threshold_ratio: PEAK_THRESHOLD_RATIO,
            left_baseline: LEFT_BASELINE_WIDTH,
            right_baseline: RIGHT_BASELINE_WIDTH,
        }
    }
}

impl From<&DetectorConfig> for Calibration {
    fn from(config: &DetectorConfig) -> Self {
        Self {
            band_threshold_ratio: config.band_threshold_ratio,
            peak_threshold_ratio: config.peak_threshold_ratio,
            left_baseline: config.left_baseline,
            right_baseline: config.right_baseline,
        }
    }
}

/// Idle band widths for one analysis session
///
/// Starts uncalibrated and is set exactly once, on the first analysed frame.
/// Each stream owns its own state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaselineState {
    left: usize,
    right: usize,
    initialized: bool,
}

impl BaselineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// `(left, right)` baseline widths once calibrated
    pub fn widths(&self) -> Option<(usize, usize)> {
        self.initialized.then_some((self.left, self.right))
    }

    /// Calibrate on first use and return the baseline widths
    fn calibrate(&mut self, calibration: &Calibration) -> (usize, usize) {
        if !self.initialized {
            self.left = calibration.left_baseline;
            self.right = calibration.right_baseline;
            self.initialized = true;
            debug!("Baseline band widths set: left={} right={}", self.left, self.right);
        }
        (self.left, self.right)
    }
}

/// Per-frame band analyzer
#[derive(Debug, Clone)]
pub struct BandAnalyzer {
    layout: CarrierLayout,
    calibration: Calibration,
}

impl BandAnalyzer {
    pub fn new(layout: CarrierLayout, calibration: Calibration) -> Self {
        Self { layout, calibration }
    }

    pub fn from_config(config: &DetectorConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(CarrierLayout::from_config(config)?, Calibration::from(config)))
    }

    pub fn layout(&self) -> &CarrierLayout {
        &self.layout
    }

    /// Classify one carrier window
    ///
    /// # Panics
    /// If `window` is not exactly `layout.window_len()` bins long.
    pub fn analyze(&self, window: &[f64], state: &mut BaselineState) -> GestureResult {
        assert_eq!(
            window.len(),
            self.layout.window_len(),
            "carrier window has the wrong number of bins"
        );

        let center = self.layout.center();
        let peak_strength = window[center];
        let threshold = peak_strength * self.calibration.band_threshold_ratio;
        let peak_threshold = peak_strength * self.calibration.peak_threshold_ratio;

        let left = scan_side(window, center, Side::Left, threshold, peak_threshold);
        let right = scan_side(window, center, Side::Right, threshold, peak_threshold);

        let (left_base, right_base) = state.calibrate(&self.calibration);
        let left_grown = left.band > left_base;
        let right_grown = right.band > right_base;

        // Right side is checked last and wins when both sides fire
        let mut direction = Direction::None;
        if left_grown || left.peak.is_some() {
            direction = Direction::Pull;
        }
        if right_grown || right.peak.is_some() {
            direction = Direction::Push;
        }

        let frequency = self.estimate_frequency(center, &left, &right, left_grown, right_grown);

        GestureResult {
            direction,
            frequency_hz: frequency as u32,
        }
    }

    fn estimate_frequency(
        &self,
        center: usize,
        left: &SideScan,
        right: &SideScan,
        left_grown: bool,
        right_grown: bool,
    ) -> f64 {
        let bin = if left_grown {
            left.band_edge(center)
        } else if right_grown {
            right.band_edge(center)
        } else if let Some(span) = left.peak {
            span.midpoint() as isize
        } else if let Some(span) = right.peak {
            span.midpoint() as isize
        } else {
            return self.layout.carrier_hz();
        };

        self.layout.bin_to_frequency(bin)
    }
}

impl Default for BandAnalyzer {
    fn default() -> Self {
        Self::new(CarrierLayout::default(), Calibration::default())
    }
}

/// Classify a default-sized carrier window with the default calibration
pub fn analyze_window(window: &[f64; WINDOW_LEN], state: &mut BaselineState) -> GestureResult {
    BandAnalyzer::default().analyze(window, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Window with only the carrier bin set, plus overrides
    fn window_with(values: &[(usize, f64)]) -> [f64; WINDOW_LEN] {
        let mut window = [0.0; WINDOW_LEN];
        window[33] = 10.0;
        for &(i, v) in values {
            window[i] = v;
        }
        window
    }

    fn fill(range: std::ops::RangeInclusive<usize>, v: f64) -> Vec<(usize, f64)> {
        range.map(|i| (i, v)).collect()
    }

    #[test]
    fn test_baseline_initialises_once() {
        let mut state = BaselineState::new();
        assert!(!state.is_initialized());
        assert_eq!(state.widths(), None);

        // Wide left band on the first frame must not leak into the baseline
        analyze_window(&window_with(&fill(20..=32, 9.0)), &mut state);
        assert_eq!(state.widths(), Some((4, 5)));

        for window in [[1.0; WINDOW_LEN], [0.0; WINDOW_LEN], window_with(&[(60, 8.0)])] {
            analyze_window(&window, &mut state);
            assert_eq!(state.widths(), Some((4, 5)));
        }
    }

    #[test]
    fn test_baseline_uses_configured_widths() {
        let config = DetectorConfig {
            left_baseline: 2,
            right_baseline: 7,
            ..DetectorConfig::default()
        };
        let analyzer = BandAnalyzer::from_config(&config).unwrap();
        let mut state = BaselineState::new();
        analyzer.analyze(&window_with(&[]), &mut state);
        assert_eq!(state.widths(), Some((2, 7)));
    }

    #[test]
    fn test_left_band_growth_is_pull() {
        let mut values = fill(28..=32, 2.0);
        values.push((60, 2.0));
        let mut state = BaselineState::new();
        let result = analyze_window(&window_with(&values), &mut state);

        // Five bins beat the left baseline of four; estimate at bin 33 - 5
        assert_eq!(result.direction, Direction::Pull);
        assert_eq!(result.frequency_hz, 18392);
    }

    #[test]
    fn test_right_peak_overrides_direction_not_frequency() {
        // Bin 60 reaches 0.3 x carrier, so the right side fires as a peak
        let mut values = fill(28..=32, 2.0);
        values.push((60, 4.0));
        let mut state = BaselineState::new();
        let result = analyze_window(&window_with(&values), &mut state);

        assert_eq!(result.direction, Direction::Push);
        assert_eq!(result.frequency_hz, 18392);
    }

    #[test]
    fn test_carrier_only_is_none() {
        let mut state = BaselineState::new();
        let result = analyze_window(&window_with(&[]), &mut state);

        assert_eq!(result.direction, Direction::None);
        assert_eq!(result.frequency_hz, 18500);
        assert_eq!(result.label(), None);
    }

    #[test]
    fn test_flat_window_fills_both_bands() {
        let mut state = BaselineState::new();
        let result = analyze_window(&[10.0; WINDOW_LEN], &mut state);

        // Both bands span 33 bins; push wins, frequency from the left edge (bin 0)
        assert_eq!(result.direction, Direction::Push);
        assert_eq!(result.frequency_hz, 17789);
    }

    #[test]
    fn test_right_band_growth_is_push() {
        let mut state = BaselineState::new();
        let result = analyze_window(&window_with(&fill(34..=39, 2.0)), &mut state);

        assert_eq!(result.direction, Direction::Push);
        assert_eq!(result.frequency_hz, 18629);
    }

    #[test]
    fn test_band_at_baseline_is_idle() {
        let mut state = BaselineState::new();
        let mut values = fill(29..=32, 2.0);
        values.extend(fill(34..=38, 2.0));
        let result = analyze_window(&window_with(&values), &mut state);

        assert_eq!(result.direction, Direction::None);
        assert_eq!(result.frequency_hz, 18500);
    }

    #[test]
    fn test_left_peak_midpoint() {
        let mut state = BaselineState::new();
        let result = analyze_window(&window_with(&[(20, 5.0), (15, 4.0)]), &mut state);

        // Span 20..15, midpoint 20 - 5/2 = 18
        assert_eq!(result.direction, Direction::Pull);
        assert_eq!(result.frequency_hz, 18177);
    }

    #[test]
    fn test_right_peak_only() {
        let mut state = BaselineState::new();
        let result = analyze_window(&window_with(&[(45, 4.0)]), &mut state);

        assert_eq!(result.direction, Direction::Push);
        assert_eq!(result.frequency_hz, 18758);
    }

    #[test]
    fn test_peaks_on_window_edges() {
        let mut state = BaselineState::new();

        let pull = analyze_window(&window_with(&[(0, 4.0)]), &mut state);
        assert_eq!(pull.direction, Direction::Pull);
        assert_eq!(pull.frequency_hz, 17789);

        let push = analyze_window(&window_with(&[(66, 4.0)]), &mut state);
        assert_eq!(push.direction, Direction::Push);
        assert_eq!(push.frequency_hz, 19210);
    }

    #[test]
    fn test_left_peak_estimate_beats_right_peak() {
        let mut state = BaselineState::new();
        let result = analyze_window(&window_with(&[(20, 5.0), (50, 5.0)]), &mut state);

        assert_eq!(result.direction, Direction::Push);
        assert_eq!(result.frequency_hz, 18220);
    }

    #[test]
    fn test_independent_sessions() {
        let analyzer = BandAnalyzer::default();
        let mut a = BaselineState::new();
        let b = BaselineState::new();

        analyzer.analyze(&window_with(&[]), &mut a);
        assert!(a.is_initialized());
        assert!(!b.is_initialized());
    }

    #[test]
    fn test_labels() {
        let pull = GestureResult { direction: Direction::Pull, frequency_hz: 18392 };
        let push = GestureResult { direction: Direction::Push, frequency_hz: 18629 };

        assert_eq!(pull.label().as_deref(), Some("Pull\n18392 Hz"));
        assert_eq!(push.label().as_deref(), Some("Push\n18629 Hz"));
        assert_eq!(Direction::None.to_string(), "None");
    }

    #[test]
    #[should_panic(expected = "wrong number of bins")]
    fn test_wrong_window_length() {
        let mut state = BaselineState::new();
        BandAnalyzer::default().analyze(&[1.0; 66], &mut state);
    }
}
