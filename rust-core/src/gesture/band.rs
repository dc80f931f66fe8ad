//! One-sided band growth and peak scan around the carrier bin
//!
//! The low-frequency (left) and high-frequency (right) sides of the window
//! are scanned by the same routine, walking away from the carrier in the
//! direction given by [`Side`].

/// Which side of the carrier a scan walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Toward lower bins (negative Doppler shift)
    Left,
    /// Toward higher bins (positive Doppler shift)
    Right,
}

impl Side {
    /// Index step when walking away from the carrier
    pub fn step(self) -> isize {
        match self {
            Side::Left => -1,
            Side::Right => 1,
        }
    }
}

/// First and last qualifying bins of a strong-peak scan
///
/// `start` is the qualifying bin closest to the carrier, `end` the one
/// farthest out. Bins between them need not all qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakSpan {
    pub start: usize,
    pub end: usize,
}

impl PeakSpan {
    /// Midpoint of the span, rounded toward `start`
    pub fn midpoint(&self) -> usize {
        if self.end >= self.start {
            self.start + (self.end - self.start) / 2
        } else {
            self.start - (self.start - self.end) / 2
        }
    }
}

/// Result of scanning one side of the carrier window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideScan {
    pub side: Side,

    /// Contiguous bins next to the carrier at or above the band threshold
    pub band: usize,

    /// First bin that failed the band threshold; `-1` or `len` if none did
    pub pointer: isize,

    /// Strong-peak span beyond the band, if any bin reached the peak threshold
    pub peak: Option<PeakSpan>,
}

impl SideScan {
    /// Window index reached by the band edge (`center ± band`)
    pub fn band_edge(&self, center: usize) -> isize {
        center as isize + self.side.step() * self.band as isize
    }
}

/// Scan one side of `window` away from `center`
///
/// Band growth counts bins from `center ± 1` outward while they stay at or
/// above `threshold`. The peak search then starts one bin past the first
/// failing bin and records the first and last bins at or above
/// `peak_threshold` up to the window edge.
pub fn scan_side(
    window: &[f64],
    center: usize,
    side: Side,
    threshold: f64,
    peak_threshold: f64,
) -> SideScan {
    let step = side.step();
    let len = window.len() as isize;
    let in_bounds = |i: isize| i >= 0 && i < len;

    let mut pointer = center as isize + step;
    let mut band = 0;
    while in_bounds(pointer) && window[pointer as usize] >= threshold {
        band += 1;
        pointer += step;
    }

    let mut peak: Option<PeakSpan> = None;
    let mut i = pointer + step;
    while in_bounds(i) {
        if window[i as usize] >= peak_threshold {
            let idx = i as usize;
            match peak.as_mut() {
                Some(span) => span.end = idx,
                None => peak = Some(PeakSpan { start: idx, end: idx }),
            }
        }
        i += step;
    }

    SideScan { side, band, pointer, peak }
}
