//! Gesture session - tone playback, capture and analysis thread
//!
//! Startup order: tone playback, settling delay, capture, analysis. The
//! analysis thread owns the frame reader, the detector and its baseline
//! state; nothing else is shared with it beyond the running flag.

use super::buffer::{read_padded_frame, AudioRingBuffer, FrameReader, FrameSource};
use super::input::{AudioError, AudioInput};
use super::output::{ToneGenerator, ToneOutput};
use crate::config::SessionConfig;
use crate::error::ConfigError;
use crate::gesture::{GestureDetector, GestureResult};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;

/// Label shown before the first gesture is detected
pub const IDLE_LABEL: &str = "None";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("Session is already running")]
    AlreadyRunning,
}

/// Where gesture labels are displayed
pub trait GestureSink: Send {
    fn show(&mut self, label: &str);
}

/// Forward a result to the sink unless it is a `None` gesture
///
/// Returns whether anything was shown. Suppressing `None` leaves the last
/// detected gesture on display.
pub fn present<K: GestureSink + ?Sized>(result: &GestureResult, sink: &mut K) -> bool {
    match result.label() {
        Some(label) => {
            sink.show(&label);
            true
        }
        None => false,
    }
}

/// Run frames through the detector until `running` is cleared
///
/// Returns the number of frames analysed.
pub fn run_analysis_loop<S, K>(
    source: &mut S,
    detector: &mut GestureDetector,
    sink: &mut K,
    running: &AtomicBool,
) -> u64
where
    S: FrameSource + ?Sized,
    K: GestureSink + ?Sized,
{
    let mut frame = vec![0.0; detector.fft_size()];
    let mut frames = 0;

    while running.load(Ordering::SeqCst) {
        read_padded_frame(source, &mut frame);
        let result = detector.process_frame(&frame);
        present(&result, sink);
        frames += 1;
    }

    frames
}

/// A playing stream that startup can abandon
pub trait Pausable {
    fn pause(&self) -> Result<(), AudioError>;
}

impl Pausable for ToneOutput {
    fn pause(&self) -> Result<(), AudioError> {
        ToneOutput::pause(self)
    }
}

/// Open capture while `tone` is already playing
///
/// If `open_capture` fails the tone is paused before the error is returned,
/// so a failed start never leaves the carrier sounding.
pub fn open_capture_with_tone<T, C, F>(tone: T, open_capture: F) -> Result<(T, C), SessionError>
where
    T: Pausable,
    F: FnOnce() -> Result<C, SessionError>,
{
    match open_capture() {
        Ok(capture) => Ok((tone, capture)),
        Err(err) => {
            if let Err(pause_err) = tone.pause() {
                warn!("Failed to pause tone after capture error: {}", pause_err);
            }
            Err(err)
        }
    }
}

/// Live gesture session on the default audio devices
pub struct GestureSession {
    config: SessionConfig,
    tone: Option<ToneOutput>,
    input: Option<AudioInput>,
    process_thread: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl GestureSession {
    /// Create a session; fails early if the detector configuration is invalid
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        GestureDetector::new(&config.detector)?;

        Ok(Self {
            config,
            tone: None,
            input: None,
            process_thread: None,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start the tone, then capture and analysis
    pub fn start<K: GestureSink + 'static>(&mut self, sink: K) -> Result<(), SessionError> {
        if self.is_running() {
            return Err(SessionError::AlreadyRunning);
        }

        let detector_config = &self.config.detector;
        let sample_rate = detector_config.sample_rate;
        let mut detector = GestureDetector::new(detector_config)?;

        let amplitude = self.config.tone_amplitude;
        let tone = ToneGenerator::new(detector_config.carrier_hz, sample_rate, amplitude);
        let output = ToneOutput::from_default_device(tone, sample_rate)?;
        output.start()?;

        let settle = Duration::from_millis(self.config.settle_ms);
        let ring_capacity = self.config.effective_ring_capacity();
        let (output, (input, consumer)) = open_capture_with_tone(output, || {
            // Let the speaker settle before listening
            std::thread::sleep(settle);

            let (producer, consumer) = AudioRingBuffer::new(ring_capacity).split();
            let input = AudioInput::from_default_device(producer, sample_rate)?;
            input.start()?;
            Ok((input, consumer))
        })?;
        self.tone = Some(output);
        self.input = Some(input);

        let timeout = Duration::from_millis(self.config.read_timeout_ms);
        let mut reader = FrameReader::new(consumer, timeout);
        let mut sink = sink;
        sink.show(IDLE_LABEL);

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        let handle = std::thread::spawn(move || {
            let frames = run_analysis_loop(&mut reader, &mut detector, &mut sink, &running);
            info!("Analysis stopped after {} frames", frames);
        });
        self.process_thread = Some(handle);

        info!("Gesture session started");
        Ok(())
    }

    /// Stop analysis and pause both streams
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.process_thread.take() {
            let _ = handle.join();
        }

        if let Some(input) = self.input.take() {
            let _ = input.pause();
        }

        if let Some(tone) = self.tone.take() {
            let _ = tone.pause();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for GestureSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;
    use std::collections::VecDeque;
    use std::f64::consts::PI;
    use std::sync::Mutex;

    /// Replays prepared frames, then clears the running flag
    struct ScriptedSource {
        frames: VecDeque<Vec<f64>>,
        running: Arc<AtomicBool>,
    }

    impl FrameSource for ScriptedSource {
        fn read_frame(&mut self, frame: &mut [f64]) -> usize {
            let next = self.frames.pop_front().unwrap_or_default();
            if self.frames.is_empty() {
                self.running.store(false, Ordering::SeqCst);
            }
            let n = next.len().min(frame.len());
            frame[..n].copy_from_slice(&next[..n]);
            n
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<String>>>);

    impl GestureSink for RecordingSink {
        fn show(&mut self, label: &str) {
            self.0.lock().unwrap().push(label.to_string());
        }
    }

    fn tones(bins: &[(usize, f64)]) -> Vec<f64> {
        (0..2048)
            .map(|i| {
                bins.iter()
                    .map(|&(bin, amp)| amp * (2.0 * PI * bin as f64 * i as f64 / 2048.0).cos())
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_loop_suppresses_none() {
        let running = Arc::new(AtomicBool::new(true));
        let carrier = tones(&[(859, 0.8)]);
        let mut source = ScriptedSource {
            frames: VecDeque::from(vec![
                carrier.clone(),
                tones(&[(859, 0.8), (849, 0.5)]),
                carrier.clone(),
                tones(&[(859, 0.8), (871, 0.5)]),
                carrier,
            ]),
            running: Arc::clone(&running),
        };
        let mut detector = GestureDetector::new(&DetectorConfig::default()).unwrap();
        let sink = RecordingSink::default();
        let mut sink_handle = sink.clone();

        let frames = run_analysis_loop(&mut source, &mut detector, &mut sink_handle, &running);

        assert_eq!(frames, 5);
        assert_eq!(
            *sink.0.lock().unwrap(),
            vec!["Pull\n18284 Hz".to_string(), "Push\n18758 Hz".to_string()]
        );
    }

    #[test]
    fn test_loop_analyses_partial_frames() {
        let running = Arc::new(AtomicBool::new(true));
        let mut source = ScriptedSource {
            frames: VecDeque::from(vec![vec![0.1; 100]]),
            running: Arc::clone(&running),
        };
        let mut detector = GestureDetector::new(&DetectorConfig::default()).unwrap();
        let mut sink = RecordingSink::default();

        assert_eq!(run_analysis_loop(&mut source, &mut detector, &mut sink, &running), 1);
        assert!(detector.baseline().is_initialized());
    }

    #[test]
    fn test_loop_not_entered_when_stopped() {
        let running = AtomicBool::new(false);
        let mut source = ScriptedSource {
            frames: VecDeque::new(),
            running: Arc::new(AtomicBool::new(false)),
        };
        let mut detector = GestureDetector::new(&DetectorConfig::default()).unwrap();
        let mut sink = RecordingSink::default();

        assert_eq!(run_analysis_loop(&mut source, &mut detector, &mut sink, &running), 0);
        assert!(!detector.baseline().is_initialized());
    }

    /// Stand-in for a playing tone that records whether it was paused
    struct FakeTone(Arc<AtomicBool>);

    impl Pausable for FakeTone {
        fn pause(&self) -> Result<(), AudioError> {
            self.0.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_failed_capture_pauses_tone() {
        let paused = Arc::new(AtomicBool::new(false));
        let tone = FakeTone(Arc::clone(&paused));

        let result: Result<(FakeTone, ()), _> =
            open_capture_with_tone(tone, || Err(AudioError::NoDevice.into()));

        assert!(matches!(result, Err(SessionError::Audio(AudioError::NoDevice))));
        assert!(paused.load(Ordering::SeqCst));
    }

    #[test]
    fn test_successful_capture_keeps_tone_playing() {
        let paused = Arc::new(AtomicBool::new(false));
        let tone = FakeTone(Arc::clone(&paused));

        let (_tone, capture) = open_capture_with_tone(tone, || Ok(7)).unwrap();

        assert_eq!(capture, 7);
        assert!(!paused.load(Ordering::SeqCst));
    }

    #[test]
    fn test_present() {
        use crate::gesture::Direction;

        let mut sink = RecordingSink::default();
        let none = GestureResult { direction: Direction::None, frequency_hz: 18500 };
        let pull = GestureResult { direction: Direction::Pull, frequency_hz: 18400 };

        assert!(!present(&none, &mut sink));
        assert!(present(&pull, &mut sink));
        assert_eq!(*sink.0.lock().unwrap(), vec!["Pull\n18400 Hz".to_string()]);
    }

    #[test]
    fn test_session_rejects_bad_config() {
        let mut config = SessionConfig::default();
        config.detector.fft_size = 1000;
        let err = GestureSession::new(config).err().unwrap();
        assert!(matches!(err, SessionError::Config(ConfigError::NotPowerOfTwo(1000))));
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = GestureSession::new(SessionConfig::default()).unwrap();
        assert!(!session.is_running());
        assert_eq!(session.config().settle_ms, 300);
    }
}
