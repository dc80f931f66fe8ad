//! Tone playback, microphone capture and the live session, using cpal

pub mod input;
pub mod output;
pub mod buffer;
pub mod session;

pub use input::{AudioError, AudioInput};
pub use output::{ToneGenerator, ToneOutput};
pub use buffer::{AudioRingBuffer, FrameReader, FrameSource};
pub use session::{GestureSession, GestureSink, SessionError};
