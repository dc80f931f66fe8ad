//! Lock-free ring buffer between the capture callback and the analysis loop
//!
//! The capture side pushes normalised samples; the analysis side pulls them
//! back out one fixed-size frame at a time.

use log::warn;
use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use std::time::{Duration, Instant};

/// Thread-safe audio ring buffer
pub struct AudioRingBuffer {
    producer: HeapProducer<f64>,
    consumer: HeapConsumer<f64>,
    capacity: usize,
}

impl AudioRingBuffer {
    /// Create new ring buffer with given capacity
    ///
    /// # Arguments
    /// * `capacity` - Buffer capacity in samples
    pub fn new(capacity: usize) -> Self {
        let rb = HeapRb::<f64>::new(capacity);
        let (producer, consumer) = rb.split();

        Self {
            producer,
            consumer,
            capacity,
        }
    }

    /// Split into producer and consumer ends
    pub fn split(self) -> (AudioProducer, AudioConsumer) {
        (
            AudioProducer {
                producer: self.producer,
            },
            AudioConsumer {
                consumer: self.consumer,
            },
        )
    }

    /// Get buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Producer end of audio ring buffer (for writing)
pub struct AudioProducer {
    producer: HeapProducer<f64>,
}

impl AudioProducer {
    /// Write samples to buffer
    ///
    /// # Returns
    /// Number of samples actually written (may be less if buffer is full)
    pub fn write(&mut self, samples: &[f64]) -> usize {
        self.producer.push_slice(samples)
    }

    /// Get number of free slots
    pub fn free_len(&self) -> usize {
        self.producer.free_len()
    }
}

/// Consumer end of audio ring buffer (for reading)
pub struct AudioConsumer {
    consumer: HeapConsumer<f64>,
}

impl AudioConsumer {
    /// Read whatever is available, up to `buffer.len()` samples
    pub fn read(&mut self, buffer: &mut [f64]) -> usize {
        self.consumer.pop_slice(buffer)
    }

    /// Get number of available samples
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }
}

/// Anything that can hand the analysis loop one frame at a time
pub trait FrameSource {
    /// Fill `frame` from the start, blocking until it is full or the source
    /// gives up. Returns the number of samples written.
    fn read_frame(&mut self, frame: &mut [f64]) -> usize;
}

/// Blocking frame reader over the capture ring buffer
pub struct FrameReader {
    consumer: AudioConsumer,
    timeout: Duration,
}

impl FrameReader {
    /// # Arguments
    /// * `consumer` - Ring buffer consumer fed by the capture stream
    /// * `timeout` - Longest wait for a frame to fill
    pub fn new(consumer: AudioConsumer, timeout: Duration) -> Self {
        Self { consumer, timeout }
    }
}

impl FrameSource for FrameReader {
    fn read_frame(&mut self, frame: &mut [f64]) -> usize {
        let deadline = Instant::now() + self.timeout;
        let mut total_read = 0;

        while total_read < frame.len() {
            let n = self.consumer.read(&mut frame[total_read..]);
            total_read += n;

            if n == 0 {
                if Instant::now() >= deadline {
                    break;
                }
                // Short sleep keeps latency low without spinning a core
                std::thread::sleep(Duration::from_micros(100));
            }
        }

        total_read
    }
}

/// Read one frame, zero-padding and warning if the source came up short
///
/// Returns the number of real samples in the frame.
pub fn read_padded_frame<S: FrameSource + ?Sized>(source: &mut S, frame: &mut [f64]) -> usize {
    let read = source.read_frame(frame);
    if read < frame.len() {
        warn!("Partial frame: read {} of {} samples, zero-padding", read, frame.len());
        frame[read..].fill(0.0);
    }
    read
}
