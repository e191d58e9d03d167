//! Frame accumulation for streamed PCM
//!
//! Captured audio arrives in chunks of arbitrary length. Samples are collected
//! in a ring buffer until a full transform frame is available.

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};

/// Convert a signed 16-bit PCM sample to `[-1.0, 1.0)`
#[inline]
pub fn pcm_i16_to_f64(sample: i16) -> f64 {
    sample as f64 / 32768.0
}

/// Collects samples into fixed-length frames
pub struct FrameAccumulator {
    producer: HeapProducer<f64>,
    consumer: HeapConsumer<f64>,
    frame_len: usize,
}

impl FrameAccumulator {
    /// Create accumulator for frames of `frame_len` samples
    ///
    /// Room for two frames is reserved so a chunk straddling a frame boundary
    /// is not cut short.
    pub fn new(frame_len: usize) -> Self {
        let (producer, consumer) = HeapRb::<f64>::new(frame_len.max(1) * 2).split();

        Self {
            producer,
            consumer,
            frame_len,
        }
    }

    /// Append samples
    ///
    /// # Returns
    /// Number of samples written (less than `samples.len()` when full)
    pub fn push(&mut self, samples: &[f64]) -> usize {
        self.producer.push_slice(samples)
    }

    /// Append signed 16-bit PCM samples, normalized to `[-1.0, 1.0)`
    pub fn push_pcm_i16(&mut self, samples: &[i16]) -> usize {
        let mut converted = samples.iter().map(|&s| pcm_i16_to_f64(s));
        self.producer.push_iter(&mut converted)
    }

    /// Move one full frame into `frame`
    ///
    /// Returns false and leaves the buffer untouched when fewer than
    /// `frame_len` samples are buffered. `frame` must hold `frame_len` samples.
    pub fn pop_frame(&mut self, frame: &mut [f64]) -> bool {
        if self.consumer.len() < self.frame_len || frame.len() < self.frame_len {
            return false;
        }
        self.consumer.pop_slice(&mut frame[..self.frame_len]) == self.frame_len
    }

    /// Drop everything buffered, including a partial frame
    pub fn clear(&mut self) {
        while self.consumer.pop().is_some() {}
    }
}
