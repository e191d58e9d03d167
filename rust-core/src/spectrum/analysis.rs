//! High-level spectrum analyzer
//!
//! Turns a stream of PCM chunks into rate-limited magnitude spectra

use super::fft::Radix2Fft;
use crate::audio::buffer::{pcm_i16_to_f64, FrameAccumulator};
use crate::audio::throttle::FrameThrottle;
use crate::error::{Result, SpectrumError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Spectrum analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// FFT size (number of samples per frame, power of 2)
    pub fft_size: usize,

    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Frames completing sooner than this after the last processed one are dropped
    pub min_update_interval_ms: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            sample_rate: 44100.0,
            min_update_interval_ms: 80,
        }
    }
}

impl AnalyzerConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(SpectrumError::InvalidSize {
                size: self.fft_size,
            });
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(SpectrumError::InvalidSampleRate(self.sample_rate));
        }
        Ok(())
    }

    pub fn min_update_interval(&self) -> Duration {
        Duration::from_millis(self.min_update_interval_ms)
    }
}

/// Real-time spectrum analyzer
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    fft: Radix2Fft,
    accumulator: FrameAccumulator,
    throttle: FrameThrottle,

    /// Frame handed to the transform
    frame: Vec<f64>,
}

impl SpectrumAnalyzer {
    /// Create new spectrum analyzer
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        let fft = Radix2Fft::new(config.fft_size, config.sample_rate)?;
        debug!(
            fft_size = config.fft_size,
            sample_rate = config.sample_rate,
            min_update_interval_ms = config.min_update_interval_ms,
            "created spectrum analyzer"
        );

        Ok(Self {
            accumulator: FrameAccumulator::new(config.fft_size),
            throttle: FrameThrottle::new(config.min_update_interval()),
            frame: vec![0.0; config.fft_size],
            fft,
            config,
        })
    }

    /// Transform one complete frame, bypassing accumulation and throttling
    pub fn analyze(&mut self, frame: &[f64]) -> Result<&[f64]> {
        self.fft.forward(frame)
    }

    /// Transform one complete frame of signed 16-bit PCM
    pub fn analyze_pcm_i16(&mut self, frame: &[i16]) -> Result<&[f64]> {
        if frame.len() != self.frame.len() {
            return Err(SpectrumError::SizeMismatch {
                expected: self.frame.len(),
                actual: frame.len(),
            });
        }
        for (dst, &src) in self.frame.iter_mut().zip(frame) {
            *dst = pcm_i16_to_f64(src);
        }
        self.fft.forward(&self.frame)
    }

    /// Stream samples of any chunk length
    ///
    /// # Returns
    /// The newest spectrum if at least one frame was completed and admitted
    /// by the throttle during this call, `None` otherwise
    pub fn feed(&mut self, samples: &[f64], now: Instant) -> Result<Option<&[f64]>> {
        let updated = self.stream(samples.len(), now, |acc, offset| {
            acc.push(&samples[offset..])
        })?;
        Ok(updated.then(|| self.fft.spectrum()))
    }

    /// Stream signed 16-bit PCM samples of any chunk length
    pub fn feed_pcm_i16(&mut self, samples: &[i16], now: Instant) -> Result<Option<&[f64]>> {
        let updated = self.stream(samples.len(), now, |acc, offset| {
            acc.push_pcm_i16(&samples[offset..])
        })?;
        Ok(updated.then(|| self.fft.spectrum()))
    }

    fn stream<F>(&mut self, total: usize, now: Instant, mut push: F) -> Result<bool>
    where
        F: FnMut(&mut FrameAccumulator, usize) -> usize,
    {
        let mut offset = 0;
        let mut completed = false;

        // Draining after every push leaves room for at least one more frame.
        // Each pop overwrites `frame`, so it ends up holding the newest one.
        while offset < total {
            offset += push(&mut self.accumulator, offset);
            while self.accumulator.pop_frame(&mut self.frame) {
                completed = true;
            }
        }

        if !completed {
            return Ok(false);
        }
        if !self.throttle.admit(now) {
            trace!("discarding frame inside update interval");
            return Ok(false);
        }

        self.fft.forward(&self.frame)?;
        Ok(true)
    }

    /// Drop buffered samples and forget the last update time
    ///
    /// Call when the captured source changes so stale samples are not mixed
    /// into the next frame.
    pub fn reset(&mut self) {
        self.accumulator.clear();
        self.throttle.reset();
    }

    /// Last computed spectrum
    pub fn spectrum(&self) -> &[f64] {
        self.fft.spectrum()
    }

    /// Index and magnitude of the largest bin in the last spectrum
    pub fn peak_bin(&self) -> Option<(usize, f64)> {
        self.fft
            .spectrum()
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
    }

    /// Get frequency bins in Hz
    pub fn frequency_bins_hz(&self) -> Vec<f64> {
        self.fft.frequency_axis()
    }

    /// Update configuration
    ///
    /// Buffered samples are discarded. The FFT tables are rebuilt only when
    /// the size changes.
    pub fn update_config(&mut self, config: AnalyzerConfig) -> Result<()> {
        config.validate()?;

        if config.fft_size == self.config.fft_size {
            self.fft = Radix2Fft::with_tables(Arc::clone(self.fft.tables()), config.sample_rate)?;
            self.accumulator.clear();
        } else {
            self.fft = Radix2Fft::new(config.fft_size, config.sample_rate)?;
            self.accumulator = FrameAccumulator::new(config.fft_size);
            self.frame = vec![0.0; config.fft_size];
        }
        self.throttle = FrameThrottle::new(config.min_update_interval());
        self.config = config;
        Ok(())
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Get number of frequency bins
    pub fn num_bins(&self) -> usize {
        self.fft.num_bins()
    }
}
