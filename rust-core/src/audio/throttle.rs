//! Update rate limiting for spectrum frames
//!
//! Frames completing faster than the display can use them are discarded
//! instead of queued, so the newest data is always shown.

use std::time::{Duration, Instant};

/// Admits at most one frame per `min_interval`
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    min_interval: Duration,
    last_admitted: Option<Instant>,
}

impl FrameThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_admitted: None,
        }
    }

    /// Decide whether a frame completed at `now` should be processed
    pub fn admit(&mut self, now: Instant) -> bool {
        let ready = match self.last_admitted {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
        };
        if ready {
            self.last_admitted = Some(now);
        }
        ready
    }

    /// Forget the last admitted frame
    pub fn reset(&mut self) {
        self.last_admitted = None;
    }
}
