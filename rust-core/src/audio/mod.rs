//! Streaming PCM into transform-sized frames

pub mod buffer;
pub mod throttle;

pub use buffer::{pcm_i16_to_f64, FrameAccumulator};
pub use throttle::FrameThrottle;
