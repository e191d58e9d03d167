//! Error types shared by the transform, the analyzer and the bindings

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpectrumError {
    #[error("FFT size must be a power of two and at least 2 (got {size})")]
    InvalidSize { size: usize },

    #[error("Supplied buffer is not the same size as the FFT (expected {expected}, got {actual})")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Sample rate must be a positive finite number (got {0})")]
    InvalidSampleRate(f64),

    #[error("Failed to parse analyzer configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SpectrumError>;
