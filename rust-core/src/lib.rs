//! PCM Spectrum - Radix-2 Magnitude Spectrum Core
//!
//! Allocation-free forward FFT for fixed-size real frames, plus the frame
//! accumulation and update throttling needed to drive it from an audio stream.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod audio;
pub mod error;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use error::{Result, SpectrumError};
pub use spectrum::{AnalyzerConfig, FftTables, Radix2Fft, SpectrumAnalyzer};
