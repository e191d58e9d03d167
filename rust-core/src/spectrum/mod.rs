//! Spectral analysis with a radix-2 FFT

pub mod tables;
pub mod fft;
pub mod analysis;

pub use tables::{BitReversalTable, FftTables, TwiddleTable};
pub use fft::Radix2Fft;
pub use analysis::{AnalyzerConfig, SpectrumAnalyzer};
