//! Python bindings for spectrum analysis

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::time::Instant;

use crate::spectrum::{analysis::AnalyzerConfig, SpectrumAnalyzer};

/// Spectrum analyzer exposed to Python
#[pyclass(name = "SpectrumAnalyzer")]
pub struct PySpectrumAnalyzer {
    analyzer: SpectrumAnalyzer,
}

#[pymethods]
impl PySpectrumAnalyzer {
    /// Create a new spectrum analyzer
    ///
    /// Args:
    ///     fft_size: FFT size (number of samples, power of 2)
    ///     sample_rate: Sample rate in Hz
    ///     min_update_interval_ms: Frames completing sooner than this are dropped
    #[new]
    #[pyo3(signature = (fft_size=1024, sample_rate=44100.0, min_update_interval_ms=80))]
    fn new(fft_size: usize, sample_rate: f64, min_update_interval_ms: u64) -> PyResult<Self> {
        let config = AnalyzerConfig {
            fft_size,
            sample_rate,
            min_update_interval_ms,
        };

        Ok(Self {
            analyzer: SpectrumAnalyzer::new(config)?,
        })
    }

    /// Create from a JSON configuration string
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = AnalyzerConfig::from_json(json)?;
        Ok(Self {
            analyzer: SpectrumAnalyzer::new(config)?,
        })
    }

    /// Analyze one full frame and return the magnitude spectrum
    fn analyze<'py>(
        &mut self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let sig = signal
            .as_slice()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let spectrum = self.analyzer.analyze(sig)?;

        Ok(PyArray1::from_slice(py, spectrum))
    }

    /// Stream 16-bit PCM samples
    ///
    /// Returns:
    ///     The newest spectrum, or None if no frame was processed
    fn feed_pcm<'py>(
        &mut self,
        py: Python<'py>,
        samples: PyReadonlyArray1<i16>,
    ) -> PyResult<Option<&'py PyArray1<f64>>> {
        let pcm = samples
            .as_slice()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let spectrum = self.analyzer.feed_pcm_i16(pcm, Instant::now())?;

        Ok(spectrum.map(|s| PyArray1::from_slice(py, s)))
    }

    /// Drop buffered samples, e.g. after switching the captured source
    fn reset(&mut self) {
        self.analyzer.reset();
    }

    /// Get frequency bins in Hz
    fn frequency_bins_hz<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.analyzer.frequency_bins_hz())
    }

    /// Index and magnitude of the strongest bin
    fn peak_bin(&self) -> Option<(usize, f64)> {
        self.analyzer.peak_bin()
    }

    /// Get number of frequency bins
    fn num_bins(&self) -> usize {
        self.analyzer.num_bins()
    }

    /// Get current sample rate
    fn get_sample_rate(&self) -> f64 {
        self.analyzer.config().sample_rate
    }

    /// Get current FFT size
    fn get_fft_size(&self) -> usize {
        self.analyzer.config().fft_size
    }
}
