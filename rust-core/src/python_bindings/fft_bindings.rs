//! Python bindings for the radix-2 transform

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::spectrum::Radix2Fft;

/// Radix-2 FFT exposed to Python
#[pyclass(name = "Radix2Fft")]
pub struct PyRadix2Fft {
    fft: Radix2Fft,
}

#[pymethods]
impl PyRadix2Fft {
    /// Create a new transform
    ///
    /// Args:
    ///     size: Samples per frame (power of 2)
    ///     sample_rate: Sample rate in Hz
    #[new]
    fn new(size: usize, sample_rate: f64) -> PyResult<Self> {
        Ok(Self {
            fft: Radix2Fft::new(size, sample_rate)?,
        })
    }

    /// Magnitude spectrum of one frame
    ///
    /// Args:
    ///     signal: Exactly `size` samples as numpy array
    ///
    /// Returns:
    ///     size/2 magnitudes as numpy array
    fn forward<'py>(
        &mut self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let sig = signal
            .as_slice()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let spectrum = self.fft.forward(sig)?;

        Ok(PyArray1::from_slice(py, spectrum))
    }

    /// Frequency of every bin in Hz
    fn frequency_axis<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.fft.frequency_axis())
    }

    #[getter]
    fn size(&self) -> usize {
        self.fft.size()
    }

    #[getter]
    fn sample_rate(&self) -> f64 {
        self.fft.sample_rate()
    }

    fn num_bins(&self) -> usize {
        self.fft.num_bins()
    }
}
