//! PyO3 bindings for Python integration

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::SpectrumError;

mod fft_bindings;
mod spectrum_bindings;

impl From<SpectrumError> for PyErr {
    fn from(err: SpectrumError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Python module definition
#[pymodule]
fn pcm_spectrum(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<fft_bindings::PyRadix2Fft>()?;
    m.add_class::<spectrum_bindings::PySpectrumAnalyzer>()?;

    Ok(())
}
