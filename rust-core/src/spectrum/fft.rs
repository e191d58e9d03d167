//! Radix-2 decimation-in-time FFT for real-valued frames
//!
//! Iterative Cooley-Tukey transform over precomputed bit-reversal and twiddle
//! tables. Scratch and output buffers are allocated once and reused, so a
//! forward transform never allocates.

use super::tables::FftTables;
use crate::error::{Result, SpectrumError};
use std::sync::Arc;

/// Forward FFT producing a magnitude spectrum
///
/// `forward` takes `&mut self` because the scratch buffers are overwritten on
/// every call. Use one instance per concurrent caller; instances can share
/// their tables through [`Radix2Fft::with_tables`].
#[derive(Debug, Clone)]
pub struct Radix2Fft {
    tables: Arc<FftTables>,

    /// Metadata only, used for labelling bins
    sample_rate: f64,

    /// Real part of the working signal
    real: Vec<f64>,

    /// Imaginary part of the working signal
    imag: Vec<f64>,

    /// Magnitudes of bins `0..size/2`
    spectrum: Vec<f64>,
}

impl Radix2Fft {
    /// Create a transform of `size` samples
    ///
    /// # Arguments
    /// * `size` - Number of samples per frame (power of two, at least 2)
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Errors
    /// `InvalidSize` or `InvalidSampleRate`
    pub fn new(size: usize, sample_rate: f64) -> Result<Self> {
        let tables = Arc::new(FftTables::new(size)?);
        Self::with_tables(tables, sample_rate)
    }

    /// Create a transform that reuses existing tables
    ///
    /// The new instance owns its own scratch buffers, so it can run alongside
    /// the instance the tables came from.
    pub fn with_tables(tables: Arc<FftTables>, sample_rate: f64) -> Result<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SpectrumError::InvalidSampleRate(sample_rate));
        }

        let size = tables.size();
        Ok(Self {
            tables,
            sample_rate,
            real: vec![0.0; size],
            imag: vec![0.0; size],
            spectrum: vec![0.0; size / 2],
        })
    }

    /// Compute the magnitude spectrum of one frame
    ///
    /// # Arguments
    /// * `input` - Exactly `size` samples; left untouched
    ///
    /// # Returns
    /// `2 * |X[k]| / size` for `k = 0..size/2`. The slice is overwritten by the
    /// next call.
    ///
    /// # Errors
    /// `SizeMismatch` if `input.len() != size`. The previous spectrum is kept.
    pub fn forward(&mut self, input: &[f64]) -> Result<&[f64]> {
        let n = self.tables.size();
        if input.len() != n {
            return Err(SpectrumError::SizeMismatch {
                expected: n,
                actual: input.len(),
            });
        }

        let Self {
            tables,
            real,
            imag,
            spectrum,
            ..
        } = self;

        for (i, &rev) in tables.reverse().as_slice().iter().enumerate() {
            real[i] = input[rev];
            imag[i] = 0.0;
        }

        let twiddles = tables.twiddles();
        let mut half_size = 1;
        while half_size < n {
            let (step_real, step_imag) = twiddles.step(half_size);
            let mut cur_real = 1.0;
            let mut cur_imag = 0.0;

            for fft_step in 0..half_size {
                for i in (fft_step..n).step_by(half_size << 1) {
                    let off = i + half_size;
                    let tr = cur_real * real[off] - cur_imag * imag[off];
                    let ti = cur_real * imag[off] + cur_imag * real[off];

                    real[off] = real[i] - tr;
                    imag[off] = imag[i] - ti;
                    real[i] += tr;
                    imag[i] += ti;
                }

                let tmp_real = cur_real;
                cur_real = tmp_real * step_real - cur_imag * step_imag;
                cur_imag = tmp_real * step_imag + cur_imag * step_real;
            }

            half_size <<= 1;
        }

        let len = n as f64;
        for ((out, &re), &im) in spectrum.iter_mut().zip(real.iter()).zip(imag.iter()) {
            *out = 2.0 * (re * re + im * im).sqrt() / len;
        }

        Ok(spectrum.as_slice())
    }

    /// Spectrum from the last successful `forward` (zeros before the first call)
    pub fn spectrum(&self) -> &[f64] {
        &self.spectrum
    }

    pub fn size(&self) -> usize {
        self.tables.size()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Number of magnitude bins (`size / 2`)
    pub fn num_bins(&self) -> usize {
        self.spectrum.len()
    }

    /// Shared handle to the lookup tables
    pub fn tables(&self) -> &Arc<FftTables> {
        &self.tables
    }

    /// Centre frequency of `bin` in Hz
    pub fn bin_to_frequency(&self, bin: usize) -> f64 {
        bin as f64 * self.sample_rate / self.size() as f64
    }

    /// Frequency of every output bin in Hz
    pub fn frequency_axis(&self) -> Vec<f64> {
        (0..self.num_bins())
            .map(|bin| self.bin_to_frequency(bin))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex;
    use realfft::RealFftPlanner;
    use std::f64::consts::PI;

    /// Deterministic pseudo-random frame in [-1, 1)
    fn noise(len: usize, seed: u64) -> Vec<f64> {
        let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
            })
            .collect()
    }

    fn naive_magnitudes(input: &[f64]) -> Vec<f64> {
        let n = input.len();
        (0..n / 2)
            .map(|k| {
                let sum: Complex<f64> = input
                    .iter()
                    .enumerate()
                    .map(|(t, &x)| {
                        Complex::from_polar(x, -2.0 * PI * (k * t) as f64 / n as f64)
                    })
                    .sum();
                2.0 * sum.norm() / n as f64
            })
            .collect()
    }

    #[test]
    fn test_four_point_cycle() {
        let mut fft = Radix2Fft::new(4, 8.0).unwrap();
        let spectrum = fft.forward(&[1.0, 0.0, -1.0, 0.0]).unwrap();

        assert_eq!(spectrum.len(), 2);
        assert_abs_diff_eq!(spectrum[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(spectrum[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_fft_dc_signal() {
        let mut fft = Radix2Fft::new(64, 48000.0).unwrap();
        let spectrum = fft.forward(&[-0.75; 64]).unwrap();

        assert_abs_diff_eq!(spectrum[0], 1.5, epsilon = 1e-9);
        for &mag in &spectrum[1..] {
            assert_abs_diff_eq!(mag, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_input_gives_exact_zeros() {
        let mut fft = Radix2Fft::new(256, 44100.0).unwrap();
        let spectrum = fft.forward(&[0.0; 256]).unwrap();
        assert!(spectrum.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_fft_sine_wave() {
        let size = 8;
        let k = 2;
        let signal: Vec<f64> = (0..size)
            .map(|n| (2.0 * PI * (k * n) as f64 / size as f64).sin())
            .collect();

        let mut fft = Radix2Fft::new(size, 8.0).unwrap();
        let spectrum = fft.forward(&signal).unwrap();

        for (bin, &mag) in spectrum.iter().enumerate() {
            let expected = if bin == k { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(mag, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_matches_naive_dft() {
        for size in [2, 4, 16, 128] {
            let signal = noise(size, size as u64);
            let mut fft = Radix2Fft::new(size, 1.0).unwrap();
            let spectrum = fft.forward(&signal).unwrap();
            let expected = naive_magnitudes(&signal);

            for (got, want) in spectrum.iter().zip(expected.iter()) {
                assert_abs_diff_eq!(*got, *want, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_matches_realfft() {
        let size = 4096;
        let signal = noise(size, 7);

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(size);
        let mut input = signal.clone();
        let mut output = r2c.make_output_vec();
        r2c.process(&mut input, &mut output).unwrap();

        let mut fft = Radix2Fft::new(size, 44100.0).unwrap();
        let spectrum = fft.forward(&signal).unwrap();

        for (bin, &mag) in spectrum.iter().enumerate() {
            let expected = 2.0 * output[bin].norm() / size as f64;
            assert_abs_diff_eq!(mag, expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_size_mismatch_keeps_previous_spectrum() {
        let mut fft = Radix2Fft::new(8, 8.0).unwrap();
        let before = fft.forward(&[1.0; 8]).unwrap().to_vec();

        match fft.forward(&[1.0; 7]) {
            Err(SpectrumError::SizeMismatch { expected, actual }) => {
                assert_eq!(expected, 8);
                assert_eq!(actual, 7);
            }
            other => panic!("expected SizeMismatch, got {other:?}"),
        }
        assert!(matches!(
            fft.forward(&[0.0; 16]),
            Err(SpectrumError::SizeMismatch { .. })
        ));

        assert_eq!(fft.spectrum(), before.as_slice());

        // still usable afterwards
        let spectrum = fft.forward(&[0.0; 8]).unwrap();
        assert!(spectrum.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_calls_do_not_share_state() {
        let first = noise(32, 1);
        let second = noise(32, 2);

        let mut reused = Radix2Fft::new(32, 1.0).unwrap();
        reused.forward(&first).unwrap();
        let after_history = reused.forward(&second).unwrap().to_vec();

        let mut fresh = Radix2Fft::new(32, 1.0).unwrap();
        let clean = fresh.forward(&second).unwrap();

        assert_eq!(after_history.as_slice(), clean);
    }

    #[test]
    fn test_input_is_not_modified() {
        let signal = noise(16, 3);
        let copy = signal.clone();
        let mut fft = Radix2Fft::new(16, 1.0).unwrap();
        fft.forward(&signal).unwrap();
        assert_eq!(signal, copy);
    }

    #[test]
    fn test_shared_tables() {
        let mut a = Radix2Fft::new(64, 48000.0).unwrap();
        let mut b = Radix2Fft::with_tables(Arc::clone(a.tables()), 44100.0).unwrap();
        assert!(Arc::ptr_eq(a.tables(), b.tables()));

        let signal = noise(64, 9);
        let from_a = a.forward(&signal).unwrap().to_vec();
        b.forward(&[0.0; 64]).unwrap();

        // b's scratch buffers are its own
        assert_eq!(a.spectrum(), from_a.as_slice());
        assert_eq!(b.sample_rate(), 44100.0);
    }

    #[test]
    fn test_nan_propagates() {
        let mut fft = Radix2Fft::new(4, 1.0).unwrap();
        let spectrum = fft.forward(&[f64::NAN, 0.0, 0.0, 0.0]).unwrap();
        assert!(spectrum.iter().all(|m| m.is_nan()));
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            Radix2Fft::new(12, 44100.0),
            Err(SpectrumError::InvalidSize { size: 12 })
        ));
        assert!(matches!(
            Radix2Fft::new(1, 44100.0),
            Err(SpectrumError::InvalidSize { size: 1 })
        ));
        assert!(matches!(
            Radix2Fft::new(16, 0.0),
            Err(SpectrumError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            Radix2Fft::new(16, f64::NAN),
            Err(SpectrumError::InvalidSampleRate(_))
        ));
    }

    #[test]
    fn test_frequency_axis() {
        let fft = Radix2Fft::new(1024, 44100.0).unwrap();
        let freqs = fft.frequency_axis();

        assert_eq!(fft.num_bins(), 512);
        assert_eq!(freqs.len(), 512);
        assert_eq!(freqs[0], 0.0);
        assert_abs_diff_eq!(freqs[1], 44100.0 / 1024.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fft.bin_to_frequency(256), 11025.0, epsilon = 1e-9);
    }
}
