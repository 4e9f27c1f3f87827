/// Decimator with anti-aliasing filter.
///
/// This module provides a decimator that reduces the sample rate by an integer
/// factor, applying a low-pass FIR filter before decimation to prevent
/// aliasing. The receiver uses it to bring the front-end rate down to the
/// demodulator/audio rate.
///
/// The decimator uses a Hamming-windowed sinc filter with a cutoff frequency
/// set to half the Nyquist frequency of the decimated rate.
///
/// # Example
///
/// ```rust
/// use skywave::dsp::{Decimator, DspBlock};
/// use num_complex::Complex;
///
/// // Decimate by a factor of 8
/// let mut decimator = Decimator::new(8);
///
/// let input: Vec<Complex<f64>> = (0..1024)
///     .map(|i| Complex::new(i as f64, 0.0))
///     .collect();
///
/// let output = decimator.process(&input);
/// // Output length is approximately input.len() / factor
/// assert!(output.len() >= 120 && output.len() <= 130);
/// ```
use num_complex::Complex;
use std::f64::consts::PI;

use super::DspBlock;

/// A decimator that reduces the sample rate by an integer factor.
///
/// The decimator applies a Hamming-windowed sinc low-pass filter
/// before downsampling to prevent aliasing artifacts.
///
/// # Fields
/// - `factor`: The decimation factor (output rate = input rate / factor)
/// - `fir`: The FIR filter coefficients
/// - `buffer`: Internal buffer for maintaining state between process() calls
pub struct Decimator {
    factor: usize,
    fir: Vec<f64>,
    buffer: Vec<Complex<f64>>,
}

impl Decimator {
    /// Creates a new decimator with the specified decimation factor.
    ///
    /// # Arguments
    /// * `factor` - The decimation factor (must be > 0)
    ///
    /// # Panics
    /// Panics if `factor` is 0.
    pub fn new(factor: usize) -> Self {
        assert!(factor > 0, "Decimation factor must be greater than 0");
        Self::with_params(factor, 31, 0.5 / factor as f64)
    }

    /// Creates a new decimator with custom filter parameters.
    ///
    /// # Arguments
    /// * `factor` - The decimation factor (must be > 0)
    /// * `taps` - The number of FIR filter taps (should be odd)
    /// * `cutoff` - The normalized cutoff frequency (0.0 to 0.5)
    ///
    /// # Panics
    /// Panics if `factor` is 0 or if `cutoff` is not in (0.0, 0.5].
    pub fn with_params(factor: usize, taps: usize, cutoff: f64) -> Self {
        assert!(factor > 0, "Decimation factor must be greater than 0");
        assert!(
            cutoff > 0.0 && cutoff <= 0.5,
            "Cutoff must be in range (0.0, 0.5]"
        );

        let mut fir = Vec::with_capacity(taps);
        let mid = (taps / 2) as isize;

        // Hamming-windowed sinc filter
        for n in 0..taps {
            let x = n as isize - mid;
            let sinc = if x == 0 {
                2.0 * cutoff
            } else {
                (2.0 * cutoff * PI * x as f64).sin() / (PI * x as f64)
            };
            let window = 0.54 - 0.46 * ((2.0 * PI * n as f64) / (taps as f64 - 1.0)).cos();
            fir.push(sinc * window);
        }

        // Normalize filter to unity gain at DC
        let norm: f64 = fir.iter().sum();
        for v in fir.iter_mut() {
            *v /= norm;
        }

        Self {
            factor,
            fir,
            buffer: Vec::new(),
        }
    }

    /// Returns the decimation factor.
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Returns the number of FIR filter taps.
    pub fn taps(&self) -> usize {
        self.fir.len()
    }

    /// Clears the internal state buffer.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

impl DspBlock for Decimator {
    /// Processes input samples, applying anti-aliasing filter and decimation.
    ///
    /// The method maintains internal state so both the filter history and the
    /// decimation phase stay continuous across chunk boundaries.
    ///
    /// # Arguments
    /// * `data` - Input samples
    ///
    /// # Returns
    /// Decimated output samples (length ≈ input.len() / factor)
    fn process(&mut self, data: &[Complex<f64>]) -> Vec<Complex<f64>> {
        self.buffer.extend_from_slice(data);

        let taps = self.fir.len();
        let mut output = Vec::with_capacity(self.buffer.len() / self.factor + 1);

        // Slide the filter window in steps of `factor`; the window start for
        // the next call carries over exactly where this one stopped.
        let mut start = 0;
        while start + taps <= self.buffer.len() {
            let mut acc = Complex::new(0.0, 0.0);
            for (j, &coeff) in self.fir.iter().enumerate() {
                acc += self.buffer[start + j] * coeff;
            }
            output.push(acc);
            start += self.factor;
        }

        self.buffer.drain(0..start);
        output
    }
}
