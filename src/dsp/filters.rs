//! Digital filter implementations.
//!
//! This module provides various digital filter implementations for signal processing:
//! - [`LowPassFir`]: Finite Impulse Response (FIR) low-pass filter
//!
//! # Example
//!
//! ```
//! use skywave::dsp::filters::LowPassFir;
//!
//! // Create a low-pass filter with 5kHz cutoff at 48kHz sample rate
//! let filter = LowPassFir::new(5_000.0, 48_000.0, 128);
//!
//! // Filter audio samples
//! let input = vec![0.5; 100];
//! let output = filter.process(&input);
//! assert_eq!(output.len(), 100);
//! ```

use std::f64::consts::PI;

/// Finite Impulse Response (FIR) low-pass filter.
///
/// Implements a low-pass FIR filter using a windowed-sinc design with a
/// Blackman window. This filter provides good stopband attenuation and
/// minimal passband ripple; the receiver applies it to demodulated audio to
/// strip everything above the voice band before the sound card.
///
/// The filter uses a centered FIR implementation where the output is computed
/// by convolving the input signal with the filter coefficients. Edge handling
/// is performed by zero-padding (samples outside the input range are treated
/// as zero).
///
/// # Design Method
///
/// The filter is designed using the windowed-sinc method:
/// 1. Ideal sinc function for the desired cutoff frequency
/// 2. Blackman window for sidelobe suppression
/// 3. Normalization to maintain unity gain in passband
pub struct LowPassFir {
    /// Filter coefficients (impulse response)
    fir: Vec<f64>,
}

impl LowPassFir {
    /// Create a new low-pass FIR filter.
    ///
    /// Designs a windowed-sinc FIR filter with Blackman window. The filter
    /// will have linear phase (symmetric impulse response) and approximately
    /// unity gain in the passband.
    ///
    /// # Arguments
    ///
    /// * `cutoff_freq` - Cutoff frequency in Hz (e.g., 5_000.0 for 5 kHz)
    /// * `sample_rate` - Sample rate in Hz (e.g., 48_000.0 for audio)
    /// * `taps` - Number of filter taps (must be > 0). More taps provide a
    ///   sharper transition band but increase computation. Typical values: 64-512.
    ///
    /// # Panics
    ///
    /// Panics if `taps` is 0 or if `sample_rate` is 0.
    pub fn new(cutoff_freq: f64, sample_rate: f64, taps: usize) -> Self {
        assert!(taps > 0, "Number of taps must be greater than 0");
        assert!(sample_rate > 0.0, "Sample rate must be greater than 0");

        let mut fir = Vec::with_capacity(taps);
        let mid = (taps / 2) as isize;
        let norm_cutoff = cutoff_freq / (sample_rate / 2.0);

        // Design windowed-sinc filter
        for n in 0..taps {
            let x = n as isize - mid;

            // Sinc function: sinc(x) = sin(πx) / (πx), with sinc(0) = 1
            let sinc = if x == 0 {
                2.0 * norm_cutoff
            } else {
                (2.0 * norm_cutoff * PI * x as f64).sin() / (PI * x as f64)
            };

            // Blackman window: w(n) = 0.42 - 0.5*cos(2πn/N) + 0.08*cos(4πn/N)
            let window = 0.42 - 0.5 * ((2.0 * PI * n as f64) / (taps as f64 - 1.0)).cos()
                + 0.08 * ((4.0 * PI * n as f64) / (taps as f64 - 1.0)).cos();

            fir.push(sinc * window);
        }

        // Normalize to unity gain
        let norm: f64 = fir.iter().sum();
        for v in fir.iter_mut() {
            *v /= norm;
        }

        Self { fir }
    }

    /// Process a block of samples through the filter.
    ///
    /// Applies the FIR filter by convolving the input with the filter
    /// coefficients. Samples outside the input range are treated as zero
    /// (zero-padding).
    pub fn process(&self, samples: &[f64]) -> Vec<f64> {
        let taps = self.fir.len();
        let mid = taps / 2;
        let mut out = vec![0.0f64; samples.len()];

        for (i, out_elem) in out.iter_mut().enumerate() {
            let mut acc = 0.0f64;
            for j in 0..taps {
                let idx = i as isize + j as isize - mid as isize;
                if idx >= 0 && (idx as usize) < samples.len() {
                    acc += samples[idx as usize] * self.fir[j];
                }
            }
            *out_elem = acc;
        }
        out
    }

    /// Get the number of filter taps.
    pub fn taps(&self) -> usize {
        self.fir.len()
    }

    /// Get the filter coefficients.
    pub fn coefficients(&self) -> &[f64] {
        &self.fir
    }
}
