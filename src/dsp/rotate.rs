/// A DSP block that applies a complex rotation to a sequence of samples.
///
/// The `Rotate` struct maintains an internal complex rotation state (`rot`)
/// and a multiplier (`mult`) that represents the rotation per sample,
/// determined by the given angle in radians. Each call to `process` rotates
/// the input complex samples by the current rotation, updating the rotation
/// for each sample. The receiver uses this to shift a signal of interest to
/// zero frequency within the captured band, so retuning inside the band never
/// touches hardware.
///
/// # Example
/// ```
/// use num_complex::Complex;
/// use skywave::dsp::{DspBlock, Rotate};
///
/// let mut rotator = Rotate::new(std::f64::consts::FRAC_PI_2); // 90 degrees per sample
/// let input = vec![Complex::new(1.0, 0.0); 4];
/// let output = rotator.process(&input);
/// ```
use num_complex::Complex;

use crate::dsp::DspBlock;

pub struct Rotate {
    /// Current complex rotation factor
    rot: Complex<f64>,
    /// Per-sample rotation multiplier
    mult: Complex<f64>,
}

impl Rotate {
    /// Create a new Rotate DSP block with the specified rotation angle in radians
    pub fn new(angle: f64) -> Self {
        Self {
            rot: Complex::new(1.0, 0.0),
            mult: Complex::new(angle.cos(), angle.sin()),
        }
    }

    /// Create a rotator shifting the spectrum by `shift_hz` at `sample_rate`.
    ///
    /// A positive shift moves the band down, bringing a signal above the
    /// current zero frequency to baseband.
    pub fn from_shift(shift_hz: f64, sample_rate: f64) -> Self {
        Self::new(-2.0 * std::f64::consts::PI * shift_hz / sample_rate)
    }

    /// Change the per-sample rotation angle, keeping the current phase.
    ///
    /// The rotation phase is continuous across the change, so retuning while
    /// streaming does not click.
    pub fn set_angle(&mut self, angle: f64) {
        self.mult = Complex::new(angle.cos(), angle.sin());
    }
}

impl DspBlock for Rotate {
    /// Process a slice of complex samples, applying the rotation
    fn process(&mut self, data: &[Complex<f64>]) -> Vec<Complex<f64>> {
        let mut out = Vec::with_capacity(data.len());
        for &s in data {
            out.push(s * self.rot);
            self.rot *= self.mult;
        }
        if self.rot.norm() > 0.0 {
            self.rot /= self.rot.norm();
        }
        out
    }
}
