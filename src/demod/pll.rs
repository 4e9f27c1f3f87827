//! Second-order phase-locked loop for carrier tracking.
//!
//! The loop maintains a tracked phase/frequency estimate that locks onto a
//! reference component of the incoming signal. Each call to [`Pll::track`]
//! demixes one input sample by the local oscillator and nudges the estimate
//! from the resulting phase error. Synchronous-AM carrier recovery and FM
//! carrier tracking share the same loop and differ only in how the phase
//! error is derived from the demixed sample.

use std::f64::consts::PI;

use num_complex::Complex;

/// Phase-error detector variants for [`Pll::track`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detector {
    /// Synchronous AM: error is the demixed phase weighted by the input
    /// magnitude, so weak signal does not jerk the loop around.
    SynchronousAm,
    /// FM: error is the demixed phase directly.
    Fm,
}

/// Second-order digital PLL.
///
/// `alpha` and `beta` are the proportional and integral gains of the loop
/// filter, derived from a configured bandwidth; they are never set
/// independently.
#[derive(Debug, Clone)]
pub struct Pll {
    /// Tracked phase in radians, kept in [0, 2π)
    phase: f64,
    /// Tracked frequency in radians per sample
    frequency: f64,
    /// Proportional (phase) gain
    alpha: f64,
    /// Integral (frequency) gain
    beta: f64,
}

impl Pll {
    /// Create a loop configured for the given bandwidth and sample rate.
    pub fn new(bandwidth_hz: f64, sample_rate: f64) -> Self {
        let mut pll = Self {
            phase: 0.0,
            frequency: 0.0,
            alpha: 0.0,
            beta: 0.0,
        };
        pll.set_bandwidth(bandwidth_hz, sample_rate);
        pll
    }

    /// Recompute the loop gains for a new bandwidth or sample rate.
    ///
    /// `alpha = 0.3 * bandwidth * (2π / sample_rate)` ties the loop's
    /// responsiveness to the configured audio bandwidth; `beta = alpha² / 4`
    /// is the critically-damped choice for that natural bandwidth.
    pub fn set_bandwidth(&mut self, bandwidth_hz: f64, sample_rate: f64) {
        self.alpha = 0.3 * bandwidth_hz * (2.0 * PI / sample_rate);
        self.beta = self.alpha * self.alpha / 4.0;
    }

    /// Reset the tracked phase and frequency to zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.frequency = 0.0;
    }

    /// Track one sample: demix it by the local oscillator, update the
    /// phase/frequency estimate, and return the demixed sample.
    ///
    /// The frequency estimate is hard-clamped into `[lo_limit, hi_limit]`
    /// (radians per sample); the clamp bounds the capture range and keeps
    /// the loop from running away on noise.
    pub fn track(
        &mut self,
        input: Complex<f64>,
        detector: Detector,
        lo_limit: f64,
        hi_limit: f64,
    ) -> Complex<f64> {
        let reference = Complex::new(self.phase.cos(), self.phase.sin());
        let rotated = reference * input;

        let difference = match detector {
            Detector::SynchronousAm => input.norm() * rotated.arg(),
            Detector::Fm => rotated.arg(),
        };

        self.frequency += self.beta * difference;
        if self.frequency < lo_limit {
            self.frequency = lo_limit;
        }
        if self.frequency > hi_limit {
            self.frequency = hi_limit;
        }

        self.phase += self.frequency + self.alpha * difference;
        // Repeated add/subtract handles a phase moving by more than one full
        // turn in a single update.
        while self.phase >= 2.0 * PI {
            self.phase -= 2.0 * PI;
        }
        while self.phase < 0.0 {
            self.phase += 2.0 * PI;
        }

        rotated
    }

    /// Tracked phase in radians, in [0, 2π).
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Tracked frequency in radians per sample.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Proportional gain of the loop filter.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Integral gain of the loop filter.
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_loop_gains_from_bandwidth() {
        let pll = Pll::new(300.0, 48_000.0);
        let expected_alpha = 0.3 * 300.0 * (2.0 * PI / 48_000.0);
        assert_relative_eq!(pll.alpha(), expected_alpha, epsilon = 1e-15);
        assert_relative_eq!(pll.beta(), expected_alpha * expected_alpha / 4.0, epsilon = 1e-15);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut pll = Pll::new(300.0, 48_000.0);
        for i in 0..100 {
            let phase = 0.02 * i as f64;
            pll.track(
                Complex::new(phase.cos(), phase.sin()),
                Detector::SynchronousAm,
                -1.0,
                1.0,
            );
        }
        pll.reset();
        assert_eq!(pll.phase(), 0.0);
        assert_eq!(pll.frequency(), 0.0);
    }

    #[test]
    fn test_phase_stays_normalized() {
        let mut pll = Pll::new(5_000.0, 48_000.0);
        for i in 0..10_000 {
            let phase = 0.5 * i as f64;
            pll.track(
                Complex::new(phase.cos(), phase.sin()),
                Detector::Fm,
                -1.0,
                1.0,
            );
            assert!(pll.phase() >= 0.0 && pll.phase() < 2.0 * PI);
        }
    }

    #[test]
    fn test_frequency_clamped_to_limits() {
        let mut pll = Pll::new(300.0, 48_000.0);
        let lo = -0.001;
        let hi = 0.001;

        // A fast rotator constantly pushes the frequency estimate; the clamp
        // must hold it inside the window anyway
        for i in 0..50_000 {
            let phase = 0.4 * i as f64;
            pll.track(
                Complex::new(phase.cos(), phase.sin()),
                Detector::SynchronousAm,
                lo,
                hi,
            );
            assert!(pll.frequency() >= lo && pll.frequency() <= hi);
        }
    }

    #[test]
    fn test_locks_onto_offset_carrier() {
        let sample_rate = 48_000.0;
        let offset_hz = 50.0;
        let mut pll = Pll::new(300.0, sample_rate);

        // Capture window of ±3 kHz in radians per sample
        let limit = 2.0 * PI * 3_000.0 / sample_rate;

        let omega = 2.0 * PI * offset_hz / sample_rate;
        for i in 0..240_000 {
            let phase = omega * i as f64;
            pll.track(
                Complex::new(phase.cos(), phase.sin()),
                Detector::SynchronousAm,
                -limit,
                limit,
            );
        }

        // The loop demixes by rotating the input, so its frequency settles
        // at the negative of the carrier offset
        let tracked_hz = pll.frequency() * sample_rate / (2.0 * PI);
        assert_relative_eq!(tracked_hz, -offset_hz, epsilon = 5.0);
    }

    #[test]
    fn test_demixed_sample_is_rotated_input() {
        let mut pll = Pll::new(300.0, 48_000.0);
        // At zero phase the reference is 1+0i, so the first demixed sample
        // equals the input
        let input = Complex::new(0.6, -0.2);
        let rotated = pll.track(input, Detector::SynchronousAm, -1.0, 1.0);
        assert_relative_eq!(rotated.re, input.re, epsilon = 1e-12);
        assert_relative_eq!(rotated.im, input.im, epsilon = 1e-12);
    }
}
