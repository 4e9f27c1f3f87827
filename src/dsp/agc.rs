//! Automatic Gain Control (AGC)
//!
//! This module provides an AGC for normalizing audio amplitude ahead of the
//! sound card. It tracks the signal envelope with an exponential moving
//! average and applies inverse gain to hold a target output level, so quiet
//! stations and strong locals play back at comparable volume.
//!
//! # Example
//!
//! ```
//! use skywave::dsp::agc::Agc;
//!
//! // Create AGC with 0.01 bandwidth
//! let mut agc = Agc::new(0.01);
//!
//! let samples = vec![0.2, -0.3, 0.25, -0.2];
//! let leveled = agc.process(&samples);
//! assert_eq!(leveled.len(), 4);
//! ```

/// Automatic Gain Control for real-valued audio samples.
///
/// The AGC normalizes signal amplitude by tracking the envelope and
/// applying inverse gain. Gain is clamped to prevent runaway amplification
/// of noise during signal dropouts.
#[derive(Debug, Clone)]
pub struct Agc {
    /// Target output amplitude (default 1.0)
    target: f64,

    /// Loop bandwidth (controls attack/decay rate)
    bandwidth: f64,

    /// Current gain value
    gain: f64,

    /// Envelope estimate (of the gain-corrected output)
    envelope: f64,

    /// Minimum gain (to prevent instability)
    gain_min: f64,

    /// Maximum gain (to prevent noise amplification)
    gain_max: f64,
}

impl Agc {
    /// Create a new AGC with specified bandwidth.
    ///
    /// # Arguments
    ///
    /// * `bandwidth` - Loop bandwidth [0, 1]. Lower values provide smoother
    ///   gain adjustment but slower response to level changes.
    pub fn new(bandwidth: f64) -> Self {
        Self::with_target(bandwidth, 1.0)
    }

    /// Create AGC with custom target amplitude.
    ///
    /// # Arguments
    ///
    /// * `bandwidth` - Loop bandwidth [0, 1]
    /// * `target` - Target output amplitude
    pub fn with_target(bandwidth: f64, target: f64) -> Self {
        Self {
            target,
            bandwidth: bandwidth.clamp(0.0, 1.0),
            gain: 1.0,
            envelope: 1.0,
            gain_min: 1e-6,
            gain_max: 1e6,
        }
    }

    /// Set the loop bandwidth.
    pub fn set_bandwidth(&mut self, bandwidth: f64) {
        self.bandwidth = bandwidth.clamp(0.0, 1.0);
    }

    /// Set gain limits.
    pub fn set_gain_limits(&mut self, min: f64, max: f64) {
        self.gain_min = min.max(1e-10);
        self.gain_max = max.min(1e10);
    }

    /// Get the current gain value.
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Process a single sample, returning the gain-corrected output.
    pub fn execute(&mut self, sample: f64) -> f64 {
        let output = sample * self.gain;

        // Track the output envelope and steer the gain toward the target
        self.envelope =
            (1.0 - self.bandwidth) * self.envelope + self.bandwidth * output.abs();
        if self.envelope > 1e-12 {
            self.gain *= (self.target / self.envelope).powf(self.bandwidth);
        }
        self.gain = self.gain.clamp(self.gain_min, self.gain_max);

        output
    }

    /// Process a block of samples.
    pub fn process(&mut self, samples: &[f64]) -> Vec<f64> {
        samples.iter().map(|&s| self.execute(s)).collect()
    }

    /// Reset gain and envelope tracking to initial state.
    pub fn reset(&mut self) {
        self.gain = 1.0;
        self.envelope = 1.0;
    }
}
