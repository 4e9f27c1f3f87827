//! Multimode demodulator engine.
//!
//! The [`Demodulator`] converts blocks of complex baseband samples into
//! real-valued audio according to the currently selected [`Mode`]:
//!
//! - **AM**: envelope detection with DC tracking and smoothing
//! - **SAM**: PLL carrier recovery followed by synchronous detection
//! - **FMN / FMW**: delta-phase discriminator
//! - **everything else**: pass-through (sideband separation is an upstream
//!   filter concern)
//!
//! The engine is stateful: the PLL estimate, the running DC averages and the
//! previous-sample history all carry across block boundaries, so blocks must
//! be delivered in strict temporal order with no gaps. A dropped or
//! reordered block is a permanent phase/DC discontinuity, not a transient
//! glitch. The engine itself never blocks, never allocates per sample, and
//! produces a full output block for every input block, whatever the sample
//! values.
//!
//! `process_block` must only ever be driven by one thread; observability
//! accessors read fields that change every sample, so any cross-thread reads
//! need an outside lock or must happen between blocks.

use num_complex::Complex;
use tracing::debug;

use crate::error::{Error, Result};

mod mode;
mod pll;

pub use mode::{Mode, ModeConfig};
pub use pll::{Detector, Pll};

/// A fixed-length block of complex baseband samples.
pub type SampleBlock = Vec<Complex<f64>>;

// Slow carrier-level tracker (~10 000-sample window) against the fast
// 2-sample envelope smoother; the DC estimate must not chase the audio.
const DC_AVERAGE: f64 = 0.9999;
const DC_UPDATE: f64 = 0.0001;

// Output level normalization so all modes play at comparable volume.
const OUTPUT_SCALE: f64 = 0.5;
const FM_OUTPUT_SCALE: f64 = 1.0 / 100.0;

// SAM lock-quality smoothing.
const LOCK_AVERAGE: f64 = 0.999;
const LOCK_UPDATE: f64 = 0.001;

/// Block-oriented multimode demodulator.
///
/// Constructed for a fixed sample rate and block size; holds all per-mode
/// state across calls to [`Demodulator::process_block`].
pub struct Demodulator {
    sample_rate: f64,
    block_size: usize,
    mode: Mode,
    pll: Pll,
    /// PLL capture range for the active mode, radians per sample
    lo_limit: f64,
    hi_limit: f64,
    /// AM/SAM running DC estimate
    dc: f64,
    /// AM smoothed AC envelope
    smooth: f64,
    /// SAM lock-quality trackers
    lock_current: f64,
    lock_previous: f64,
    /// FM automatic-frequency-correction accumulator
    afc: f64,
    /// Predecessor for the delta-phase discriminator, carried across blocks
    previous: Complex<f64>,
}

impl Demodulator {
    /// Create an engine for an input stream at `sample_rate` Hz, processed
    /// in blocks of `block_size` frames.
    ///
    /// Both must be positive: the loop coefficients and every derived
    /// constant are undefined otherwise. The block size is fixed for the
    /// engine's lifetime.
    pub fn new(sample_rate: u32, block_size: usize) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::config("sample rate must be positive"));
        }
        if block_size == 0 {
            return Err(Error::config("block size must be positive"));
        }

        let sample_rate = f64::from(sample_rate);
        let mut demod = Self {
            sample_rate,
            block_size,
            mode: Mode::Am,
            pll: Pll::new(Mode::Am.config().bandwidth_hz, sample_rate),
            lo_limit: 0.0,
            hi_limit: 0.0,
            dc: 0.0,
            smooth: 0.0,
            lock_current: 0.5,
            lock_previous: 1.0,
            afc: 0.0,
            previous: Complex::new(1.0, 0.0),
        };
        demod.set_mode(Mode::Am);
        Ok(demod)
    }

    /// Select the demodulation mode.
    ///
    /// Resets the PLL, the running averages and the previous-sample history,
    /// and recomputes the loop coefficients and capture limits from the
    /// mode's configuration; stale state never leaks across a mode switch.
    /// Re-selecting the current mode is an idempotent re-initialization.
    pub fn set_mode(&mut self, mode: Mode) {
        let config = mode.config();
        let rad_per_hz = 2.0 * std::f64::consts::PI / self.sample_rate;

        self.mode = mode;
        self.pll.set_bandwidth(config.bandwidth_hz, self.sample_rate);
        self.pll.reset();
        self.lo_limit = config.lo_limit_factor * config.bandwidth_hz * rad_per_hz;
        self.hi_limit = config.hi_limit_factor * config.bandwidth_hz * rad_per_hz;

        self.dc = 0.0;
        self.smooth = 0.0;
        self.lock_current = 0.5;
        self.lock_previous = 1.0;
        self.afc = 0.0;
        self.previous = Complex::new(1.0, 0.0);

        debug!(mode = %mode, "demodulator mode set");
    }

    /// Currently selected mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Configured block size in frames.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Demodulate one block.
    ///
    /// The output block has the same length as the input; the demodulated
    /// scalar is written into both the real and imaginary channel of each
    /// output sample, a convention downstream audio consumers rely on.
    /// Pass-through modes return the input unmodified.
    pub fn process_block(&mut self, input: &[Complex<f64>]) -> SampleBlock {
        debug_assert_eq!(
            input.len(),
            self.block_size,
            "block length must match the configured block size"
        );

        match self.mode {
            Mode::Am => self.process_am(input),
            Mode::Sam => self.process_sam(input),
            Mode::Fmn | Mode::Fmw => self.process_fm(input),
            _ => input.to_vec(),
        }
    }

    /// Envelope detection with DC tracking and smoothing.
    fn process_am(&mut self, input: &[Complex<f64>]) -> SampleBlock {
        let mut output = SampleBlock::with_capacity(input.len());
        for &sample in input {
            let current = sample.norm();
            self.dc = DC_AVERAGE * self.dc + DC_UPDATE * current;
            self.smooth = 0.5 * self.smooth + 0.5 * (current - self.dc);
            let audio = self.smooth * OUTPUT_SCALE;
            output.push(Complex::new(audio, audio));
        }
        output
    }

    /// PLL-tracked carrier recovery and synchronous detection.
    ///
    /// Recovery uses the real part of the phase-locked signal rather than the
    /// magnitude, so carrier offset and selective fading do not distort the
    /// audio the way they do with plain envelope detection.
    fn process_sam(&mut self, input: &[Complex<f64>]) -> SampleBlock {
        let mut output = SampleBlock::with_capacity(input.len());
        for &sample in input {
            let rotated =
                self.pll
                    .track(sample, Detector::SynchronousAm, self.lo_limit, self.hi_limit);

            // Residual quadrature energy doubles as a lock-quality indicator;
            // exposed for observability, never used for a hard decision.
            self.lock_previous = self.lock_current;
            self.lock_current = LOCK_AVERAGE * self.lock_current + LOCK_UPDATE * rotated.im.abs();

            self.dc = DC_AVERAGE * self.dc + DC_UPDATE * rotated.re;
            let audio = (rotated.re - self.dc) * OUTPUT_SCALE;
            output.push(Complex::new(audio, audio));
        }
        output
    }

    /// Delta-phase discriminator, shared by narrowband and wideband FM.
    ///
    /// The phase of `sample * conj(previous)` is proportional to the
    /// instantaneous frequency; the formulation never divides, so all-zero
    /// input is harmless. The predecessor carries across block boundaries,
    /// leaving only the very first sample after a mode set as a startup
    /// transient.
    fn process_fm(&mut self, input: &[Complex<f64>]) -> SampleBlock {
        let mut output = SampleBlock::with_capacity(input.len());
        for &sample in input {
            let product = sample * self.previous.conj();
            let delta = product.arg();
            self.afc = DC_AVERAGE * self.afc + DC_UPDATE * delta;
            self.previous = sample;
            let audio = delta * FM_OUTPUT_SCALE;
            output.push(Complex::new(audio, audio));
        }
        output
    }

    /// Tracked PLL phase in radians, in [0, 2π).
    pub fn tracked_phase(&self) -> f64 {
        self.pll.phase()
    }

    /// Tracked PLL frequency in radians per sample.
    pub fn tracked_frequency(&self) -> f64 {
        self.pll.frequency()
    }

    /// Capture range of the active mode, radians per sample.
    pub fn frequency_limits(&self) -> (f64, f64) {
        (self.lo_limit, self.hi_limit)
    }

    /// SAM lock-quality trackers (current, previous).
    pub fn lock_quality(&self) -> (f64, f64) {
        (self.lock_current, self.lock_previous)
    }

    /// FM frequency-offset estimate, radians per sample.
    pub fn afc_estimate(&self) -> f64 {
        self.afc
    }

    /// AM/SAM carrier-level estimate.
    pub fn dc_estimate(&self) -> f64 {
        self.dc
    }
}
