//! Demodulation mode selection and per-mode tuning constants.

use std::fmt;

/// Demodulation mode.
///
/// Sideband, CW and digital modes are pass-through at the demodulator: the
/// upstream filter chain has already isolated the wanted sideband, so the
/// engine has no additional work to do for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Envelope-detected AM
    Am,
    /// Synchronous AM (PLL carrier recovery)
    Sam,
    /// Narrowband FM
    Fmn,
    /// Wideband FM (same discriminator as FMN, no stereo decoding)
    Fmw,
    /// Double sideband
    Dsb,
    /// Lower sideband
    Lsb,
    /// Upper sideband
    Usb,
    /// CW, lower sideband
    Cwl,
    /// CW, upper sideband
    Cwu,
    /// Digital, lower sideband
    Digl,
    /// Digital, upper sideband
    Digu,
    /// No demodulation
    None,
}

/// Per-mode tuning constants, looked up once at mode-set time.
///
/// The capture-range limits are expressed as multiples of the loop bandwidth
/// and converted to radians per sample by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeConfig {
    /// Target PLL loop bandwidth in Hz
    pub bandwidth_hz: f64,
    /// Lower capture limit, in multiples of the bandwidth
    pub lo_limit_factor: f64,
    /// Upper capture limit, in multiples of the bandwidth
    pub hi_limit_factor: f64,
}

impl Mode {
    /// Every supported mode, in display order.
    pub const ALL: [Mode; 12] = [
        Mode::Am,
        Mode::Sam,
        Mode::Fmn,
        Mode::Fmw,
        Mode::Dsb,
        Mode::Lsb,
        Mode::Usb,
        Mode::Cwl,
        Mode::Cwu,
        Mode::Digl,
        Mode::Digu,
        Mode::None,
    ];

    /// Parse a mode name. Unrecognized names fall back to AM.
    pub fn from_name(name: &str) -> Mode {
        match name.trim().to_ascii_uppercase().as_str() {
            "AM" => Mode::Am,
            "SAM" => Mode::Sam,
            "FMN" => Mode::Fmn,
            "FMW" => Mode::Fmw,
            "DSB" => Mode::Dsb,
            "LSB" => Mode::Lsb,
            "USB" => Mode::Usb,
            "CWL" => Mode::Cwl,
            "CWU" => Mode::Cwu,
            "DIGL" => Mode::Digl,
            "DIGU" => Mode::Digu,
            "NONE" => Mode::None,
            _ => Mode::Am,
        }
    }

    /// Canonical name of this mode.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Am => "AM",
            Mode::Sam => "SAM",
            Mode::Fmn => "FMN",
            Mode::Fmw => "FMW",
            Mode::Dsb => "DSB",
            Mode::Lsb => "LSB",
            Mode::Usb => "USB",
            Mode::Cwl => "CWL",
            Mode::Cwu => "CWU",
            Mode::Digl => "DIGL",
            Mode::Digu => "DIGU",
            Mode::None => "NONE",
        }
    }

    /// Tuning constants for this mode.
    ///
    /// SAM tracks a carrier with a narrow 300 Hz loop and a ±10× capture
    /// window (±3 kHz); FM modes use a 5 kHz loop reference. Everything else
    /// gets the 300 Hz default so the loop coefficients are always defined.
    pub fn config(self) -> ModeConfig {
        match self {
            Mode::Fmn | Mode::Fmw => ModeConfig {
                bandwidth_hz: 5_000.0,
                lo_limit_factor: -1.2,
                hi_limit_factor: 1.2,
            },
            _ => ModeConfig {
                bandwidth_hz: 300.0,
                lo_limit_factor: -10.0,
                hi_limit_factor: 10.0,
            },
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
