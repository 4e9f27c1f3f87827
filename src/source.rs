//! Hardware Front-End Boundary
//!
//! Real receivers sit behind USB dongles, network-attached radios or
//! sound-card-coupled rigs. This module models every front-end at its
//! interface boundary only: something that can be connected, tuned to a
//! center frequency, started, and then delivers blocks of complex baseband
//! samples at a known sample rate. Driver code itself (USB bit-banging, HID
//! reports, vendor socket protocols) lives outside this crate.

use num_complex::Complex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::{IqFormat, IqSource};

/// Capability interface for a receiver front-end.
///
/// Implementations deliver blocks of complex baseband samples at a fixed
/// sample rate and accept a requested center frequency. The demodulator
/// engine never sees anything beyond this boundary.
pub trait Frontend {
    /// Open the underlying device or stream.
    fn connect(&mut self) -> Result<()>;

    /// Release the underlying device or stream.
    fn disconnect(&mut self) -> Result<()>;

    /// Request a new center frequency in Hz.
    fn set_frequency(&mut self, freq_hz: u32) -> Result<()>;

    /// Begin streaming samples.
    fn start(&mut self) -> Result<()>;

    /// Stop streaming samples.
    fn stop(&mut self) -> Result<()>;

    /// Sample rate of the delivered baseband stream, in Hz.
    fn sample_rate(&self) -> u32;

    /// Deliver the next block of baseband samples, or `None` when the
    /// source is exhausted.
    fn read_block(&mut self) -> Result<Option<Vec<Complex<f64>>>>;
}

/**
 * File-backed playback front-end
 *
 * Replays a recorded I/Q capture as if it were a live device. Useful for
 * offline listening and for testing the receive chain without hardware.
 */
pub struct FilePlayback {
    path: String,
    iq_format: IqFormat,
    center_freq: u32,
    sample_rate: u32,
    chunk_size: usize,
    reader: Option<IqSource>,
    running: bool,
}

impl FilePlayback {
    pub fn new(
        path: impl Into<String>,
        center_freq: u32,
        sample_rate: u32,
        chunk_size: usize,
        iq_format: IqFormat,
    ) -> Self {
        Self {
            path: path.into(),
            iq_format,
            center_freq,
            sample_rate,
            chunk_size,
            reader: None,
            running: false,
        }
    }

    /// The center frequency the capture is assumed to be tuned to.
    pub fn center_freq(&self) -> u32 {
        self.center_freq
    }
}

impl Frontend for FilePlayback {
    fn connect(&mut self) -> Result<()> {
        let source = IqSource::from_file(
            &self.path,
            self.center_freq,
            self.sample_rate,
            self.chunk_size,
            self.iq_format,
        )?;
        self.reader = Some(source);
        debug!(path = %self.path, "file playback connected");
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.reader = None;
        self.running = false;
        Ok(())
    }

    fn set_frequency(&mut self, freq_hz: u32) -> Result<()> {
        // A recording cannot retune; remember the request so the pipeline
        // can shift the band digitally.
        self.center_freq = freq_hz;
        debug!(freq_hz, "file playback retune recorded");
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        if self.reader.is_none() {
            return Err(Error::device("file playback not connected"));
        }
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.running = false;
        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn read_block(&mut self) -> Result<Option<Vec<Complex<f64>>>> {
        if !self.running {
            return Err(Error::device("file playback not started"));
        }
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| Error::device("file playback not connected"))?;
        match reader.next() {
            Some(Ok(samples)) => Ok(Some(samples)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }
}
