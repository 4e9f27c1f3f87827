//! Multimode SDR receiver (AM, SAM, FM, SSB pass-through)
//!
//! This application plays demodulated audio from an I/Q sample stream:
//! - IQ file playback
//! - Standard input (pipe from another capture tool)
//! - TCP (e.g. an rtl_tcp-style server)
//!
//! While running, it accepts commands on standard input (unless stdin is the
//! sample source): `mode <NAME>` switches the demodulation mode, `tune <HZ>`
//! shifts the received frequency within the captured band. Commands are
//! applied between blocks, never in the middle of one.
//!
//! # Usage Examples
//!
//! ## IQ file playback, synchronous AM
//! ```bash
//! multimode --source file --file capture.iq --format cu8 -s 960000 -m SAM
//! ```
//!
//! ## Narrowband FM from an rtl_tcp server
//! ```bash
//! multimode --source tcp --tcp-host 127.0.0.1 --tcp-port 1234 -s 960000 -m FMN -v
//! ```
//!
//! ## Piped from stdin
//! ```bash
//! some_capture_tool | multimode --source stdin --format cs16 -s 480000 -m USB
//! ```

use std::f64::consts::PI;
use std::str::FromStr;

use clap::{ArgAction, Parser, ValueEnum};
use crossbeam::channel;
use futures::StreamExt;
use num_complex::Complex;
use tinyaudio::prelude::*;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use skywave::dsp::{Agc, Decimator, DspBlock, LowPassFir, Rotate};
use skywave::{Demodulator, Error, IqAsyncSource, IqFormat, Mode};

#[derive(Debug, Clone, Copy)]
struct Frequency(u32);

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, multiplier) = match s.chars().last() {
            Some('k') | Some('K') => (&s[..s.len() - 1], 1_000.0),
            Some('M') => (&s[..s.len() - 1], 1_000_000.0),
            _ => (s, 1.0),
        };
        let value: f64 = number
            .parse()
            .map_err(|_| format!("invalid frequency: {}", s))?;
        Ok(Frequency((value * multiplier) as u32))
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceType {
    File,
    Stdin,
    Tcp,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Multimode SDR receiver (AM, SAM, FM, SSB)", long_about = None)]
struct Args {
    /// Center frequency in Hz (accepts k/M suffix, e.g. 7.2M)
    #[arg(short, long, value_parser = Frequency::from_str, default_value = "7.2M")]
    center_freq: Frequency,

    /// Input sample rate in Hz (must be an integer multiple of 48000)
    #[arg(short, long, default_value_t = 960_000)]
    sample_rate: u32,

    /// Initial demodulation mode (AM, SAM, FMN, FMW, DSB, LSB, USB, CWL, CWU, DIGL, DIGU, NONE)
    #[arg(short, long, default_value = "AM")]
    mode: String,

    /// Frequency offset in Hz within the captured band (can be negative)
    #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
    offset_freq: i32,

    /// Verbosity level (-v=info, -vv=debug, -vvv=trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Disable audio output (for SSH/headless operation)
    #[arg(long, default_value_t = false)]
    no_audio: bool,

    /// Source type: file, stdin, or tcp
    #[arg(long, value_enum, default_value = "file")]
    source: SourceType,

    /// Input file path (required when source=file)
    #[arg(long)]
    file: Option<String>,

    /// IQ format of the input (cu8, cs8, cs16, cf32)
    #[arg(long, default_value = "cu8")]
    format: String,

    /// TCP host (when source=tcp)
    #[arg(long, default_value = "127.0.0.1")]
    tcp_host: String,

    /// TCP port (when source=tcp)
    #[arg(long, default_value_t = 1234)]
    tcp_port: u16,
}

const AUDIO_RATE: usize = 48_000;
const AUDIO_SIGNAL_BW: f64 = 5_000.0;
const DEMOD_BLOCK_SIZE: usize = 2048;

/// Operator commands, applied strictly between blocks.
enum Command {
    Mode(Mode),
    Tune(i32),
}

#[tokio::main]
async fn main() -> skywave::Result<()> {
    let args = Args::parse();

    // Initialize tracing with verbosity level
    // 0 = WARN (quiet), 1 = INFO, 2 = DEBUG, 3+ = TRACE
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .try_init();

    let format = IqFormat::from_str(&args.format)?;

    if args.sample_rate == 0 || args.sample_rate as usize % AUDIO_RATE != 0 {
        return Err(Error::config(format!(
            "sample rate {} must be a positive integer multiple of {}",
            args.sample_rate, AUDIO_RATE
        )));
    }
    let factor = args.sample_rate as usize / AUDIO_RATE;

    // Source chunks sized so one chunk decimates to roughly one demod block
    let chunk_size = factor * DEMOD_BLOCK_SIZE;

    let mut iq_source = match args.source {
        SourceType::File => {
            let file_path = args
                .file
                .as_deref()
                .ok_or_else(|| Error::config("--file is required when source=file"))?;
            IqAsyncSource::from_file(
                file_path,
                args.center_freq.0,
                args.sample_rate,
                chunk_size,
                format,
            )
            .await?
        }
        SourceType::Stdin => {
            IqAsyncSource::from_stdin(args.center_freq.0, args.sample_rate, chunk_size, format)
        }
        SourceType::Tcp => {
            IqAsyncSource::from_tcp(
                &args.tcp_host,
                args.tcp_port,
                args.center_freq.0,
                args.sample_rate,
                chunk_size,
                format,
            )
            .await?
        }
    };

    let initial_mode = Mode::from_name(&args.mode);
    info!(
        "multimode receiver: {} at {} Hz, source: {:?}",
        initial_mode, args.center_freq.0, args.source
    );

    // Audio sink: bounded channel drained by the output device callback
    let (tx, rx) = channel::bounded::<f32>(AUDIO_RATE * 2);

    let _device = if !args.no_audio {
        let config = OutputDeviceParameters {
            channels_count: 1,
            sample_rate: AUDIO_RATE,
            channel_sample_count: 1024,
        };
        Some(
            run_output_device(config, move |data| {
                for sample in data.iter_mut() {
                    *sample = rx.try_recv().unwrap_or(0.0);
                }
            })
            .map_err(|e| Error::device(format!("audio output: {}", e)))?,
        )
    } else {
        info!("Audio output disabled (--no-audio)");
        None
    };

    // Operator commands; stdin carries samples in stdin mode, so no command
    // reader there
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();
    if !matches!(args.source, SourceType::Stdin) {
        tokio::spawn(read_commands(cmd_tx));
    }

    let mut offset_freq = args.offset_freq;
    let mut rotate = Rotate::from_shift(offset_freq as f64, args.sample_rate as f64);
    let mut decimator = Decimator::new(factor);
    let audio_filter = LowPassFir::new(AUDIO_SIGNAL_BW, AUDIO_RATE as f64, 128);
    let mut agc = Agc::with_target(0.005, 0.5);

    let mut demod = Demodulator::new(AUDIO_RATE as u32, DEMOD_BLOCK_SIZE)?;
    demod.set_mode(initial_mode);

    // Decimated samples waiting to fill a complete demodulator block
    let mut pending: Vec<Complex<f64>> = Vec::with_capacity(2 * DEMOD_BLOCK_SIZE);
    let mut buffer_warned = false;

    while let Some(chunk) = iq_source.next().await {
        let chunk = chunk?;

        // Apply pending operator commands at the block boundary
        while let Ok(command) = cmd_rx.try_recv() {
            match command {
                Command::Mode(mode) => {
                    info!("mode set to {}", mode);
                    demod.set_mode(mode);
                }
                Command::Tune(offset) => {
                    offset_freq = offset;
                    rotate.set_angle(-2.0 * PI * offset_freq as f64 / args.sample_rate as f64);
                    info!("tuned to offset {} Hz", offset_freq);
                }
            }
        }

        let shifted = rotate.process(&chunk);
        let decimated = decimator.process(&shifted);
        pending.extend_from_slice(&decimated);

        while pending.len() >= DEMOD_BLOCK_SIZE {
            let block: Vec<Complex<f64>> = pending.drain(..DEMOD_BLOCK_SIZE).collect();
            let demodulated = demod.process_block(&block);

            let audio: Vec<f64> = demodulated.iter().map(|s| s.re).collect();
            let filtered = audio_filter.process(&audio);
            let leveled = agc.process(&filtered);

            debug!(
                mode = %demod.mode(),
                frequency = demod.tracked_frequency(),
                "block demodulated"
            );

            if !args.no_audio {
                for sample in leveled {
                    if tx.try_send(sample as f32).is_err() {
                        if !buffer_warned {
                            warn!("audio buffer full, dropping samples");
                            buffer_warned = true;
                        }
                        break;
                    }
                }
            }
        }
    }

    info!("source exhausted, exiting");
    Ok(())
}

/// Read operator commands from stdin and forward them to the pump loop.
async fn read_commands(tx: mpsc::UnboundedSender<Command>) {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let command = if let Some(name) = line.strip_prefix("mode ") {
            Some(Command::Mode(Mode::from_name(name)))
        } else if let Some(value) = line.strip_prefix("tune ") {
            match value.trim().parse::<i32>() {
                Ok(offset) => Some(Command::Tune(offset)),
                Err(_) => {
                    warn!("invalid tune offset: {}", value);
                    None
                }
            }
        } else {
            warn!("unknown command: {}", line);
            None
        };
        if let Some(command) = command {
            if tx.send(command).is_err() {
                break;
            }
        }
    }
}
