//! Error handling for the skywave library
//!
//! This module provides a unified error type for all operations in the skywave
//! library, including I/O operations, front-end errors, format conversions and
//! receiver configuration.

use std::fmt;
use std::io;

/// A specialized Result type for skywave operations
///
/// The error type defaults to [`Error`] but can be overridden where a more
/// specific error (e.g. `std::io::Error`) is the honest one.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for skywave operations
#[derive(Debug)]
pub enum Error {
    /// I/O error (file operations, network, etc.)
    Io(io::Error),

    /// Front-end configuration or initialization error
    Device(String),

    /// Invalid I/Q format or conversion error
    Format(String),

    /// Invalid receiver configuration (sample rate, block size, ...)
    Config(String),

    /// Generic error with custom message
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Device(msg) => write!(f, "Device error: {}", msg),
            Error::Format(msg) => write!(f, "Format error: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

// From conversions for common error types

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

// Helper constructors for common error scenarios

impl Error {
    /// Create a device error with a custom message
    pub fn device<S: Into<String>>(msg: S) -> Self {
        Error::Device(msg.into())
    }

    /// Create a format error with a custom message
    pub fn format<S: Into<String>>(msg: S) -> Self {
        Error::Format(msg.into())
    }

    /// Create a configuration error with a custom message
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a generic error with a custom message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
