//! Unified error types for the GateDrive firmware.
//!
//! A single `Error` enum that every subsystem converts into, so start-up
//! code can propagate any failure with `?`.  Variants are `Copy`; driver
//! errors that carry a bus-specific payload are flattened on conversion.

use core::fmt;

pub use crate::app::ports::ConfigError;
pub use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration could not be loaded or persisted.
    Config(ConfigError),
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// The character display did not respond.
    Display,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Display => write!(f, "display: no response on I2C"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

impl<E> From<crate::drivers::lcd::LcdError<E>> for Error {
    fn from(_: crate::drivers::lcd::LcdError<E>) -> Self {
        Self::Display
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
