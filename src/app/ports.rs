//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (GPIO, clock, LCD, rotary encoder, config file, event
//! sinks) implement these traits.  The [`Controller`](super::service::Controller)
//! consumes them via generics, so the domain core never touches hardware
//! directly and every loop can be driven from a virtual clock in tests.

use embedded_hal::delay::DelayNs;

use crate::config::GateConfig;
use crate::io::{InputLine, Level, OutputLine};

// ───────────────────────────────────────────────────────────────
// GPIO port (driven adapter: domain ↔ digital lines)
// ───────────────────────────────────────────────────────────────

/// Raw, undebounced access to the named digital lines.
pub trait GpioPort {
    /// Instantaneous level of an input line.
    fn read(&mut self, line: InputLine) -> Level;

    /// Drive an output line.
    fn write(&mut self, line: OutputLine, level: Level);

    /// Read back the level an output line is currently driven at.
    fn output_level(&self, line: OutputLine) -> Level;

    /// Arm or disarm the rising-edge interrupt on the Stop input.
    fn set_stop_interrupt(&mut self, enabled: bool);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time plus blocking delays.
///
/// Sleeping goes through [`DelayNs`] so any `embedded-hal` delay provider
/// can back it.
pub trait Clock: DelayNs {
    /// Milliseconds since an arbitrary fixed origin.  Never goes backwards.
    fn now_ms(&self) -> u64;

    /// Milliseconds elapsed since `start` (a previous [`Clock::now_ms`]).
    fn elapsed_ms(&self, start: u64) -> u64 {
        self.now_ms().saturating_sub(start)
    }
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → character LCD)
// ───────────────────────────────────────────────────────────────

/// Character display.  Rows and columns are 1-indexed.
///
/// Calls are treated as always succeeding; adapters log bus errors.
pub trait DisplayPort {
    fn clear(&mut self);

    /// Write `text` starting at (`row`, `col`).
    fn write_line(&mut self, text: &str, row: u8, col: u8);

    /// Write `text` horizontally centred on `row`.
    fn write_line_center(&mut self, text: &str, row: u8);
}

// ───────────────────────────────────────────────────────────────
// Encoder port (driving adapter: operator → domain)
// ───────────────────────────────────────────────────────────────

/// Rotary encoder with push button.
pub trait EncoderPort {
    /// Signed detent count since the previous call (0 = no movement).
    fn value(&mut self) -> i32;

    /// True exactly once per physical button press.
    fn select(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ config.json)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the configuration document.
pub trait ConfigStore {
    /// Read and parse the stored document.
    fn load(&self) -> Result<GateConfig, ConfigError>;

    /// Replace the stored document.
    fn save(&self, config: &GateConfig) -> Result<(), ConfigError>;
}

/// Load the stored configuration, regenerating defaults when the file is
/// missing or unreadable.
///
/// Defaults are written first and then read back, so the returned value is
/// always what the store actually holds.  Only a store that cannot persist
/// at all yields an error.
pub fn load_or_init(store: &impl ConfigStore) -> Result<GateConfig, ConfigError> {
    match store.load() {
        Ok(cfg) => Ok(cfg),
        Err(e @ (ConfigError::NotFound | ConfigError::Corrupted)) => {
            log::warn!("config: {}, writing defaults", e);
            store.save(&GateConfig::default())?;
            store.load()
        }
        Err(e) => Err(e),
    }
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigStore`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config file on the filesystem (first boot).
    NotFound,
    /// Stored document is not valid JSON or has the wrong shape.
    Corrupted,
    /// Generic I/O error from the filesystem.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
