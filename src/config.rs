//! System configuration parameters
//!
//! The only runtime-tunable values are the four stage timers.  They are
//! stored on flash as `config.json`:
//!
//! ```json
//! { "TIMERS": { "T1": 5, "T2": 5, "T3": 5, "T4": 5 } }
//! ```

use core::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

/// Location of the configuration file on the device filesystem.
pub const CONFIG_PATH: &str = "/spiffs/config.json";

/// Exclusive upper bound for any timer value (seconds).
pub const TIMER_LIMIT: u16 = 9999;

/// Default duration for every timer (seconds).
pub const DEFAULT_TIMER_SECS: u16 = 5;

// ---------------------------------------------------------------------------
// Timer keys
// ---------------------------------------------------------------------------

/// Name of a stage timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKey {
    /// Hold after each drive stage.
    T1,
    /// Dwell with `O4` energised (both legs).
    T2,
    /// Final dwell of the opening leg.
    T3,
    /// Final dwell of the closing leg.
    T4,
}

impl TimerKey {
    /// All keys in display (sorted) order.
    pub const ALL: [TimerKey; 4] = [Self::T1, Self::T2, Self::T3, Self::T4];

    pub const fn name(self) -> &'static str {
        match self {
            Self::T1 => "T1",
            Self::T2 => "T2",
            Self::T3 => "T3",
            Self::T4 => "T4",
        }
    }
}

impl fmt::Display for TimerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` so width/alignment specifiers apply in LCD row formatting.
        f.pad(self.name())
    }
}

// ---------------------------------------------------------------------------
// Timer values
// ---------------------------------------------------------------------------

/// Per-stage durations in whole seconds, each in `[0, TIMER_LIMIT)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(rename = "T1")]
    pub t1: u16,
    #[serde(rename = "T2")]
    pub t2: u16,
    #[serde(rename = "T3")]
    pub t3: u16,
    #[serde(rename = "T4")]
    pub t4: u16,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            t1: DEFAULT_TIMER_SECS,
            t2: DEFAULT_TIMER_SECS,
            t3: DEFAULT_TIMER_SECS,
            t4: DEFAULT_TIMER_SECS,
        }
    }
}

impl TimerConfig {
    pub fn get(&self, key: TimerKey) -> u16 {
        match key {
            TimerKey::T1 => self.t1,
            TimerKey::T2 => self.t2,
            TimerKey::T3 => self.t3,
            TimerKey::T4 => self.t4,
        }
    }

    /// Store `value` under `key`, mapping out-of-range values to 0.
    pub fn set(&mut self, key: TimerKey, value: u16) {
        let value = clamp_timer(i32::from(value));
        match key {
            TimerKey::T1 => self.t1 = value,
            TimerKey::T2 => self.t2 = value,
            TimerKey::T3 => self.t3 = value,
            TimerKey::T4 => self.t4 = value,
        }
    }

    /// `(key, value)` pairs in sorted key order.
    pub fn entries(&self) -> impl Iterator<Item = (TimerKey, u16)> + '_ {
        TimerKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    /// Force every value into range.  Returns `true` if anything changed.
    pub fn sanitize(&mut self) -> bool {
        let mut changed = false;
        for key in TimerKey::ALL {
            let raw = self.get(key);
            if raw >= TIMER_LIMIT {
                warn!("config: {} = {} out of range, reset to 0", key, raw);
                self.set(key, 0);
                changed = true;
            }
        }
        changed
    }
}

/// Apply the editor's range rule: anything below 0 or at/above
/// [`TIMER_LIMIT`] becomes 0.
pub fn clamp_timer(value: i32) -> u16 {
    if value < 0 || value >= i32::from(TIMER_LIMIT) {
        0
    } else {
        value as u16
    }
}

// ---------------------------------------------------------------------------
// Configuration document
// ---------------------------------------------------------------------------

/// Top-level menu sections of the configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Timers,
}

impl Section {
    pub const ALL: [Section; 1] = [Self::Timers];

    /// Label as shown in the top-level menu and used as the JSON key.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Timers => "TIMERS",
        }
    }
}

/// Persisted configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(rename = "TIMERS")]
    pub timers: TimerConfig,
}

impl GateConfig {
    /// Parse a JSON document, normalising out-of-range values.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let mut cfg: Self = serde_json::from_slice(bytes)?;
        cfg.timers.sanitize();
        Ok(cfg)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
