//! Debounced digital I/O.
//!
//! Wraps a raw [`GpioPort`] and a [`Clock`] with the three primitives the
//! control loop is built from:
//!
//! | Operation        | Behaviour                                               |
//! |------------------|---------------------------------------------------------|
//! | `read_pin`       | 3 samples, all must be asserted                         |
//! | `write_pin`      | assert, hold ≥ `hold_ms` and until the paired input     |
//! |                  | releases, then always deassert                          |
//! | `turn_pin_on/off`| immediate, ignored while the stop signal is raised      |
//!
//! ## Blocking contract
//!
//! `write_pin` waits for as long as its paired input reads asserted.  A
//! button physically held down keeps the actuator driven; this is the
//! interlock behaviour, not a hang.

use log::debug;

use crate::app::ports::{Clock, GpioPort};
use crate::stop_signal::StopSignal;

/// Number of consecutive samples a debounced read requires.
pub const DEBOUNCE_SAMPLES: u32 = 3;
/// Delay after each debounce sample (µs).
pub const DEBOUNCE_SAMPLE_US: u32 = 50;
/// Minimum time `write_pin` keeps its output asserted (ms).
pub const WRITE_HOLD_MS: u64 = 500;
/// Re-check interval while `write_pin` waits (ms).
pub const WRITE_POLL_MS: u32 = 50;

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

/// Logic level of a line.  Inputs are pull-down, so `High` = asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

/// Named input lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputLine {
    Open,
    Close,
    Stop,
    OpenLimit,
    CloseLimit,
}

impl InputLine {
    pub const ALL: [InputLine; 5] = [
        Self::Open,
        Self::Close,
        Self::Stop,
        Self::OpenLimit,
        Self::CloseLimit,
    ];
}

/// Named output lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputLine {
    Open,
    Close,
    Stop,
    Counter,
    O4,
}

impl OutputLine {
    pub const ALL: [OutputLine; 5] = [
        Self::Open,
        Self::Close,
        Self::Stop,
        Self::Counter,
        Self::O4,
    ];

    /// Outputs owned by the control loop.  The Stop indicator belongs to
    /// the stop task and is left out.
    pub const ACTUATORS: [OutputLine; 4] = [Self::Open, Self::Close, Self::Counter, Self::O4];

    /// The input that shares this output's name, if any.
    ///
    /// `write_pin` waits on it; lines without one never hold the output.
    pub const fn paired_input(self) -> Option<InputLine> {
        match self {
            Self::Open => Some(InputLine::Open),
            Self::Close => Some(InputLine::Close),
            Self::Stop => Some(InputLine::Stop),
            Self::Counter | Self::O4 => None,
        }
    }
}

// ---------------------------------------------------------------------------
// DigitalIo
// ---------------------------------------------------------------------------

/// Exclusive owner of a set of lines plus the clock used to pace them.
pub struct DigitalIo<'s, G, C> {
    gpio: G,
    clock: C,
    stop: &'s StopSignal,
}

impl<'s, G: GpioPort, C: Clock> DigitalIo<'s, G, C> {
    pub fn new(gpio: G, clock: C, stop: &'s StopSignal) -> Self {
        Self { gpio, clock, stop }
    }

    pub fn stop_signal(&self) -> &'s StopSignal {
        self.stop
    }

    pub fn clock(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn gpio(&mut self) -> &mut G {
        &mut self.gpio
    }

    /// Debounced read with the default sample delay.
    pub fn read_pin(&mut self, line: InputLine) -> bool {
        self.read_pin_with_delay(line, DEBOUNCE_SAMPLE_US)
    }

    /// Sample `line` [`DEBOUNCE_SAMPLES`] times, `delay_us` apart.
    /// True only if every sample is asserted.
    pub fn read_pin_with_delay(&mut self, line: InputLine, delay_us: u32) -> bool {
        let mut asserted = 0;
        for _ in 0..DEBOUNCE_SAMPLES {
            if self.gpio.read(line).is_high() {
                asserted += 1;
            }
            self.clock.delay_us(delay_us);
        }
        asserted == DEBOUNCE_SAMPLES
    }

    /// Debounced read of the input paired with `line`; false when none.
    fn read_paired(&mut self, line: OutputLine) -> bool {
        line.paired_input().is_some_and(|input| self.read_pin(input))
    }

    /// Blocking write with the default hold time.
    pub fn write_pin(&mut self, line: OutputLine) {
        self.write_pin_for(line, WRITE_HOLD_MS);
    }

    /// Assert `line` (unless stopped), keep it asserted for at least
    /// `hold_ms` and while its paired input is held, then deassert.
    ///
    /// The output is low on return no matter when the stop signal was
    /// raised.
    pub fn write_pin_for(&mut self, line: OutputLine, hold_ms: u64) {
        if !self.stop.is_raised() {
            self.gpio.write(line, Level::High);
        }

        let start = self.clock.now_ms();
        let mut elapsed = 0;
        while self.read_paired(line) || elapsed < hold_ms {
            self.clock.delay_ms(WRITE_POLL_MS);
            elapsed = self.clock.elapsed_ms(start);
        }

        self.gpio.write(line, Level::Low);
        debug!("write_pin: {:?} released after {} ms", line, elapsed);
    }

    /// Assert `line` unless the stop signal is raised.
    pub fn turn_pin_on(&mut self, line: OutputLine) {
        if !self.stop.is_raised() {
            self.gpio.write(line, Level::High);
        }
    }

    /// Deassert `line` unless the stop signal is raised.
    pub fn turn_pin_off(&mut self, line: OutputLine) {
        if !self.stop.is_raised() {
            self.gpio.write(line, Level::Low);
        }
    }

    /// Unconditional write, for initialisation and fail-safe paths.
    pub fn set_level(&mut self, line: OutputLine, level: Level) {
        self.gpio.write(line, level);
    }

    /// Drive every control-loop output low.  The Stop indicator keeps its
    /// level.
    pub fn actuators_off(&mut self) {
        for line in OutputLine::ACTUATORS {
            self.gpio.write(line, Level::Low);
        }
    }

    pub fn output_level(&self, line: OutputLine) -> Level {
        self.gpio.output_level(line)
    }

    /// Milliseconds on this I/O layer's clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn sleep_ms(&mut self, ms: u32) {
        self.clock.delay_ms(ms);
    }
}
