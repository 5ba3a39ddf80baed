//! Emergency-stop coordinator.
//!
//! Turns the raw rising edge on the Stop input into a single, debounced
//! raise of the [`StopSignal`].  The coordinator runs in its own context
//! (the stop task, higher priority than the control loop) and owns the
//! Stop input and the Stop indicator output.
//!
//! ## Press lifecycle
//!
//! 1. The Stop ISR records an edge; the stop task calls
//!    [`StopCoordinator::on_stop_edge`].
//! 2. A debounced read confirms the press: the indicator lights and the
//!    Stop interrupt is disarmed so chatter cannot re-enter the handler.
//! 3. While lit, the handler polls until the button reads released and
//!    [`STOP_SETTLE_MS`] have passed.
//! 4. On release: indicator off, raise the stop signal, re-arm the
//!    interrupt.
//!
//! The signal is raised at release, not at press.  A loop polling between
//! press and release sees nothing yet; the gate keeps its state until the
//! operator lets go of the button.

use log::{info, warn};

use crate::app::ports::{Clock, GpioPort};
use crate::io::{DigitalIo, InputLine, Level, OutputLine};

/// Release poll interval while the indicator is lit (ms).
pub const STOP_POLL_MS: u32 = 10;
/// Minimum time between press confirmation and release (ms).
pub const STOP_SETTLE_MS: u64 = 5;
/// Idle poll interval of the stop task between edges (ms).
pub const STOP_IDLE_POLL_MS: u32 = 5;

/// Result of handling one Stop edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Edge not confirmed by the debounced read; nothing changed.
    Spurious,
    /// Press confirmed, button released, stop signal raised.
    Raised,
}

/// Emergency-stop coordinator.
pub struct StopCoordinator<'s, G, C> {
    io: DigitalIo<'s, G, C>,
    is_stopled_on: bool,
    /// Confirmed presses since boot.
    presses: u32,
}

impl<'s, G: GpioPort, C: Clock> StopCoordinator<'s, G, C> {
    pub fn new(io: DigitalIo<'s, G, C>) -> Self {
        Self {
            io,
            is_stopled_on: false,
            presses: 0,
        }
    }

    /// Arm the Stop interrupt.  Call once before the first edge can fire.
    pub fn arm(&mut self) {
        self.io.gpio().set_stop_interrupt(true);
        info!("stop: interrupt armed");
    }

    /// Handle one rising edge on the Stop input.  Runs to completion,
    /// which includes waiting for the button to be released.
    pub fn on_stop_edge(&mut self) -> StopOutcome {
        if !self.is_stopled_on && self.io.read_pin(InputLine::Stop) {
            self.io.set_level(OutputLine::Stop, Level::High);
            self.is_stopled_on = true;
            self.io.gpio().set_stop_interrupt(false);
            self.presses = self.presses.wrapping_add(1);
            warn!("stop: press confirmed (#{}), indicator on", self.presses);
        }

        if !self.is_stopled_on {
            return StopOutcome::Spurious;
        }

        let start = self.io.now_ms();
        let mut elapsed = 0;
        while self.io.read_pin(InputLine::Stop) || elapsed < STOP_SETTLE_MS {
            self.io.sleep_ms(STOP_POLL_MS);
            elapsed = self.io.clock().elapsed_ms(start);
        }

        self.io.set_level(OutputLine::Stop, Level::Low);
        self.is_stopled_on = false;
        self.io.stop_signal().raise();
        self.io.gpio().set_stop_interrupt(true);
        warn!("stop: released after {} ms, stop signal raised", elapsed);

        StopOutcome::Raised
    }

    pub fn is_stopled_on(&self) -> bool {
        self.is_stopled_on
    }

    pub fn presses(&self) -> u32 {
        self.presses
    }

    /// Stop task body: handle every pending edge, forever.
    ///
    /// `take_edge` must return `true` once per recorded interrupt and clear
    /// the record.
    pub fn run(mut self, mut take_edge: impl FnMut() -> bool) -> ! {
        self.arm();
        loop {
            if take_edge() {
                self.on_stop_edge();
            } else {
                self.io.sleep_ms(STOP_IDLE_POLL_MS);
            }
        }
    }
}
