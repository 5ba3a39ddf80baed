//! Process-wide cancellation flag.
//!
//! The stop signal is the only datum shared between the stop-handling
//! context and the control loop:
//!
//! ```text
//!  Stop ISR ─▶ StopCoordinator ──raise()──▶ ┌────────────┐
//!                                           │ StopSignal │ ◀──is_raised()── sequencer / menus
//!  Controller::initialize() ──clear()─────▶ └────────────┘
//! ```
//!
//! Writes use `Release` and reads use `Acquire`, so every output change the
//! coordinator made before raising the flag is visible to a loop that
//! observes it.

use core::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag.
///
/// Long-running operations take a `&StopSignal` and poll it at their yield
/// points; nothing is ever forcibly preempted.
#[derive(Debug)]
pub struct StopSignal {
    raised: AtomicBool,
}

/// The firmware's single stop flag, shared with the stop-handling thread.
pub static STOP_SIGNAL: StopSignal = StopSignal::new();

impl StopSignal {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// True once the stop button has been released after a confirmed press.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Raise the flag.  Only the stop coordinator calls this.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Lower the flag.  Only `Controller::initialize` calls this.
    pub fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
