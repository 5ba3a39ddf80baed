//! Rotary encoder with push button.
//!
//! ## Hardware
//!
//! CLK (A) and DT (B) quadrature outputs plus a push button, all
//! active-low with pull-ups.  A sampler thread polls the pins every
//! [`SAMPLE_PERIOD_US`] and publishes into a shared [`RotaryHandle`]; the
//! control loop only ever touches the handle.
//!
//! ## Decoding
//!
//! Quadrature is decoded by a small state machine that only counts a
//! detent once both channels have passed through low, so contact bounce
//! on one channel returns to `Idle` without a count.
//!
//! ```text
//!   CW:  Idle(1,1) ─▶ CwStep1(0,1) ─▶ CwStep2(0,0) ─▶ +1
//!   CCW: Idle(1,1) ─▶ CcwStep1(1,0) ─▶ CcwStep2(0,0) ─▶ −1
//! ```
//!
//! The button counts as pressed after [`BUTTON_DEBOUNCE_SAMPLES`]
//! identical low samples and latches one press per press edge.

use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::app::ports::EncoderPort;

/// Pin sampling period (µs).
pub const SAMPLE_PERIOD_US: u32 = 1000;
/// Consecutive identical samples needed to accept a button level.
pub const BUTTON_DEBOUNCE_SAMPLES: u8 = 10;

// ── Shared handle ─────────────────────────────────────────────

#[derive(Debug, Default)]
struct Shared {
    delta: AtomicI32,
    pressed: AtomicBool,
}

/// Control-loop side of the encoder.  Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct RotaryHandle {
    shared: Arc<Shared>,
}

impl RotaryHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_steps(&self, steps: i32) {
        self.shared.delta.fetch_add(steps, Ordering::AcqRel);
    }

    fn latch_press(&self) {
        self.shared.pressed.store(true, Ordering::Release);
    }
}

impl EncoderPort for RotaryHandle {
    fn value(&mut self) -> i32 {
        self.shared.delta.swap(0, Ordering::AcqRel)
    }

    fn select(&mut self) -> bool {
        self.shared.pressed.swap(false, Ordering::AcqRel)
    }
}

// ── Decoder ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    CwStep1,
    CwStep2,
    CcwStep1,
    CcwStep2,
}

/// Pure decoding logic, fed one sample at a time.
#[derive(Debug, Clone)]
pub struct Decoder {
    state: State,
    button_down: bool,
    button_run: u8,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            button_down: false,
            button_run: 0,
        }
    }

    /// Feed the channel levels (`true` = high).  Returns +1 / −1 on a
    /// completed detent, 0 otherwise.
    pub fn step(&mut self, a: bool, b: bool) -> i32 {
        match self.state {
            State::Idle => {
                if !a && b {
                    self.state = State::CwStep1;
                } else if a && !b {
                    self.state = State::CcwStep1;
                }
                0
            }
            State::CwStep1 | State::CcwStep1 => {
                if !a && !b {
                    self.state = if self.state == State::CwStep1 {
                        State::CwStep2
                    } else {
                        State::CcwStep2
                    };
                } else if a && b {
                    self.state = State::Idle;
                }
                0
            }
            State::CwStep2 => {
                if a || b {
                    self.state = State::Idle;
                    return 1;
                }
                0
            }
            State::CcwStep2 => {
                if a || b {
                    self.state = State::Idle;
                    return -1;
                }
                0
            }
        }
    }

    /// Feed the raw button level (`true` = held).  Returns `true` on the
    /// debounced press edge.
    pub fn button(&mut self, held: bool) -> bool {
        if held == self.button_down {
            self.button_run = 0;
            return false;
        }
        self.button_run += 1;
        if self.button_run < BUTTON_DEBOUNCE_SAMPLES {
            return false;
        }
        self.button_run = 0;
        self.button_down = held;
        held
    }
}

// ── Sampler ───────────────────────────────────────────────────

/// Sampler-thread side of the encoder.
pub struct RotaryEncoder<A, B, S> {
    clk: A,
    dt: B,
    button: S,
    decoder: Decoder,
    handle: RotaryHandle,
}

impl<A: InputPin, B: InputPin, S: InputPin> RotaryEncoder<A, B, S> {
    pub fn new(clk: A, dt: B, button: S) -> Self {
        Self {
            clk,
            dt,
            button,
            decoder: Decoder::new(),
            handle: RotaryHandle::new(),
        }
    }

    /// Handle for the control loop.
    pub fn handle(&self) -> RotaryHandle {
        self.handle.clone()
    }

    /// Take one sample of all three pins.  A pin read error skips the
    /// sample.
    pub fn sample(&mut self) {
        let (Ok(a), Ok(b), Ok(btn_high)) =
            (self.clk.is_high(), self.dt.is_high(), self.button.is_high())
        else {
            return;
        };

        let steps = self.decoder.step(a, b);
        if steps != 0 {
            self.handle.add_steps(steps);
        }
        if self.decoder.button(!btn_high) {
            self.handle.latch_press();
        }
    }

    /// Sampler thread body.
    pub fn run(mut self, mut delay: impl DelayNs) -> ! {
        loop {
            self.sample();
            delay.delay_us(SAMPLE_PERIOD_US);
        }
    }
}
