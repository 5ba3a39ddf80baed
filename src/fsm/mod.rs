//! Table-driven gate cycle sequencer.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  StageTable                                                      │
//! │  ┌─────────────────┬─────────────┬──────────────┬─────────────┐  │
//! │  │ Stage           │ heading     │ action       │ hold timer  │  │
//! │  ├─────────────────┼─────────────┼──────────────┼─────────────┤  │
//! │  │ OpeningWait     │ OPENING.... │ Drive(Open)  │ T1          │  │
//! │  │ OpeningDwellOn  │ -           │ Energize(O4) │ T2          │  │
//! │  │ OpeningDwellOff │ -           │ Release(O4)  │ T3          │  │
//! │  │ ClosingWait     │ CLOSING.... │ Drive(Close) │ T1          │  │
//! │  │ ClosingDwellOn  │ -           │ Energize(O4) │ T2          │  │
//! │  │ ClosingDwellOff │ -           │ Release(O4)  │ T4          │  │
//! │  └─────────────────┴─────────────┴──────────────┴─────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A step enters the current stage (status lines, output action), counts
//! its hold time down on the display, then advances to the next row,
//! wrapping after the last one.  The stop signal is checked before each
//! stage and once per countdown second; when it is seen the sequencer
//! drives O4, Open and Close low and reports where it stopped.

pub mod countdown;
pub mod stages;

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::{Clock, DisplayPort, EventSink, GpioPort};
use crate::config::{TimerConfig, TimerKey};
use crate::io::{DigitalIo, Level, OutputLine};

pub use countdown::count_down;

// ---------------------------------------------------------------------------
// Stage identity
// ---------------------------------------------------------------------------

/// Stages of one open/dwell/close cycle, in execution order.
/// Must stay in sync with [`stages::build_stage_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Stage {
    OpeningWait = 0,
    OpeningDwellOn = 1,
    OpeningDwellOff = 2,
    ClosingWait = 3,
    ClosingDwellOn = 4,
    ClosingDwellOff = 5,
}

impl Stage {
    pub const COUNT: usize = 6;

    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::OpeningWait,
            1 => Self::OpeningDwellOn,
            2 => Self::OpeningDwellOff,
            3 => Self::ClosingWait,
            4 => Self::ClosingDwellOn,
            5 => Self::ClosingDwellOff,
            _ => {
                debug_assert!(false, "invalid stage index: {idx}");
                Self::OpeningWait
            }
        }
    }

    /// The stage that follows this one; the last wraps to the first.
    pub fn next(self) -> Self {
        Self::from_index((self as usize + 1) % Self::COUNT)
    }
}

// ---------------------------------------------------------------------------
// Stage descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Output action performed on entering a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAction {
    /// Blocking `write_pin`: pulse the line, held while its input is held.
    Drive(OutputLine),
    /// `turn_pin_on`.
    Energize(OutputLine),
    /// `turn_pin_off`.
    Release(OutputLine),
}

/// Static descriptor for a single stage.
#[derive(Debug, Clone, Copy)]
pub struct StageDescriptor {
    pub id: Stage,
    pub name: &'static str,
    /// Row 1 text, written only when the stage starts a travel direction.
    pub heading: Option<&'static str>,
    /// Row 2 text.
    pub status: &'static str,
    pub action: StageAction,
    /// Timer counted down after the action.
    pub hold: TimerKey,
}

/// Result of executing one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The stage ran to completion; `next` is now current.
    Advanced { next: Stage },
    /// The stop signal was seen during `at`.
    Cancelled { at: Stage },
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

pub struct Sequencer {
    /// Fixed-size table indexed by `Stage as usize`.
    table: [StageDescriptor; Stage::COUNT],
    current: usize,
    /// Completed cycles since boot.
    cycles: u32,
}

impl Sequencer {
    pub fn new(table: [StageDescriptor; Stage::COUNT]) -> Self {
        Self {
            table,
            current: Stage::OpeningWait as usize,
            cycles: 0,
        }
    }

    pub fn current_stage(&self) -> Stage {
        Stage::from_index(self.current)
    }

    pub fn descriptor(&self, stage: Stage) -> &StageDescriptor {
        &self.table[stage as usize]
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Rewind to the first stage.
    pub fn reset(&mut self) {
        self.current = Stage::OpeningWait as usize;
    }

    /// Run cycles from the first stage until the stop signal is seen.
    ///
    /// Returns the stage that was cancelled.  O4, Open and Close are low on
    /// return.
    pub fn run<G, C, D, K>(
        &mut self,
        io: &mut DigitalIo<'_, G, C>,
        display: &mut D,
        timers: &TimerConfig,
        sink: &mut K,
    ) -> Stage
    where
        G: GpioPort,
        C: Clock,
        D: DisplayPort,
        K: EventSink,
    {
        self.reset();
        display.clear();
        loop {
            if let StepOutcome::Cancelled { at } = self.step(io, display, timers, sink) {
                return at;
            }
        }
    }

    /// Execute the current stage and advance.
    pub fn step<G, C, D, K>(
        &mut self,
        io: &mut DigitalIo<'_, G, C>,
        display: &mut D,
        timers: &TimerConfig,
        sink: &mut K,
    ) -> StepOutcome
    where
        G: GpioPort,
        C: Clock,
        D: DisplayPort,
        K: EventSink,
    {
        let desc = self.table[self.current];

        if io.stop_signal().is_raised() {
            return self.abort(io, desc.id, sink);
        }

        let hold_secs = timers.get(desc.hold);
        sink.emit(&AppEvent::StageEntered {
            stage: desc.id,
            hold_secs,
        });
        enter_stage(&desc, io, display);

        if !count_down(io, display, hold_secs) {
            return self.abort(io, desc.id, sink);
        }

        let next = desc.id.next();
        if next == Stage::OpeningWait {
            self.cycles = self.cycles.wrapping_add(1);
            sink.emit(&AppEvent::CycleCompleted {
                cycles: self.cycles,
            });
        }
        self.current = next as usize;
        StepOutcome::Advanced { next }
    }

    fn abort<G: GpioPort, C: Clock, K: EventSink>(
        &mut self,
        io: &mut DigitalIo<'_, G, C>,
        at: Stage,
        sink: &mut K,
    ) -> StepOutcome {
        for line in [OutputLine::O4, OutputLine::Open, OutputLine::Close] {
            io.set_level(line, Level::Low);
        }
        info!("sequencer: cancelled in {}", self.table[at as usize].name);
        sink.emit(&AppEvent::RunCancelled { stage: at });
        self.reset();
        StepOutcome::Cancelled { at }
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(stages::build_stage_table())
    }
}

/// Status lines plus output action.  Lines are skipped once stopped so the
/// welcome screen is not overdrawn by a stale status.
fn enter_stage<G: GpioPort, C: Clock, D: DisplayPort>(
    desc: &StageDescriptor,
    io: &mut DigitalIo<'_, G, C>,
    display: &mut D,
) {
    if !io.stop_signal().is_raised() {
        if let Some(heading) = desc.heading {
            display.write_line_center(heading, 1);
        }
        display.write_line_center(desc.status, 2);
    }

    match desc.action {
        StageAction::Drive(line) => io.write_pin(line),
        StageAction::Energize(line) => io.turn_pin_on(line),
        StageAction::Release(line) => io.turn_pin_off(line),
    }
}
