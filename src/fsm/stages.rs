//! Stage table builder.
//!
//! ```text
//!  OpeningWait ─▶ OpeningDwellOn ─▶ OpeningDwellOff ─┐
//!       ▲                                            ▼
//!  ClosingDwellOff ◀─ ClosingDwellOn ◀──────── ClosingWait
//!
//!  Any stage ──[stop signal]──▶ (run ends, O4/Open/Close low)
//! ```
//!
//! The final dwell of the opening leg waits T3, the closing leg waits T4.

use super::{Stage, StageAction, StageDescriptor};
use crate::app::screen::{CLOSING, OPENING, TURN_OFF, TURN_ON, WAITING};
use crate::config::TimerKey;
use crate::io::OutputLine;

/// Build the static stage table.  Called once at startup.
pub fn build_stage_table() -> [StageDescriptor; Stage::COUNT] {
    [
        // Index 0: OpeningWait
        StageDescriptor {
            id: Stage::OpeningWait,
            name: "OpeningWait",
            heading: Some(OPENING),
            status: WAITING,
            action: StageAction::Drive(OutputLine::Open),
            hold: TimerKey::T1,
        },
        // Index 1: OpeningDwellOn
        StageDescriptor {
            id: Stage::OpeningDwellOn,
            name: "OpeningDwellOn",
            heading: None,
            status: TURN_ON,
            action: StageAction::Energize(OutputLine::O4),
            hold: TimerKey::T2,
        },
        // Index 2: OpeningDwellOff
        StageDescriptor {
            id: Stage::OpeningDwellOff,
            name: "OpeningDwellOff",
            heading: None,
            status: TURN_OFF,
            action: StageAction::Release(OutputLine::O4),
            hold: TimerKey::T3,
        },
        // Index 3: ClosingWait
        StageDescriptor {
            id: Stage::ClosingWait,
            name: "ClosingWait",
            heading: Some(CLOSING),
            status: WAITING,
            action: StageAction::Drive(OutputLine::Close),
            hold: TimerKey::T1,
        },
        // Index 4: ClosingDwellOn
        StageDescriptor {
            id: Stage::ClosingDwellOn,
            name: "ClosingDwellOn",
            heading: None,
            status: TURN_ON,
            action: StageAction::Energize(OutputLine::O4),
            hold: TimerKey::T2,
        },
        // Index 5: ClosingDwellOff
        StageDescriptor {
            id: Stage::ClosingDwellOff,
            name: "ClosingDwellOff",
            heading: None,
            status: TURN_OFF,
            action: StageAction::Release(OutputLine::O4),
            hold: TimerKey::T4,
        },
    ]
}
