//! Outbound application events.
//!
//! The [`Controller`](super::service::Controller) and the
//! [`Sequencer`](crate::fsm::Sequencer) emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; the firmware logs them to serial.

use crate::app::ports::ConfigError;
use crate::config::TimerKey;
use crate::fsm::Stage;
use crate::io::InputLine;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Outputs reset and the welcome screen shown.
    Initialized { version: &'static str },

    /// A start input was seen at idle and the cycle begins.
    RunStarted { trigger: InputLine },

    /// The sequencer entered a stage and will hold it for `hold_secs`.
    StageEntered { stage: Stage, hold_secs: u16 },

    /// A full open/close cycle finished.
    CycleCompleted { cycles: u32 },

    /// The stop signal ended the run during `stage`.
    RunCancelled { stage: Stage },

    /// The operator opened the configuration menu.
    MenuEntered,

    /// Edit mode started on a timer row.
    EditStarted { key: TimerKey, value: u16 },

    /// A timer value was persisted and reloaded.
    ConfigCommitted { key: TimerKey, value: u16 },

    /// Saving or reloading failed; the previous configuration stays active.
    ConfigCommitFailed { key: TimerKey, error: ConfigError },
}
