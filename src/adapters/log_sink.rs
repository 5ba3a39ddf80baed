//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{error, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Initialized { version } => {
                info!("RUN | initialized, firmware v{}", version);
            }
            AppEvent::RunStarted { trigger } => {
                info!("RUN | started by {:?} input", trigger);
            }
            AppEvent::StageEntered { stage, hold_secs } => {
                info!("STAGE | {:?} hold={}s", stage, hold_secs);
            }
            AppEvent::CycleCompleted { cycles } => {
                info!("RUN | cycle complete, total={}", cycles);
            }
            AppEvent::RunCancelled { stage } => {
                info!("RUN | cancelled during {:?}", stage);
            }
            AppEvent::MenuEntered => {
                info!("MENU | configuration opened");
            }
            AppEvent::EditStarted { key, value } => {
                info!("MENU | editing {} (was {})", key, value);
            }
            AppEvent::ConfigCommitted { key, value } => {
                info!("CONFIG | {} = {} saved", key, value);
            }
            AppEvent::ConfigCommitFailed { key, error: e } => {
                error!("CONFIG | {} not saved: {}, keeping previous values", key, e);
            }
        }
    }
}
