//! Application service: the hexagonal core.
//!
//! [`Controller`] owns the debounced I/O, the operator panel, the
//! configuration store and the sequencer.  It runs the single polling
//! loop of the firmware; the only thing it shares with the stop task is
//! the [`StopSignal`](crate::stop_signal::StopSignal).
//!
//! ```text
//!                 ┌──────────────── poll (every 50 ms) ────────────────┐
//!                 ▼                                                    │
//!   initialize ─▶ Idle ──[Open/Close held, Stop LED off]──▶ Running ───┤
//!        ▲          │                                                  │
//!        │          └────────[select]────────▶ Configuring ────────────┤
//!        │                                                             │
//!        └──────────────────[stop signal raised]───────────────────────┘
//! ```

use log::{error, info};

use crate::app::screen::{START_PROMPT, lcd_line};
use crate::config::GateConfig;
use crate::fsm::Sequencer;
use crate::io::{DigitalIo, InputLine, OutputLine};
use crate::menu::{MainMenu, Panel};

use super::events::AppEvent;
use super::ports::{
    Clock, ConfigStore, DisplayPort, EncoderPort, EventSink, GpioPort, load_or_init,
};

/// Firmware version shown on the welcome screen.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Poll cycle period (ms).
pub const IDLE_POLL_MS: u32 = 50;
/// How long the welcome screen stays up (ms).
pub const WELCOME_MS: u32 = 1500;

/// What the polling loop is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Configuring,
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

pub struct Controller<'s, G, C, D, E, S> {
    io: DigitalIo<'s, G, C>,
    panel: Panel<D, E>,
    store: S,
    config: GateConfig,
    sequencer: Sequencer,
    state: RunState,
}

impl<'s, G, C, D, E, S> Controller<'s, G, C, D, E, S>
where
    G: GpioPort,
    C: Clock,
    D: DisplayPort,
    E: EncoderPort,
    S: ConfigStore,
{
    /// Build the controller and load the active configuration.
    ///
    /// A store that cannot persist even the defaults is logged and the
    /// built-in defaults are used for this boot.
    pub fn new(io: DigitalIo<'s, G, C>, panel: Panel<D, E>, store: S) -> Self {
        let config = load_or_init(&store).unwrap_or_else(|e| {
            error!("config: {}, running on built-in defaults", e);
            GateConfig::default()
        });
        info!("config: timers {:?}", config.timers);

        Self {
            io,
            panel,
            store,
            config,
            sequencer: Sequencer::default(),
            state: RunState::Idle,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Clear the stop signal, drive the actuator outputs low and show the
    /// welcome screen followed by the timer list.
    pub fn initialize(&mut self, sink: &mut impl EventSink) {
        self.io.stop_signal().clear();
        self.state = RunState::Idle;
        self.io.actuators_off();

        let display = &mut self.panel.display;
        display.clear();
        display.write_line_center(&lcd_line(format_args!("WELCOME V{VERSION}")), 1);
        display.write_line_center(START_PROMPT, 3);
        self.io.sleep_ms(WELCOME_MS);

        let display = &mut self.panel.display;
        display.clear();
        for (row, (key, value)) in (1u8..).zip(self.config.timers.entries()) {
            display.write_line(&lcd_line(format_args!("{key:<10}: {value:>3}")), row, 1);
        }

        sink.emit(&AppEvent::Initialized { version: VERSION });
    }

    /// One pass of the polling loop, without the pacing sleep.
    pub fn poll(&mut self, sink: &mut impl EventSink) {
        if self.state == RunState::Idle {
            if let Some(trigger) = self.start_trigger() {
                self.run_cycle(trigger, sink);
            } else if self.panel.encoder.select() {
                self.configure(sink);
            }
        }

        if self.io.stop_signal().is_raised() {
            self.initialize(sink);
        }
    }

    /// The firmware main loop.
    pub fn run(&mut self, sink: &mut impl EventSink) -> ! {
        self.initialize(sink);
        loop {
            self.poll(sink);
            self.io.sleep_ms(IDLE_POLL_MS);
        }
    }

    // ── Transitions ───────────────────────────────────────────

    /// Start input that may begin a run: Open or Close held while the Stop
    /// indicator is dark.
    fn start_trigger(&mut self) -> Option<InputLine> {
        let trigger = if self.io.read_pin(InputLine::Close) {
            InputLine::Close
        } else if self.io.read_pin(InputLine::Open) {
            InputLine::Open
        } else {
            return None;
        };

        if self.io.output_level(OutputLine::Stop).is_high() {
            return None;
        }
        Some(trigger)
    }

    fn run_cycle(&mut self, trigger: InputLine, sink: &mut impl EventSink) {
        self.state = RunState::Running;
        sink.emit(&AppEvent::RunStarted { trigger });

        self.sequencer.run(
            &mut self.io,
            &mut self.panel.display,
            &self.config.timers,
            sink,
        );

        self.state = RunState::Idle;
    }

    fn configure(&mut self, sink: &mut impl EventSink) {
        self.state = RunState::Configuring;
        sink.emit(&AppEvent::MenuEntered);

        MainMenu::new().run(
            &mut self.io,
            &mut self.panel,
            &self.store,
            &mut self.config,
            sink,
        );

        self.state = RunState::Idle;
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> RunState {
        self.state
    }

    /// The configuration the next run will use.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn io(&mut self) -> &mut DigitalIo<'s, G, C> {
        &mut self.io
    }

    pub fn panel(&mut self) -> &mut Panel<D, E> {
        &mut self.panel
    }
}
