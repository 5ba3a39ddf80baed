//! Mock hardware for host-side integration tests.
//!
//! Everything hangs off a shared [`Bench`]: a virtual clock that only
//! moves when the code under test sleeps, input lines driven by time
//! windows, and actions scheduled at a virtual time (the stand-in for an
//! interrupt or a second task).  The port implementations hold a handle to
//! the bench so a test can inspect outputs after handing them over.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use gatedrive::app::events::AppEvent;
use gatedrive::app::ports::{
    Clock, ConfigError, ConfigStore, DisplayPort, EncoderPort, EventSink, GpioPort,
};
use gatedrive::app::screen::{LCD_COLS, LCD_ROWS};
use gatedrive::config::GateConfig;
use gatedrive::io::{DigitalIo, InputLine, Level, OutputLine};
use gatedrive::stop_signal::StopSignal;

/// A fresh stop signal that outlives the test.
pub fn leak_stop() -> &'static StopSignal {
    Box::leak(Box::new(StopSignal::new()))
}

// ── Bench ─────────────────────────────────────────────────────

type Action = Box<dyn FnOnce()>;

#[derive(Default)]
struct BenchState {
    now_us: u64,
    /// `(line, from_us, to_us)`: the line reads high inside the window.
    inputs: Vec<(InputLine, u64, u64)>,
    outputs: Vec<(OutputLine, Level)>,
    writes: Vec<(u64, OutputLine, Level)>,
    stop_irq_enabled: bool,
    scheduled: Vec<(u64, Action)>,
}

/// Shared virtual world.  Cheap to clone.
#[derive(Clone, Default)]
pub struct Bench {
    state: Rc<RefCell<BenchState>>,
}

#[allow(dead_code)]
impl Bench {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock(&self) -> MockClock {
        MockClock {
            bench: self.clone(),
        }
    }

    pub fn gpio(&self) -> MockGpio {
        MockGpio {
            bench: self.clone(),
        }
    }

    pub fn io(&self, stop: &'static StopSignal) -> DigitalIo<'static, MockGpio, MockClock> {
        DigitalIo::new(self.gpio(), self.clock(), stop)
    }

    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_us / 1000
    }

    /// Hold `line` high from `from_ms` until `to_ms`.
    pub fn hold_input(&self, line: InputLine, from_ms: u64, to_ms: u64) {
        self.state
            .borrow_mut()
            .inputs
            .push((line, from_ms * 1000, to_ms * 1000));
    }

    /// Pulse `line` high for `len_us` microseconds starting at `at_us`.
    pub fn glitch_input(&self, line: InputLine, at_us: u64, len_us: u64) {
        self.state
            .borrow_mut()
            .inputs
            .push((line, at_us, at_us + len_us));
    }

    /// Run `action` the first time the clock reaches `at_ms`.
    pub fn at(&self, at_ms: u64, action: impl FnOnce() + 'static) {
        self.state
            .borrow_mut()
            .scheduled
            .push((at_ms * 1000, Box::new(action)));
    }

    /// Raise `stop` once the clock reaches `at_ms`.
    pub fn raise_stop_at(&self, at_ms: u64, stop: &'static StopSignal) {
        self.at(at_ms, move || stop.raise());
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1000);
    }

    fn advance_us(&self, us: u64) {
        let due: Vec<Action> = {
            let mut s = self.state.borrow_mut();
            s.now_us += us;
            let now = s.now_us;
            let (due, pending): (Vec<_>, Vec<_>) =
                s.scheduled.drain(..).partition(|(at, _)| *at <= now);
            s.scheduled = pending;
            due.into_iter().map(|(_, action)| action).collect()
        };
        for action in due {
            action();
        }
    }

    pub fn output(&self, line: OutputLine) -> Level {
        self.state
            .borrow()
            .outputs
            .iter()
            .rev()
            .find(|(l, _)| *l == line)
            .map_or(Level::Low, |(_, level)| *level)
    }

    /// Every write to `line` as `(time_ms, level)`.
    pub fn writes_to(&self, line: OutputLine) -> Vec<(u64, Level)> {
        self.state
            .borrow()
            .writes
            .iter()
            .filter(|(_, l, _)| *l == line)
            .map(|(t, _, level)| (t / 1000, *level))
            .collect()
    }

    pub fn stop_irq_enabled(&self) -> bool {
        self.state.borrow().stop_irq_enabled
    }
}

// ── MockClock ─────────────────────────────────────────────────

pub struct MockClock {
    bench: Bench,
}

impl DelayNs for MockClock {
    fn delay_ns(&mut self, ns: u32) {
        self.bench.advance_us(u64::from(ns.div_ceil(1000)));
    }

    fn delay_us(&mut self, us: u32) {
        self.bench.advance_us(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.bench.advance_ms(u64::from(ms));
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.bench.now_ms()
    }
}

// ── MockGpio ──────────────────────────────────────────────────

pub struct MockGpio {
    bench: Bench,
}

impl GpioPort for MockGpio {
    fn read(&mut self, line: InputLine) -> Level {
        let s = self.bench.state.borrow();
        s.inputs
            .iter()
            .any(|(l, from, to)| *l == line && (*from..*to).contains(&s.now_us))
            .into()
    }

    fn write(&mut self, line: OutputLine, level: Level) {
        let mut s = self.bench.state.borrow_mut();
        let now = s.now_us;
        s.outputs.push((line, level));
        s.writes.push((now, line, level));
    }

    fn output_level(&self, line: OutputLine) -> Level {
        self.bench.output(line)
    }

    fn set_stop_interrupt(&mut self, enabled: bool) {
        self.bench.state.borrow_mut().stop_irq_enabled = enabled;
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOp {
    Clear,
    Write { row: u8, col: u8, text: String },
}

/// 20x4 framebuffer plus a log of every call.
pub struct MockDisplay {
    frame: [[char; LCD_COLS]; LCD_ROWS as usize],
    pub ops: Vec<DisplayOp>,
    /// Bench time each `write_line` takes, for a slow bus.
    write_cost: Option<(Bench, u64)>,
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self {
            frame: [[' '; LCD_COLS]; LCD_ROWS as usize],
            ops: Vec::new(),
            write_cost: None,
        }
    }

    /// Display whose every line write advances `bench` by `write_ms`.
    pub fn slow(bench: &Bench, write_ms: u64) -> Self {
        Self {
            write_cost: Some((bench.clone(), write_ms)),
            ..Self::new()
        }
    }

    /// Row `row` (1-indexed) with trailing blanks removed.
    pub fn row(&self, row: u8) -> String {
        self.frame[usize::from(row - 1)]
            .iter()
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    /// Texts written at (`row`, `col`), in order.
    pub fn writes_at(&self, row: u8, col: u8) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DisplayOp::Write { row: r, col: c, text } if *r == row && *c == col => {
                    Some(text.clone())
                }
                _ => None,
            })
            .collect()
    }

    pub fn ever_showed(&self, needle: &str) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, DisplayOp::Write { text, .. } if text.contains(needle)))
    }
}

impl DisplayPort for MockDisplay {
    fn clear(&mut self) {
        self.frame = [[' '; LCD_COLS]; LCD_ROWS as usize];
        self.ops.push(DisplayOp::Clear);
    }

    fn write_line(&mut self, text: &str, row: u8, col: u8) {
        self.ops.push(DisplayOp::Write {
            row,
            col,
            text: text.to_string(),
        });
        if let Some((bench, ms)) = &self.write_cost {
            bench.advance_ms(*ms);
        }
        let Some(line) = self.frame.get_mut(usize::from(row.saturating_sub(1))) else {
            return;
        };
        let start = usize::from(col.saturating_sub(1));
        for (cell, ch) in line.iter_mut().skip(start).zip(text.chars()) {
            *cell = ch;
        }
    }

    fn write_line_center(&mut self, text: &str, row: u8) {
        let len = text.chars().count().min(LCD_COLS);
        let col = (LCD_COLS - len) / 2 + 1;
        self.write_line(text, row, col as u8);
    }
}

// ── MockEncoder ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Knob {
    Turn(i32),
    Press,
}

/// Encoder that replays knob actions once the clock passes their time.
pub struct MockEncoder {
    bench: Bench,
    script: Vec<(u64, Knob)>,
}

#[allow(dead_code)]
impl MockEncoder {
    pub fn new(bench: &Bench) -> Self {
        Self {
            bench: bench.clone(),
            script: Vec::new(),
        }
    }

    pub fn then(mut self, at_ms: u64, knob: Knob) -> Self {
        self.script.push((at_ms, knob));
        self
    }

    pub fn pending(&self) -> usize {
        self.script.len()
    }
}

impl EncoderPort for MockEncoder {
    fn value(&mut self) -> i32 {
        let now = self.bench.now_ms();
        let mut delta = 0;
        self.script.retain(|(at, knob)| match knob {
            Knob::Turn(steps) if *at <= now => {
                delta += steps;
                false
            }
            _ => true,
        });
        delta
    }

    fn select(&mut self) -> bool {
        let now = self.bench.now_ms();
        let pos = self
            .script
            .iter()
            .position(|(at, knob)| *at <= now && *knob == Knob::Press);
        pos.map(|i| self.script.remove(i)).is_some()
    }
}

// ── MemStore ──────────────────────────────────────────────────

/// In-memory config document.  `fail_saves` makes every save fail.
#[derive(Default)]
pub struct MemStore {
    pub doc: RefCell<Option<GateConfig>>,
    pub fail_saves: Cell<bool>,
    pub saves: Cell<u32>,
}

#[allow(dead_code)]
impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(config: GateConfig) -> Self {
        let store = Self::default();
        *store.doc.borrow_mut() = Some(config);
        store
    }

    pub fn stored(&self) -> Option<GateConfig> {
        *self.doc.borrow()
    }
}

impl ConfigStore for MemStore {
    fn load(&self) -> Result<GateConfig, ConfigError> {
        self.doc.borrow().ok_or(ConfigError::NotFound)
    }

    fn save(&self, config: &GateConfig) -> Result<(), ConfigError> {
        if self.fail_saves.get() {
            return Err(ConfigError::IoError);
        }
        self.saves.set(self.saves.get() + 1);
        *self.doc.borrow_mut() = Some(*config);
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Collects every emitted event with its virtual timestamp.
pub struct RecordingSink {
    bench: Bench,
    pub events: Vec<(u64, AppEvent)>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new(bench: &Bench) -> Self {
        Self {
            bench: bench.clone(),
            events: Vec::new(),
        }
    }

    pub fn kinds(&self) -> Vec<AppEvent> {
        self.events.iter().map(|(_, e)| e.clone()).collect()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.iter().any(|(_, e)| e == event)
    }

    pub fn time_of(&self, event: &AppEvent) -> Option<u64> {
        self.events.iter().find(|(_, e)| e == event).map(|(t, _)| *t)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push((self.bench.now_ms(), event.clone()));
    }
}
