//! Controller polling loop: welcome screen, start triggers, cancellation
//! and the menu entry.

use gatedrive::app::events::AppEvent;
use gatedrive::app::screen::START_PROMPT;
use gatedrive::app::service::{Controller, RunState, VERSION, WELCOME_MS};
use gatedrive::config::{GateConfig, TimerConfig};
use gatedrive::fsm::Stage;
use gatedrive::io::{InputLine, Level, OutputLine};
use gatedrive::menu::Panel;
use gatedrive::stop_signal::StopSignal;

use crate::mock_hw::{
    Bench, Knob, MemStore, MockClock, MockDisplay, MockEncoder, MockGpio, RecordingSink,
    leak_stop,
};

type TestController =
    Controller<'static, MockGpio, MockClock, MockDisplay, MockEncoder, MemStore>;

struct Rig {
    bench: Bench,
    stop: &'static StopSignal,
    controller: TestController,
    sink: RecordingSink,
}

fn rig(timers: TimerConfig, encoder: impl FnOnce(MockEncoder) -> MockEncoder) -> Rig {
    let bench = Bench::new();
    let stop = leak_stop();
    let panel = Panel::new(MockDisplay::new(), encoder(MockEncoder::new(&bench)));
    let store = MemStore::with(GateConfig { timers });
    let controller = Controller::new(bench.io(stop), panel, store);
    let sink = RecordingSink::new(&bench);
    Rig {
        bench,
        stop,
        controller,
        sink,
    }
}

fn count(sink: &RecordingSink, pred: impl Fn(&AppEvent) -> bool) -> usize {
    sink.events.iter().filter(|(_, e)| pred(e)).count()
}

// ── initialize ───────────────────────────────────────────────

#[test]
fn initialize_resets_outputs_and_shows_timers() {
    let mut r = rig(TimerConfig { t1: 2, t2: 1, t3: 1, t4: 3 }, |e| e);
    r.stop.raise();
    r.controller.io().set_level(OutputLine::O4, Level::High);

    r.controller.initialize(&mut r.sink);

    assert!(!r.stop.is_raised());
    assert_eq!(r.controller.state(), RunState::Idle);
    for line in OutputLine::ALL {
        assert_eq!(r.bench.output(line), Level::Low, "{line:?}");
    }

    let display = &r.controller.panel().display;
    assert!(display.ever_showed(&format!("WELCOME V{VERSION}")));
    assert!(display.ever_showed(START_PROMPT));
    assert_eq!(display.row(1), "T1        :   2");
    assert_eq!(display.row(4), "T4        :   3");

    assert!(r.bench.now_ms() >= u64::from(WELCOME_MS));
    assert_eq!(
        r.sink.kinds(),
        vec![AppEvent::Initialized { version: VERSION }]
    );
}

#[test]
fn empty_store_starts_on_defaults() {
    let bench = Bench::new();
    let panel = Panel::new(MockDisplay::new(), MockEncoder::new(&bench));
    let controller = Controller::new(bench.io(leak_stop()), panel, MemStore::new());
    assert_eq!(*controller.config(), GateConfig::default());
}

#[test]
fn unwritable_store_still_starts_on_defaults() {
    let bench = Bench::new();
    let panel = Panel::new(MockDisplay::new(), MockEncoder::new(&bench));
    let store = MemStore::new();
    store.fail_saves.set(true);
    let controller = Controller::new(bench.io(leak_stop()), panel, store);
    assert_eq!(*controller.config(), GateConfig::default());
}

// ── Runs ─────────────────────────────────────────────────────

#[test]
fn open_input_starts_run_and_stop_returns_to_welcome() {
    let mut r = rig(TimerConfig { t1: 2, t2: 3, t3: 1, t4: 1 }, |e| e);
    r.controller.initialize(&mut r.sink);
    let t0 = r.bench.now_ms();

    r.bench.hold_input(InputLine::Open, t0, t0 + 200);
    // OpeningDwellOn holds from ~t0+2.5 s to ~t0+5.5 s.
    r.bench.raise_stop_at(t0 + 3_500, r.stop);

    r.controller.poll(&mut r.sink);

    let events = r.sink.kinds();
    assert_eq!(
        events.get(1),
        Some(&AppEvent::RunStarted {
            trigger: InputLine::Open
        })
    );
    let cancelled = AppEvent::RunCancelled {
        stage: Stage::OpeningDwellOn,
    };
    assert!(r.sink.contains(&cancelled));
    assert_eq!(
        events.last(),
        Some(&AppEvent::Initialized { version: VERSION }),
        "re-initialised after the stop"
    );

    assert_eq!(r.bench.output(OutputLine::O4), Level::Low);
    assert_eq!(r.controller.state(), RunState::Idle);
    assert!(!r.stop.is_raised());
    assert_eq!(r.controller.sequencer().current_stage(), Stage::OpeningWait);
}

#[test]
fn close_input_wins_when_both_are_held() {
    let mut r = rig(TimerConfig::default(), |e| e);
    r.controller.initialize(&mut r.sink);
    let t0 = r.bench.now_ms();

    r.bench.hold_input(InputLine::Open, t0, t0 + 100);
    r.bench.hold_input(InputLine::Close, t0, t0 + 100);
    r.bench.raise_stop_at(t0 + 1_000, r.stop);

    r.controller.poll(&mut r.sink);

    assert!(r.sink.contains(&AppEvent::RunStarted {
        trigger: InputLine::Close
    }));
}

#[test]
fn lit_stop_indicator_blocks_start() {
    let mut r = rig(TimerConfig::default(), |e| e);
    r.controller.initialize(&mut r.sink);
    let t0 = r.bench.now_ms();

    r.controller.io().set_level(OutputLine::Stop, Level::High);
    r.bench.hold_input(InputLine::Open, t0, t0 + 1_000);

    r.controller.poll(&mut r.sink);

    assert_eq!(
        count(&r.sink, |e| matches!(e, AppEvent::RunStarted { .. })),
        0
    );
    assert_eq!(r.controller.state(), RunState::Idle);
    assert!(
        r.bench
            .writes_to(OutputLine::Open)
            .iter()
            .all(|(_, l)| *l == Level::Low)
    );
}

#[test]
fn reinitialise_leaves_held_stop_indicator_lit() {
    let mut r = rig(TimerConfig::default(), |e| e);
    r.controller.initialize(&mut r.sink);
    let t0 = r.bench.now_ms();

    // The stop task has lit the indicator and raised the signal while the
    // operator keeps the button down and a start input is asserted.
    r.controller.io().set_level(OutputLine::Stop, Level::High);
    r.stop.raise();
    r.bench.hold_input(InputLine::Open, t0, t0 + 10_000);

    r.controller.poll(&mut r.sink);
    assert!(!r.stop.is_raised());
    assert_eq!(r.bench.output(OutputLine::Stop), Level::High);

    r.controller.poll(&mut r.sink);
    assert_eq!(
        count(&r.sink, |e| matches!(e, AppEvent::RunStarted { .. })),
        0
    );
    assert_eq!(
        r.bench.writes_to(OutputLine::Stop),
        vec![(t0, Level::High)],
        "only the stop task may write the indicator"
    );
}

#[test]
fn quiet_poll_does_nothing() {
    let mut r = rig(TimerConfig::default(), |e| e);
    r.controller.initialize(&mut r.sink);

    r.controller.poll(&mut r.sink);

    assert_eq!(r.sink.events.len(), 1);
    assert_eq!(r.controller.state(), RunState::Idle);
}

// ── Menu entry ───────────────────────────────────────────────

#[test]
fn select_at_idle_opens_menu_until_stop() {
    let mut r = rig(TimerConfig::default(), |e| e.then(1_500, Knob::Press));
    r.controller.initialize(&mut r.sink);
    let t0 = r.bench.now_ms();
    r.bench.raise_stop_at(t0 + 1_000, r.stop);

    r.controller.poll(&mut r.sink);

    let events = r.sink.kinds();
    assert_eq!(events.get(1), Some(&AppEvent::MenuEntered));
    assert_eq!(
        count(&r.sink, |e| matches!(e, AppEvent::Initialized { .. })),
        2
    );
    assert!(r.controller.panel().display.ever_showed(">>TIMERS"));
    assert_eq!(r.controller.state(), RunState::Idle);
    assert!(!r.stop.is_raised());
}

#[test]
fn edits_made_in_menu_drive_the_next_run() {
    let mut r = rig(TimerConfig::default(), |e| {
        e.then(1_500, Knob::Press) // top menu (until ~1.8 s)
            .then(1_900, Knob::Press) // timer editor (until ~2.2 s)
            .then(2_300, Knob::Press) // edit T1 (until ~2.8 s)
            .then(2_900, Knob::Turn(-3))
            .then(3_100, Knob::Press)
    });
    r.controller.initialize(&mut r.sink);
    r.bench.raise_stop_at(4_000, r.stop);

    r.controller.poll(&mut r.sink);
    assert_eq!(r.controller.config().timers.t1, 2);

    let t0 = r.bench.now_ms();
    r.bench.hold_input(InputLine::Open, t0, t0 + 100);
    r.bench.raise_stop_at(t0 + 1_000, r.stop);
    r.controller.poll(&mut r.sink);

    assert!(r.sink.contains(&AppEvent::StageEntered {
        stage: Stage::OpeningWait,
        hold_secs: 2
    }));
}
