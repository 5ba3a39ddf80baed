//! Configuration menu: navigation, edit mode and commit.

use gatedrive::app::events::AppEvent;
use gatedrive::app::ports::ConfigError;
use gatedrive::config::{GateConfig, TimerKey};
use gatedrive::menu::{MainMenu, Panel};

use crate::mock_hw::{Bench, Knob, MemStore, MockDisplay, MockEncoder, RecordingSink, leak_stop};

/// Open the top menu at t=0 and browse until `stop_ms`.
///
/// The top menu settles until ~320 ms; a press at 400 ms opens the timer
/// editor, which settles until ~720 ms.
fn run_menu(
    script: &[(u64, Knob)],
    store: &MemStore,
    stop_ms: u64,
) -> (GateConfig, Panel<MockDisplay, MockEncoder>, RecordingSink, Bench) {
    let bench = Bench::new();
    let stop = leak_stop();
    let mut io = bench.io(stop);
    let encoder = script
        .iter()
        .fold(MockEncoder::new(&bench), |enc, &(at, knob)| enc.then(at, knob));
    let mut panel = Panel::new(MockDisplay::new(), encoder);
    let mut sink = RecordingSink::new(&bench);
    let mut config = GateConfig::default();

    bench.raise_stop_at(stop_ms, stop);
    MainMenu::new().run(&mut io, &mut panel, store, &mut config, &mut sink);

    (config, panel, sink, bench)
}

#[test]
fn top_menu_highlights_timers_section() {
    let store = MemStore::with(GateConfig::default());
    let (_, panel, _, _) = run_menu(&[], &store, 1_000);

    assert_eq!(panel.display.row(1), ">>TIMERS");
}

#[test]
fn first_press_in_editor_enters_edit_mode() {
    let store = MemStore::with(GateConfig::default());
    let script = [(400, Knob::Press), (800, Knob::Press)];
    let (_, panel, sink, _) = run_menu(&script, &store, 1_500);

    let edits: Vec<_> = sink
        .kinds()
        .into_iter()
        .filter(|e| matches!(e, AppEvent::EditStarted { .. }))
        .collect();
    assert_eq!(
        edits,
        vec![AppEvent::EditStarted {
            key: TimerKey::T1,
            value: GateConfig::default().timers.t1
        }]
    );
    assert!(panel.display.ever_showed(":>>"));
    assert_eq!(store.saves.get(), 0);
}

#[test]
fn edit_and_commit_second_timer() {
    let store = MemStore::with(GateConfig::default());
    let script = [
        (400, Knob::Press),
        (750, Knob::Turn(1)),
        (800, Knob::Press),
        (1_400, Knob::Turn(3)),
        (1_600, Knob::Press),
    ];
    let (config, panel, sink, _) = run_menu(&script, &store, 3_000);

    assert!(sink.contains(&AppEvent::EditStarted {
        key: TimerKey::T2,
        value: 5
    }));
    assert!(sink.contains(&AppEvent::ConfigCommitted {
        key: TimerKey::T2,
        value: 8
    }));
    assert_eq!(config.timers.t2, 8);
    assert_eq!(store.stored().map(|c| c.timers.t2), Some(8));
    assert_eq!(store.saves.get(), 1);

    let row = panel.display.row(2);
    assert!(row.starts_with(">>T2"), "row 2: {row:?}");
    assert!(row.ends_with(": 8"), "row 2: {row:?}");
    assert_eq!(panel.encoder.pending(), 0);
}

#[test]
fn value_below_zero_commits_as_zero() {
    let store = MemStore::with(GateConfig::default());
    let script = [
        (400, Knob::Press),
        (800, Knob::Press),
        (1_400, Knob::Turn(-10)),
        (1_600, Knob::Press),
    ];
    let (config, _, sink, _) = run_menu(&script, &store, 3_000);

    assert!(sink.contains(&AppEvent::ConfigCommitted {
        key: TimerKey::T1,
        value: 0
    }));
    assert_eq!(config.timers.t1, 0);
}

#[test]
fn value_at_limit_commits_as_zero() {
    let store = MemStore::with(GateConfig::default());
    let script = [
        (400, Knob::Press),
        (800, Knob::Press),
        (1_400, Knob::Turn(9_994)),
        (1_600, Knob::Press),
    ];
    let (config, _, _, _) = run_menu(&script, &store, 3_000);

    assert_eq!(config.timers.t1, 0);
}

#[test]
fn edited_value_redraws_in_place() {
    let store = MemStore::with(GateConfig::default());
    let script = [
        (400, Knob::Press),
        (800, Knob::Press),
        (1_400, Knob::Turn(2)),
    ];
    let (_, panel, _, _) = run_menu(&script, &store, 2_000);

    let redraws = panel.display.writes_at(1, 13);
    assert!(redraws.iter().any(|t| t.trim_end() == "7"), "{redraws:?}");
    let edit_row = panel.display.writes_at(1, 1);
    assert!(
        edit_row.iter().any(|t| t.starts_with("T1") && t.contains(":>> 5")),
        "{edit_row:?}"
    );
}

#[test]
fn failed_commit_keeps_previous_config() {
    let store = MemStore::with(GateConfig::default());
    store.fail_saves.set(true);
    let script = [
        (400, Knob::Press),
        (800, Knob::Press),
        (1_400, Knob::Turn(4)),
        (1_600, Knob::Press),
    ];
    let (config, panel, sink, _) = run_menu(&script, &store, 3_000);

    assert!(sink.contains(&AppEvent::ConfigCommitFailed {
        key: TimerKey::T1,
        error: ConfigError::IoError
    }));
    assert_eq!(config, GateConfig::default());
    assert_eq!(store.stored(), Some(GateConfig::default()));
    let row = panel.display.row(1);
    assert!(row.ends_with(": 5"), "row 1: {row:?}");
}

#[test]
fn stop_while_entering_edit_mode_saves_nothing() {
    let store = MemStore::with(GateConfig::default());
    let script = [(400, Knob::Press), (800, Knob::Press), (1_400, Knob::Press)];
    let (config, _, sink, bench) = run_menu(&script, &store, 1_000);

    assert_eq!(config, GateConfig::default());
    assert_eq!(store.saves.get(), 0);
    assert!(!sink
        .kinds()
        .iter()
        .any(|e| matches!(e, AppEvent::ConfigCommitted { .. })));
    // Out of both loops within one settle delay of the stop.
    assert!(bench.now_ms() < 1_400);
}
