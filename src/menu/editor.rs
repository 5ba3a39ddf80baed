//! Timer editor: browse `KEY: VALUE` rows and edit one value in place.
//!
//! Turning the knob moves the highlight.  A select press puts the
//! highlighted row in edit mode, where turning changes the value (anything
//! below 0 or at/above the limit becomes 0) and only the value field is
//! redrawn, at most every [`EDIT_REDRAW_MS`].  A second select commits:
//! the whole document is saved, read back, and the rows rebuilt from what
//! was read.  A failed commit keeps the previous values.

use log::debug;

use super::{
    COMMIT_SETTLE_MS, EDIT_ENTER_MS, EDIT_REDRAW_MS, MENU_POLL_MS, MENU_SETTLE_MS, Panel,
    PairedCursor,
};
use crate::app::events::AppEvent;
use crate::app::ports::{Clock, ConfigStore, DisplayPort, EncoderPort, EventSink, GpioPort};
use crate::app::screen::{EDITOR_ROW_COL, EDITOR_VALUE_COL, LCD_ROWS, MARKER, lcd_line};
use crate::config::{GateConfig, TimerConfig, TimerKey, clamp_timer};
use crate::io::DigitalIo;

pub struct TimerEditor {
    rows: PairedCursor<TimerKey, u16>,
}

impl TimerEditor {
    pub fn new(timers: &TimerConfig) -> Self {
        Self {
            rows: PairedCursor::new(timers.entries(), usize::from(LCD_ROWS)),
        }
    }

    pub fn rows(&self) -> &PairedCursor<TimerKey, u16> {
        &self.rows
    }

    /// Browse and edit until the stop signal is raised.
    pub fn run<G, C, D, E, S, K>(
        &mut self,
        io: &mut DigitalIo<'_, G, C>,
        panel: &mut Panel<D, E>,
        store: &S,
        config: &mut GateConfig,
        sink: &mut K,
    ) where
        G: GpioPort,
        C: Clock,
        D: DisplayPort,
        E: EncoderPort,
        S: ConfigStore,
        K: EventSink,
    {
        let stop = io.stop_signal();
        let mut first_entry = true;

        while !stop.is_raised() {
            let delta = panel.encoder.value();
            if first_entry {
                self.draw(&mut panel.display);
                first_entry = false;
                io.sleep_ms(MENU_SETTLE_MS);
            } else if delta > 0 {
                self.rows.step_down();
                self.draw(&mut panel.display);
            } else if delta < 0 {
                self.rows.step_up();
                self.draw(&mut panel.display);
            } else if panel.encoder.select() {
                self.edit_selected(io, panel, store, config, sink);
            }
            io.sleep_ms(MENU_POLL_MS);
        }
    }

    /// Edit mode on the highlighted row.  Returns on commit or stop.
    fn edit_selected<G, C, D, E, S, K>(
        &mut self,
        io: &mut DigitalIo<'_, G, C>,
        panel: &mut Panel<D, E>,
        store: &S,
        config: &mut GateConfig,
        sink: &mut K,
    ) where
        G: GpioPort,
        C: Clock,
        D: DisplayPort,
        E: EncoderPort,
        S: ConfigStore,
        K: EventSink,
    {
        let Some((&key, &initial)) = self.rows.selected() else {
            return;
        };
        let row = self.highlight_row();
        let stop = io.stop_signal();

        panel.display.write_line(
            &lcd_line(format_args!("{:<8}:{MARKER} {:<8}", key, initial)),
            row,
            1,
        );
        sink.emit(&AppEvent::EditStarted {
            key,
            value: initial,
        });
        io.sleep_ms(EDIT_ENTER_MS);

        let mut value = initial;
        let mut committed = false;
        let mut last_redraw = io.now_ms();

        while !stop.is_raised() && !committed {
            let delta = panel.encoder.value();
            if delta != 0 {
                value = clamp_timer(i32::from(value).saturating_add(delta));
            } else if panel.encoder.select() {
                self.commit(key, value, store, config, sink);
                committed = true;
                io.sleep_ms(COMMIT_SETTLE_MS);
            }

            if io.clock().elapsed_ms(last_redraw) > EDIT_REDRAW_MS {
                panel.display.write_line(
                    &lcd_line(format_args!("{value:<8}")),
                    row,
                    EDITOR_VALUE_COL,
                );
                last_redraw = io.now_ms();
            }
            io.sleep_ms(MENU_POLL_MS);
        }

        if committed {
            value = self.rows.selected().map_or(value, |(_, v)| *v);
        }
        panel.display.write_line(
            &lcd_line(format_args!("{MARKER}{:<8}: {:<8}", key, value)),
            row,
            1,
        );
    }

    /// Persist `value` under `key`, read the document back and rebuild the
    /// rows from it.  `config` changes only if the round trip succeeds.
    fn commit<S: ConfigStore, K: EventSink>(
        &mut self,
        key: TimerKey,
        value: u16,
        store: &S,
        config: &mut GateConfig,
        sink: &mut K,
    ) {
        let mut candidate = *config;
        candidate.timers.set(key, value);

        match store.save(&candidate).and_then(|()| store.load()) {
            Ok(reloaded) => {
                *config = reloaded;
                sink.emit(&AppEvent::ConfigCommitted {
                    key,
                    value: reloaded.timers.get(key),
                });
            }
            Err(error) => {
                sink.emit(&AppEvent::ConfigCommitFailed { key, error });
            }
        }
        self.rows.update(config.timers.entries());
        debug!("editor: rows rebuilt from active config");
    }

    /// Display row of the highlight, 1-indexed.
    fn highlight_row(&self) -> u8 {
        u8::try_from(self.rows.current_line()).unwrap_or(LCD_ROWS)
    }

    fn draw<D: DisplayPort>(&self, display: &mut D) {
        display.clear();
        let current = self.rows.current_line();
        for (row, ((_, key), (_, value))) in (1u8..).zip(self.rows.show()) {
            if usize::from(row) == current {
                display.write_line(
                    &lcd_line(format_args!("{MARKER}{:<8}: {:<8}", key, value)),
                    row,
                    1,
                );
            } else {
                display.write_line(
                    &lcd_line(format_args!("{:<8}: {:<8}", key, value)),
                    row,
                    EDITOR_ROW_COL,
                );
            }
        }
    }
}
