//! Top-level configuration menu: one row per configuration section.

use log::debug;

use super::{MENU_POLL_MS, MENU_SETTLE_MS, MenuCursor, Panel, TimerEditor};
use crate::app::ports::{Clock, ConfigStore, DisplayPort, EncoderPort, EventSink, GpioPort};
use crate::app::screen::{LCD_ROWS, MARKER, MENU_ITEM_COL, lcd_line};
use crate::config::{GateConfig, Section};
use crate::io::DigitalIo;

pub struct MainMenu {
    cursor: MenuCursor<Section>,
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl MainMenu {
    pub fn new() -> Self {
        Self {
            cursor: MenuCursor::new(Section::ALL.to_vec(), usize::from(LCD_ROWS)),
        }
    }

    pub fn cursor(&self) -> &MenuCursor<Section> {
        &self.cursor
    }

    /// Browse sections until the stop signal is raised.  Selecting a
    /// section opens its editor; `config` is updated by every commit made
    /// there.
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
                self.cursor.step_down();
                self.draw(&mut panel.display);
            } else if delta < 0 {
                self.cursor.step_up();
                self.draw(&mut panel.display);
            } else if panel.encoder.select() {
                if let Some(&section) = self.cursor.selected() {
                    debug!("menu: open {}", section.label());
                    match section {
                        Section::Timers => {
                            TimerEditor::new(&config.timers).run(io, panel, store, config, sink);
                        }
                    }
                    first_entry = true;
                }
            }
            io.sleep_ms(MENU_POLL_MS);
        }
    }

    fn draw<D: DisplayPort>(&self, display: &mut D) {
        display.clear();
        for (row, (_, section)) in (1u8..).zip(self.cursor.show()) {
            if usize::from(row) == self.cursor.current_line() {
                display.write_line(&lcd_line(format_args!("{MARKER}{}", section.label())), row, 1);
            } else {
                display.write_line(section.label(), row, MENU_ITEM_COL);
            }
        }
    }
}
