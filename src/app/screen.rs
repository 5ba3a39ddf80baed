//! LCD layout: geometry, fixed texts, and fixed-width line formatting.
//!
//! Every line is formatted into a stack buffer the width of the display;
//! anything past the last column is dropped.

use core::fmt::{self, Write};

/// Character rows on the 2004 LCD.
pub const LCD_ROWS: u8 = 4;
/// Character columns on the 2004 LCD.
pub const LCD_COLS: usize = 20;

/// One display line.
pub type LcdLine = heapless::String<LCD_COLS>;

/// Format into an [`LcdLine`], truncating at the display width.
pub fn lcd_line(args: fmt::Arguments<'_>) -> LcdLine {
    let mut line = Truncating(LcdLine::new());
    // Truncating never reports an error.
    let _ = line.write_fmt(args);
    line.0
}

/// Writer that keeps as many characters as fit and silently drops the rest.
struct Truncating(LcdLine);

impl Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

// ── Idle screen ───────────────────────────────────────────────

pub const START_PROMPT: &str = "OPEN/CLOSE TO START";

// ── Run screen ────────────────────────────────────────────────

pub const OPENING: &str = "OPENING....";
pub const CLOSING: &str = "CLOSING....";
pub const WAITING: &str = "WAITING....";
pub const TURN_ON: &str = "TURN ON....";
pub const TURN_OFF: &str = "TURN OFF...";

/// Countdown field position (row, col).
pub const COUNTDOWN_ROW: u8 = 2;
pub const COUNTDOWN_COL: u8 = 17;
/// Blank written over the countdown field.
pub const COUNTDOWN_BLANK: &str = "    ";

// ── Menu screens ──────────────────────────────────────────────

/// Selection marker in front of the highlighted row.
pub const MARKER: &str = ">>";
/// Column of non-highlighted top-level menu items.
pub const MENU_ITEM_COL: u8 = 5;
/// Column of non-highlighted editor rows.
pub const EDITOR_ROW_COL: u8 = 3;
/// Column of the value field while editing.
pub const EDITOR_VALUE_COL: u8 = 13;
