//! Fuzz target: LCD line formatting
//!
//! Pushes arbitrary UTF-8 through `lcd_line` and verifies the result never
//! exceeds the panel width and is always a prefix of the input.
//!
//! cargo fuzz run fuzz_lcd_line

#![no_main]

use gatedrive::app::screen::{LCD_COLS, lcd_line};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    let line = lcd_line(format_args!("{text}"));
    assert!(line.len() <= LCD_COLS, "line of {} bytes", line.len());
    assert!(text.starts_with(line.as_str()));
});
