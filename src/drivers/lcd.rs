//! HD44780 20x4 character LCD behind a PCF8574 I²C backpack.
//!
//! ## Backpack wiring
//!
//! | PCF8574 bit | HD44780 |
//! |-------------|---------|
//! | P0          | RS      |
//! | P1          | RW (always 0) |
//! | P2          | E       |
//! | P3          | backlight |
//! | P4..P7      | D4..D7  |
//!
//! The controller runs in 4-bit mode: every byte goes out as two nibbles,
//! each latched by pulsing E.  Rows of a 20x4 panel start at DDRAM
//! addresses 0x00, 0x40, 0x14 and 0x54.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::warn;

use crate::app::ports::DisplayPort;
use crate::app::screen::{LCD_COLS, LCD_ROWS};

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Error from the I²C bus underneath the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcdError<E> {
    Bus(E),
}

impl<E: core::fmt::Debug> core::fmt::Display for LcdError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "LCD I2C bus error: {:?}", e),
        }
    }
}

pub struct Lcd2004<I, D> {
    i2c: I,
    delay: D,
    addr: u8,
}

impl<I: I2c, D: DelayNs> Lcd2004<I, D> {
    pub fn new(i2c: I, delay: D, addr: u8) -> Self {
        Self { i2c, delay, addr }
    }

    /// Power-on sequence: force 8-bit mode three times, switch to 4-bit,
    /// then configure two-line mode, display on, cursor off.
    pub fn init(&mut self) -> Result<(), LcdError<I::Error>> {
        self.delay.delay_ms(50);
        for _ in 0..3 {
            self.write_nibble(0x30)?;
            self.delay.delay_us(4500);
        }
        self.write_nibble(0x20)?;

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_ENTRY_MODE_INC)?;
        self.clear_screen()
    }

    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    fn clear_screen(&mut self) -> Result<(), LcdError<I::Error>> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    /// Move the cursor to 0-based (`row`, `col`).
    pub fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), LcdError<I::Error>> {
        let base = ROW_OFFSETS[usize::from(row.min(LCD_ROWS - 1))];
        let col = col.min(LCD_COLS as u8 - 1);
        self.command(CMD_SET_DDRAM | (base + col))
    }

    /// Write ASCII text at the cursor.  Non-ASCII characters print as `?`.
    pub fn write_str(&mut self, s: &str) -> Result<(), LcdError<I::Error>> {
        for ch in s.chars() {
            let byte = if ch.is_ascii() { ch as u8 } else { b'?' };
            self.send(byte, RS)?;
        }
        Ok(())
    }

    fn command(&mut self, cmd: u8) -> Result<(), LcdError<I::Error>> {
        self.send(cmd, 0)
    }

    fn send(&mut self, byte: u8, mode: u8) -> Result<(), LcdError<I::Error>> {
        self.write_nibble((byte & 0xF0) | mode)?;
        self.write_nibble(((byte << 4) & 0xF0) | mode)
    }

    fn write_nibble(&mut self, bits: u8) -> Result<(), LcdError<I::Error>> {
        let bits = bits | BACKLIGHT;
        self.i2c
            .write(self.addr, &[bits | EN])
            .map_err(LcdError::Bus)?;
        self.delay.delay_us(1);
        self.i2c.write(self.addr, &[bits]).map_err(LcdError::Bus)?;
        self.delay.delay_us(50);
        Ok(())
    }

    /// Text clipped to what fits between `col` (0-based) and the right edge.
    fn clip(text: &str, col: u8) -> &str {
        let room = LCD_COLS.saturating_sub(usize::from(col));
        match text.char_indices().nth(room) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }
}

impl<I: I2c, D: DelayNs> DisplayPort for Lcd2004<I, D> {
    fn clear(&mut self) {
        if let Err(e) = self.clear_screen() {
            warn!("lcd: clear failed: {}", e);
        }
    }

    fn write_line(&mut self, text: &str, row: u8, col: u8) {
        let (row, col) = (row.saturating_sub(1), col.saturating_sub(1));
        let text = Self::clip(text, col);
        if let Err(e) = self
            .set_cursor(row, col)
            .and_then(|()| self.write_str(text))
        {
            warn!("lcd: write at row {} failed: {}", row + 1, e);
        }
    }

    fn write_line_center(&mut self, text: &str, row: u8) {
        let len = text.chars().count().min(LCD_COLS);
        let col = (LCD_COLS - len) / 2 + 1;
        self.write_line(text, row, col as u8);
    }
}
