//! GPIO / peripheral pin assignments for the gate controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.
//!
//! Numbers are ESP32-S3 GPIOs.  The map avoids the strapping pins (0, 3,
//! 45, 46), USB (19, 20), and the flash/PSRAM range (26..=37).

// ---------------------------------------------------------------------------
// Digital inputs (pull-down, HIGH = asserted)
// ---------------------------------------------------------------------------

/// Open push-button / open sensor.
pub const IN_OPEN_GPIO: i32 = 4;
/// Close push-button / close sensor.
pub const IN_CLOSE_GPIO: i32 = 5;
/// Emergency stop button.  Rising edge raises the stop interrupt.
pub const IN_STOP_GPIO: i32 = 6;
/// Open limit switch.
pub const IN_OPEN_LIMIT_GPIO: i32 = 7;
/// Close limit switch.
pub const IN_CLOSE_LIMIT_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Digital outputs (default LOW)
// ---------------------------------------------------------------------------

/// Open drive relay.
pub const OUT_OPEN_GPIO: i32 = 10;
/// Close drive relay.
pub const OUT_CLOSE_GPIO: i32 = 11;
/// Stop indicator lamp.
pub const OUT_STOP_GPIO: i32 = 12;
/// Cycle counter pulse output.
pub const OUT_COUNTER_GPIO: i32 = 13;
/// Auxiliary output switched during the dwell stages.
pub const OUT_O4_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// I²C bus (20x4 character LCD behind a PCF8574 backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
/// I²C bus clock.
pub const I2C_FREQ_HZ: u32 = 400_000;
/// 7-bit address of the PCF8574 LCD backpack.
pub const LCD_I2C_ADDR: u8 = 0x27;

// ---------------------------------------------------------------------------
// Rotary encoder (active-low, internal pull-ups)
// ---------------------------------------------------------------------------

pub const ENCODER_CLK_GPIO: i32 = 16;
pub const ENCODER_DT_GPIO: i32 = 17;
pub const ENCODER_BUTTON_GPIO: i32 = 18;
