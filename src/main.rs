//! GateDrive Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  EspGpio      SystemClock   JsonFileStore   LogEventSink       │
//! │  (GpioPort)   (Clock)       (ConfigStore)   (EventSink)        │
//! │  Lcd2004      RotaryHandle                                     │
//! │  (Display)    (EncoderPort)                                    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌──────────────────────────────┐   ┌──────────────────────┐   │
//! │  │ Controller (main task)       │   │ StopCoordinator      │   │
//! │  │ Sequencer · Menus            │◀──│ (stop task, pri 10)  │   │
//! │  └──────────────────────────────┘   └──────────────────────┘   │
//! │                  ▲   STOP_SIGNAL (atomic)                      │
//! │                  └── RotaryEncoder sampler (encoder task)      │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use esp_idf_hal::delay::{Delay, FreeRtos};
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::prelude::*;

use gatedrive::adapters::config_file::JsonFileStore;
use gatedrive::adapters::gpio::EspGpio;
use gatedrive::adapters::log_sink::LogEventSink;
use gatedrive::adapters::time::SystemClock;
use gatedrive::app::service::Controller;
use gatedrive::config::CONFIG_PATH;
use gatedrive::drivers::hw_init;
use gatedrive::drivers::lcd::Lcd2004;
use gatedrive::drivers::rotary::RotaryEncoder;
use gatedrive::drivers::task_pin::{self, ENCODER_TASK, STOP_TASK};
use gatedrive::io::DigitalIo;
use gatedrive::menu::Panel;
use gatedrive::pins;
use gatedrive::safety::StopCoordinator;
use gatedrive::stop_signal::STOP_SIGNAL;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  GateDrive v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Raw GPIO, Stop ISR, filesystem ─────────────────────
    hw_init::init_peripherals()?;
    hw_init::init_isr_service()?;
    hw_init::mount_spiffs()?;

    // ── 3. LCD on I2C0 ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio8,
        peripherals.pins.gpio9,
        &I2cConfig::new().baudrate(pins::I2C_FREQ_HZ.Hz()),
    )?;
    let mut lcd = Lcd2004::new(i2c, Delay::new_default(), pins::LCD_I2C_ADDR);
    lcd.init().map_err(gatedrive::error::Error::from)?;
    info!("LCD ready at 0x{:02x}", pins::LCD_I2C_ADDR);

    // ── 4. Rotary encoder sampler ─────────────────────────────
    let mut clk = PinDriver::input(peripherals.pins.gpio16)?;
    let mut dt = PinDriver::input(peripherals.pins.gpio17)?;
    let mut button = PinDriver::input(peripherals.pins.gpio18)?;
    clk.set_pull(Pull::Up)?;
    dt.set_pull(Pull::Up)?;
    button.set_pull(Pull::Up)?;

    let encoder = RotaryEncoder::new(clk, dt, button);
    let knob = encoder.handle();
    task_pin::spawn(ENCODER_TASK, move || {
        encoder.run(FreeRtos)
    })?;

    // ── 5. Stop task ──────────────────────────────────────────
    task_pin::spawn(STOP_TASK, || {
        let io = DigitalIo::new(EspGpio::new(), SystemClock::new(), &STOP_SIGNAL);
        StopCoordinator::new(io).run(hw_init::take_stop_edge)
    })?;

    // ── 6. Control loop (never returns) ───────────────────────
    let io = DigitalIo::new(EspGpio::new(), SystemClock::new(), &STOP_SIGNAL);
    let store = JsonFileStore::new(CONFIG_PATH);
    let mut controller = Controller::new(io, Panel::new(lcd, knob), store);
    let mut sink = LogEventSink::new();

    controller.run(&mut sink)
}
