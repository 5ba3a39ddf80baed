//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements   | Connects to                    |
//! |---------------|--------------|--------------------------------|
//! | `gpio`        | GpioPort     | ESP32 GPIO + Stop interrupt    |
//! | `time`        | Clock        | ESP32 high-resolution timer    |
//! | `config_file` | ConfigStore  | `config.json` on SPIFFS        |
//! | `log_sink`    | EventSink    | Serial log output              |
//!
//! The display and encoder ports are implemented directly by
//! [`drivers::lcd`](crate::drivers::lcd) and
//! [`drivers::rotary`](crate::drivers::rotary).

pub mod config_file;
pub mod gpio;
pub mod log_sink;
pub mod time;
