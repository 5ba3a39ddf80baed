//! GPIO adapter: named gate lines over the raw `hw_init` pin calls.
//!
//! Zero-sized: the pin state lives in the peripheral, so the control loop
//! and the stop task each own an instance.  Each output is only written
//! from one of them: the Stop indicator by the stop task, everything else
//! by the control loop.

use crate::app::ports::GpioPort;
use crate::drivers::hw_init;
use crate::io::{InputLine, Level, OutputLine};
use crate::pins;

#[derive(Debug, Clone, Copy, Default)]
pub struct EspGpio;

impl EspGpio {
    pub fn new() -> Self {
        Self
    }

    const fn input_pin(line: InputLine) -> i32 {
        match line {
            InputLine::Open => pins::IN_OPEN_GPIO,
            InputLine::Close => pins::IN_CLOSE_GPIO,
            InputLine::Stop => pins::IN_STOP_GPIO,
            InputLine::OpenLimit => pins::IN_OPEN_LIMIT_GPIO,
            InputLine::CloseLimit => pins::IN_CLOSE_LIMIT_GPIO,
        }
    }

    const fn output_pin(line: OutputLine) -> i32 {
        match line {
            OutputLine::Open => pins::OUT_OPEN_GPIO,
            OutputLine::Close => pins::OUT_CLOSE_GPIO,
            OutputLine::Stop => pins::OUT_STOP_GPIO,
            OutputLine::Counter => pins::OUT_COUNTER_GPIO,
            OutputLine::O4 => pins::OUT_O4_GPIO,
        }
    }
}

impl GpioPort for EspGpio {
    fn read(&mut self, line: InputLine) -> Level {
        hw_init::gpio_read(Self::input_pin(line)).into()
    }

    fn write(&mut self, line: OutputLine, level: Level) {
        hw_init::gpio_write(Self::output_pin(line), level.is_high());
    }

    fn output_level(&self, line: OutputLine) -> Level {
        hw_init::gpio_read(Self::output_pin(line)).into()
    }

    fn set_stop_interrupt(&mut self, enabled: bool) {
        hw_init::set_stop_interrupt(enabled);
    }
}
