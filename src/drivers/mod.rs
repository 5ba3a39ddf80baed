//! Hardware initialisation, peripheral drivers and task helpers.

pub mod hw_init;
pub mod lcd;
pub mod rotary;
pub mod task_pin;
