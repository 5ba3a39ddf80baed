//! Application core: domain logic behind port traits.
//!
//! The polling controller, the events it emits and the screen layout live
//! here.  All interaction with hardware happens through the **port
//! traits** defined in [`ports`], keeping this layer testable on the host
//! with a virtual clock.

pub mod events;
pub mod ports;
pub mod screen;
pub mod service;
