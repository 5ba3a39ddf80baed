//! GateDrive firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod fsm;
pub mod io;
pub mod menu;
pub mod safety;
pub mod stop_signal;

pub mod error;
pub mod pins;

// Hardware-facing modules.  They compile on the host with simulation
// fallbacks so the firmware binary and the tests share one crate.
pub mod adapters;
pub mod drivers;
