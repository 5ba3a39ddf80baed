//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against the mock adapters in `mock_hw`.  All tests run on the host
//! against a virtual clock, with no real hardware and no real waiting.

mod controller_tests;
mod menu_tests;
mod mock_hw;
