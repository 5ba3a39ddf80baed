//! Fuzz target: `GateConfig::from_json`
//!
//! Feeds arbitrary bytes to the config parser and verifies:
//! - No panics on malformed documents
//! - Every accepted document has all timers inside [0, TIMER_LIMIT)
//! - An accepted document serialises and parses back to itself
//!
//! cargo fuzz run fuzz_config_parse

#![no_main]

use gatedrive::config::{GateConfig, TIMER_LIMIT};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(cfg) = GateConfig::from_json(data) else {
        return;
    };

    for (key, value) in cfg.timers.entries() {
        assert!(value < TIMER_LIMIT, "{} = {} escaped sanitising", key, value);
    }

    let bytes = cfg.to_json().expect("serialising a parsed config");
    let again = GateConfig::from_json(&bytes).expect("re-parsing own output");
    assert_eq!(cfg, again);
});
