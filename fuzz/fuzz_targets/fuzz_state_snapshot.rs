#![no_main]

//! Arbitrary bytes through the JSON snapshot decoder.
//!
//! Decoding must never panic, and anything that decodes must re-encode to
//! a snapshot that decodes to the same state.

use formsync_core::State;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(state) = State::from_json(text) else {
        return;
    };
    let json = state.to_json().expect("encode decoded state");
    assert_eq!(State::from_json(&json).expect("decode re-encoded state"), state);
});
