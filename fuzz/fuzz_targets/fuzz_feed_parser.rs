#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Arbitrary CSV bodies must never panic the feed parser; header drift,
    // bad timestamps, and non-numeric cells are all typed errors.
    let _ = flowgate_core::parse_feed(data);
});
