#![no_main]

use libfuzzer_sys::fuzz_target;
use pluggedin_sdk::clipboard::envelope::{parse_deleted, parse_list, parse_optional_entry};

fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = parse_list(&payload);
        let _ = parse_optional_entry(&payload);
        let _ = parse_deleted(&payload);
    }
});
