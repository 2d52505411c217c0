#![no_main]

use libfuzzer_sys::fuzz_target;
use pluggedin_sdk::{normalize_rag_response, ApiResponse};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let payload = ApiResponse::new(200, s).json_or_text();
        let response = normalize_rag_response(&payload);
        assert_eq!(response.documents.len(), response.document_ids.len());
    }
});
