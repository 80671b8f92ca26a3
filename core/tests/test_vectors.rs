//! Verify URL building and body parsing against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use vika_core::{HttpResponse, RequestAdapter};

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

#[test]
fn url_test_vectors() {
    let raw = include_str!("../../test-vectors/urls.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for base in vectors["base_urls"].as_array().unwrap() {
        let base = base.as_str().unwrap();
        let adapter = RequestAdapter::with_api_base("usk-token", base);

        for case in vectors["cases"].as_array().unwrap() {
            let name = case["name"].as_str().unwrap();
            let endpoint = case["endpoint"].as_str().unwrap();
            let expected = case["expected_url"].as_str().unwrap();

            let url = adapter.build_url(endpoint);
            assert_eq!(url, expected, "{name} (base {base})");
            assert_eq!(adapter.build_url(endpoint), url, "{name}: not idempotent");
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let adapter = RequestAdapter::new("usk-token");
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["body"].as_str().unwrap().to_string(),
        };

        let body = adapter.parse_body(&response);
        assert_eq!(body, case["expected_body"], "{name}: parsed body");
    }
}
