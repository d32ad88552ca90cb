//! Integration tests for the request history cache and its display helpers.

use rappit::history::{
    format_history_list, format_history_stats, search_history, HistoryCache, HistoryChange,
    RequestFingerprint, StatusBucket, MAX_HISTORY_ITEMS,
};
use rappit::models::{HttpResponse, RequestDraft, ResponseRecord};
use serde_json::json;
use std::collections::HashMap;

fn ok(body: &str) -> ResponseRecord {
    let mut response = HttpResponse::new(200, "OK");
    response.set_body(body);
    response.response_time_ms = 12.5;
    response.into()
}

fn urls(cache: &HistoryCache) -> Vec<String> {
    cache.ordered_view().map(|entry| entry.url().to_string()).collect()
}

#[test]
fn test_never_exceeds_twenty_entries() {
    let mut cache = HistoryCache::new();
    let headers = HashMap::new();

    for i in 0..50 {
        cache.record("GET", &format!("https://api.example.com/{}", i), ok(""), "", &headers);
        assert!(cache.len() <= MAX_HISTORY_ITEMS);
    }

    assert_eq!(cache.len(), 20);
    let kept = urls(&cache);
    assert_eq!(kept.first().map(String::as_str), Some("https://api.example.com/49"));
    assert_eq!(kept.last().map(String::as_str), Some("https://api.example.com/30"));
}

#[test]
fn test_same_method_and_url_is_one_entry() {
    let mut cache = HistoryCache::new();
    let headers = HashMap::new();

    cache.record("POST", "https://api.example.com/users", ok("first"), "{\"n\":1}", &headers);
    cache.record("POST", "https://api.example.com/users", ok("second"), "{\"n\":2}", &headers);

    assert_eq!(cache.len(), 1);
    let entry = cache
        .lookup(&RequestFingerprint::new("POST", "https://api.example.com/users"))
        .unwrap();
    assert_eq!(entry.response.body(), "second");
    // The stored request is the one from the first send.
    assert_eq!(entry.request_body, "{\"n\":1}");
}

#[test]
fn test_method_and_url_are_compared_exactly() {
    let mut cache = HistoryCache::new();
    let headers = HashMap::new();

    cache.record("GET", "https://x.io/a", ok(""), "", &headers);
    cache.record("get", "https://x.io/a", ok(""), "", &headers);
    cache.record("GET", "https://x.io/a/", ok(""), "", &headers);

    assert_eq!(cache.len(), 3);
}

#[test]
fn test_update_moves_entry_to_front() {
    let mut cache = HistoryCache::new();
    let headers = HashMap::new();

    for url in ["http://x/a", "http://x/b", "http://x/c"] {
        cache.record("GET", url, ok(""), "", &headers);
    }
    assert_eq!(cache.record("GET", "http://x/a", ok(""), "", &headers), HistoryChange::Updated);

    assert_eq!(urls(&cache), ["http://x/a", "http://x/c", "http://x/b"]);
}

#[test]
fn test_touched_entry_survives_eviction() {
    let mut cache = HistoryCache::with_capacity(3);
    let headers = HashMap::new();

    for url in ["http://x/a", "http://x/b", "http://x/c"] {
        cache.record("GET", url, ok(""), "", &headers);
    }
    cache.record("GET", "http://x/a", ok(""), "", &headers);

    let change = cache.record("GET", "http://x/d", ok(""), "", &headers);
    assert_eq!(
        change,
        HistoryChange::Inserted {
            evicted: Some(RequestFingerprint::new("GET", "http://x/b"))
        }
    );
    assert_eq!(urls(&cache), ["http://x/d", "http://x/a", "http://x/c"]);
}

#[test]
fn test_empty_url_records_nothing() {
    let mut cache = HistoryCache::new();
    let before = cache.revision();

    let change = cache.record("GET", "", ok(""), "", &HashMap::new());

    assert_eq!(change, HistoryChange::Ignored);
    assert!(cache.is_empty());
    assert_eq!(cache.revision(), before);
}

#[test]
fn test_failures_are_recorded() {
    let mut cache = HistoryCache::new();
    let draft = RequestDraft::new("GET", "https://unreachable.invalid/");

    cache.record_draft(&draft, ResponseRecord::failed("connection refused"));

    let entry = cache.ordered_view().next().unwrap();
    assert_eq!(entry.status_bucket(), StatusBucket::Failure);
    assert_eq!(entry.response.status_code(), 0);
    assert_eq!(entry.response.body(), "Request Error: connection refused");
}

#[test]
fn test_history_list_and_stats() {
    let mut cache = HistoryCache::new();
    let headers = HashMap::new();

    let mut moved = HttpResponse::new(301, "Moved Permanently");
    moved.response_time_ms = 3.0;
    cache.record("GET", "http://x/old", moved.into(), "", &headers);
    cache.record("GET", "http://x/down", ResponseRecord::failed("timed out"), "", &headers);
    cache.record("DELETE", "http://x/users/1", ok(""), "", &headers);

    let rows = format_history_list(cache.ordered_view());
    assert_eq!(
        rows,
        vec![
            ("DELETE http://x/users/1".to_string(), "✅ Status: 200 | Time: 12.5ms".to_string()),
            ("GET http://x/down".to_string(), "❌ Status: 0 | Time: 0ms".to_string()),
            ("GET http://x/old".to_string(), "⚠️ Status: 301 | Time: 3.0ms".to_string()),
        ]
    );
    assert_eq!(format_history_stats(cache.ordered_view()), "Total: 3 | ✅ 1 | ⚠️ 1 | ❌ 1");
}

#[test]
fn test_search_keeps_recency_order() {
    let mut cache = HistoryCache::new();
    let headers = HashMap::new();

    cache.record("GET", "https://api.example.com/users", ok("[]"), "", &headers);
    cache.record("POST", "https://api.example.com/orders", ok("{}"), "{\"user\":7}", &headers);
    cache.record("GET", "https://other.example.com/health", ok("up"), "", &headers);

    let hits = search_history("USER", cache.ordered_view());
    let hit_urls: Vec<_> = hits.iter().map(|entry| entry.url()).collect();
    assert_eq!(
        hit_urls,
        ["https://api.example.com/orders", "https://api.example.com/users"]
    );

    assert_eq!(search_history("  ", cache.ordered_view()).len(), 3);
}

#[test]
fn test_clear_then_record() {
    let mut cache = HistoryCache::new();
    let headers = HashMap::new();

    cache.record("GET", "http://x/a", ok(""), "", &headers);
    cache.clear();
    assert!(cache.is_empty());

    cache.record("GET", "http://x/a", ok(""), "", &headers);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_records_from_transport_json() {
    // Shape produced by a transport that reports short key names.
    let completed: ResponseRecord = serde_json::from_value(json!({
        "status_code": 404,
        "reason": "Not Found",
        "headers": {"content-type": "application/json"},
        "body": "{\"error\":\"missing\"}",
        "response_time": 87.25,
        "size": 19,
        "url": "https://api.example.com/missing"
    }))
    .unwrap();
    let failed: ResponseRecord = serde_json::from_value(json!({
        "error": "Connection timed out",
        "status_code": 0,
        "response_time": 0
    }))
    .unwrap();

    let mut cache = HistoryCache::new();
    let headers = HashMap::new();
    cache.record("GET", "https://api.example.com/missing", completed, "", &headers);
    cache.record("GET", "https://api.example.com/slow", failed, "", &headers);

    let rows = format_history_list(cache.ordered_view());
    assert_eq!(rows[0].1, "❌ Status: 0 | Time: 0ms");
    assert_eq!(rows[1].1, "❌ Status: 404 | Time: 87.25ms");

    let entry = cache
        .lookup(&RequestFingerprint::new("GET", "https://api.example.com/missing"))
        .unwrap();
    assert_eq!(entry.response.content_type(), Some("application/json"));
}
