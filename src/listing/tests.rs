//! Tests for the JSON listing adapter

use super::*;
use crate::cursor::Cursor;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

fn paged(pages: Vec<Value>) -> JsonPageConfiguration {
    let pages = Arc::new(pages);
    JsonPageConfiguration::new(ListingPaths::new("$.meta.total", "$.data"), move |page| {
        let pages = Arc::clone(&pages);
        async move {
            pages
                .get(page - 1)
                .cloned()
                .ok_or_else(|| Error::page_fetch(page, "no such page"))
        }
    })
}

// ============================================================================
// Path Extraction Tests
// ============================================================================

#[test_case("total", Some(json!(3)) ; "top level")]
#[test_case("$.meta.total", Some(json!(10)) ; "jsonpath prefix")]
#[test_case("meta.missing", None ; "missing leaf")]
#[test_case("total.nested", None ; "through a scalar")]
fn test_extract_path(path: &str, expected: Option<Value>) {
    let value = json!({"total": 3, "meta": {"total": 10}});
    assert_eq!(extract_path(&value, path).cloned(), expected);
}

#[test]
fn test_extract_root() {
    let value = json!([1, 2]);
    assert_eq!(extract_path(&value, "$"), Some(&value));
}

// ============================================================================
// Listing Mapping Tests
// ============================================================================

#[test]
fn test_map_listing_default_paths() {
    let listing = json!({"total_count": 5, "results": [{"id": 1}, {"id": 2}]});
    let result = map_listing(listing, &ListingPaths::default()).unwrap();
    assert_eq!(result.total_count, 5);
    assert_eq!(result.results, vec![json!({"id": 1}), json!({"id": 2})]);
}

#[test]
fn test_map_listing_string_total_and_null_results() {
    let paths = ListingPaths::new("meta.count", "items");
    let listing = json!({"meta": {"count": " 0 "}, "items": null});
    let result = map_listing(listing, &paths).unwrap();
    assert_eq!(result.total_count, 0);
    assert!(result.is_empty());
}

#[test_case(json!({"results": []}), "total_count" ; "missing total")]
#[test_case(json!({"total_count": -1, "results": []}), "total_count" ; "negative total")]
#[test_case(json!({"total_count": true, "results": []}), "total_count" ; "boolean total")]
#[test_case(json!({"total_count": 1}), "results" ; "missing results")]
#[test_case(json!({"total_count": 1, "results": {"a": 1}}), "results" ; "results not an array")]
fn test_map_listing_errors(listing: Value, failing_path: &str) {
    let err = map_listing(listing, &ListingPaths::default()).unwrap_err();
    match err {
        Error::Listing { path, .. } => assert_eq!(path, failing_path),
        other => panic!("Expected Listing error, got {other:?}"),
    }
}

// ============================================================================
// Cursor Integration Tests
// ============================================================================

#[tokio::test]
async fn test_json_cursor_pages() {
    let cursor = paged(vec![
        json!({"meta": {"total": 3}, "data": ["a", "b"]}),
        json!({"meta": {"total": 3}, "data": ["c"]}),
    ])
    .into_cursor();

    assert_eq!(cursor.load_next_batch().await.unwrap(), vec![json!("a"), json!("b")]);
    assert!(!cursor.exhausted());
    assert_eq!(cursor.load_next_batch().await.unwrap(), vec![json!("c")]);
    assert!(cursor.exhausted());
    assert_eq!(cursor.count(), 3);
}

#[tokio::test]
async fn test_json_cursor_mapping_error_leaves_cursor_untouched() {
    let cursor = paged(vec![json!({"meta": {}, "data": ["a"]})]).into_cursor();

    let err = cursor.load_next_batch().await.unwrap_err();
    assert!(matches!(err, Error::Listing { .. }));
    assert_eq!(cursor.current_page(), 1);
    assert_eq!(cursor.count(), 0);
}

#[test]
fn test_listing_paths_serde_defaults() {
    let paths: ListingPaths = serde_json::from_str("{}").unwrap();
    assert_eq!(paths, ListingPaths::default());

    let paths: ListingPaths = serde_yaml::from_str("results: data.items").unwrap();
    assert_eq!(paths.total_count, "total_count");
    assert_eq!(paths.results, "data.items");
}
