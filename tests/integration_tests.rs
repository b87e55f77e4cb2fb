//! Integration tests using mock HTTP server
//!
//! Tests the full flow: HTTP listing pages → JSON mapping → cursor → loading states

use serde_json::{json, Value};
use solidafy_pager::{
    ActivityCounter, Cursor, Error, JsonPageConfiguration, ListingPaths, LoadingState,
    OverlapPolicy, PaginationDataLoadingModel, ReplayConfig, StateKind, StaticCursor,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Page configuration fetching `GET {base}/items?page=N`
fn http_pages(base: String) -> JsonPageConfiguration {
    let client = reqwest::Client::new();

    JsonPageConfiguration::new(ListingPaths::new("meta.total", "data"), move |page| {
        let client = client.clone();
        let url = format!("{base}/items");
        async move {
            let response = client
                .get(url)
                .query(&[("page", page)])
                .send()
                .await
                .map_err(|e| Error::page_fetch(page, e.to_string()))?;

            if !response.status().is_success() {
                return Err(Error::page_fetch(page, format!("HTTP {}", response.status())));
            }
            response
                .json::<Value>()
                .await
                .map_err(|e| Error::page_fetch(page, e.to_string()))
        }
    })
}

async fn mount_page(server: &MockServer, page: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// HTTP Pagination Tests
// ============================================================================

#[tokio::test]
async fn test_http_pages_until_exhausted() {
    let server = MockServer::start().await;
    mount_page(&server, "1", json!({"meta": {"total": 3}, "data": [{"id": 1}, {"id": 2}]})).await;
    mount_page(&server, "2", json!({"meta": {"total": 3}, "data": [{"id": 3}]})).await;

    let model = PaginationDataLoadingModel::new(http_pages(server.uri()).into_cursor());

    model.reload().await.unwrap();
    assert_eq!(
        model.state(),
        LoadingState::loaded(
            vec![json!({"id": 1}), json!({"id": 2})],
            vec![vec![json!({"id": 1}), json!({"id": 2})]]
        )
    );

    model.load_more().await.unwrap();
    assert_eq!(model.state(), LoadingState::Exhausted);

    let cursor = model.cursor();
    assert_eq!(cursor.count(), 3);
    assert_eq!(cursor.total_count(), 3);
    assert_eq!(cursor.element(2), Some(json!({"id": 3})));
}

#[tokio::test]
async fn test_http_server_error_then_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_page(&server, "1", json!({"meta": {"total": 5}, "data": ["a", "b"]})).await;

    let model = PaginationDataLoadingModel::new(http_pages(server.uri()).into_cursor());

    model.reload().await.unwrap();
    let state = model.state();
    assert_eq!(state.kind(), StateKind::Error);
    assert_eq!(state.after(), Some(&LoadingState::Initial));

    let error = state.error_ref().unwrap();
    assert!(error.is_retryable());
    assert!(error.to_string().contains("503"));

    model.retry().await.unwrap();
    assert_eq!(
        model.state(),
        LoadingState::loaded(vec![json!("a"), json!("b")], vec![vec![json!("a"), json!("b")]])
    );
}

#[tokio::test]
async fn test_http_empty_listing() {
    let server = MockServer::start().await;
    mount_page(&server, "1", json!({"meta": {"total": 0}, "data": []})).await;

    let model = PaginationDataLoadingModel::new(http_pages(server.uri()).into_cursor());
    model.reload().await.unwrap();

    assert_eq!(model.state(), LoadingState::Empty);
}

#[tokio::test]
async fn test_http_malformed_listing_is_an_error() {
    let server = MockServer::start().await;
    mount_page(&server, "1", json!({"meta": {"total": 2}, "items": ["a"]})).await;

    let model = PaginationDataLoadingModel::new(http_pages(server.uri()).into_cursor());
    model.reload().await.unwrap();

    let state = model.state();
    assert!(matches!(state.error_ref(), Some(Error::Listing { path, .. }) if path == "data"));
    assert!(!state.error_ref().unwrap().is_retryable());
}

// ============================================================================
// Public API Tests
// ============================================================================

#[tokio::test]
async fn test_activity_counter_across_models() {
    let activity = ActivityCounter::new();
    let mut counts = activity.subscribe();

    let first: PaginationDataLoadingModel<_> =
        PaginationDataLoadingModel::builder(StaticCursor::new(vec![1, 2]))
            .activity(activity.clone())
            .build()
            .into();
    let second: PaginationDataLoadingModel<_> =
        PaginationDataLoadingModel::builder(StaticCursor::new(vec![3]))
            .activity(activity.clone())
            .build()
            .into();

    let (a, b) = tokio::join!(first.reload(), second.reload());
    a.unwrap();
    b.unwrap();
    activity.wait_idle().await;

    assert_eq!(activity.count(), 0);
    assert!(counts.has_changed().unwrap());
    assert_eq!(*counts.borrow_and_update(), 0);
    assert_eq!(first.state(), LoadingState::Exhausted);
    assert_eq!(second.state(), LoadingState::Exhausted);
}

#[tokio::test]
async fn test_replay_fixture_from_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = dir.path().join("pages.yaml");
    std::fs::write(
        &fixture,
        r"
model:
  overlap: latest_only
listing:
  total_count: count
  results: rows
pages:
  - count: 4
    rows: [1, 2]
  - count: 4
    rows: [3, 4]
fail_pages: [2]
",
    )
    .unwrap();

    let config = ReplayConfig::from_file(&fixture).unwrap();
    assert_eq!(config.model.overlap, OverlapPolicy::LatestOnly);

    let model: PaginationDataLoadingModel<_> =
        PaginationDataLoadingModel::builder(config.page_configuration().into_cursor())
            .config(config.model.clone())
            .build()
            .into();

    model.reload().await.unwrap();
    model.load_more().await.unwrap();
    let loaded = LoadingState::loaded(vec![json!(1), json!(2)], vec![vec![json!(1), json!(2)]]);
    assert_eq!(
        model.state(),
        LoadingState::error(Error::page_fetch(2, "simulated failure"), loaded)
    );

    model.load_more().await.unwrap();
    assert_eq!(model.state(), LoadingState::Exhausted);
    assert_eq!(model.cursor().count(), 4);
}

#[test]
fn test_version_constants() {
    assert_eq!(solidafy_pager::NAME, "solidafy-pager");
    assert!(!solidafy_pager::VERSION.is_empty());
}
