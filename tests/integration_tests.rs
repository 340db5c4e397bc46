//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config → registry → paginated requests → records

use futures::TryStreamExt;
use gitsync_source::auth::{AuthConfig, Credentials};
use gitsync_source::http::{HttpClient, HttpClientConfig};
use gitsync_source::snapshot::{fetch_snapshot, SnapshotConfig};
use gitsync_source::{Error, PagedFetcher, Record, SourceConfig, SourceRegistry};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn issues(start: usize, count: usize) -> Value {
    Value::Array(
        (start..start + count)
            .map(|i| json!({"number": i, "title": format!("issue {i}")}))
            .collect(),
    )
}

fn fetcher_for(server: &MockServer, yaml: &str) -> PagedFetcher {
    let mut config = SourceConfig::from_yaml_str(yaml).unwrap();
    config.base_url = server.uri();
    let credentials = Credentials::new(Some("ci-bot".to_string()), "ghp_test");
    PagedFetcher::new(config.fetch_config(Some(credentials))).unwrap()
}

// ============================================================================
// Registry Flow
// ============================================================================

#[tokio::test]
async fn test_registry_locator_to_records() {
    let mock_server = MockServer::start().await;

    for (page, body) in [(1, issues(0, 3)), (2, issues(3, 3)), (3, json!([]))] {
        Mock::given(method("GET"))
            .and(path("/repos/rust-lang/rust/issues"))
            .and(query_param("page", page.to_string()))
            .and(query_param("per_page", "3"))
            .and(header("Authorization", "Bearer ghp_test"))
            .and(header("User-Agent", "ci-bot"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let fetcher = fetcher_for(&mock_server, "page_size: 3\n");
    let registry = SourceRegistry::with_github(fetcher);

    let records: Vec<Record> = registry
        .stream("github", "repo=rust-lang/rust&endpoint=issues")
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(records.len(), 6);
    assert_eq!(records[0]["number"], 0);
    assert_eq!(records[5]["title"], "issue 5");
}

#[tokio::test]
async fn test_registry_is_lazy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/a/b/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issues(0, 100)))
        .mount(&mock_server)
        .await;

    let registry = SourceRegistry::with_github(fetcher_for(&mock_server, ""));
    let mut stream = registry.stream("github", "repo=a/b&endpoint=commits").unwrap();

    assert!(mock_server.received_requests().await.unwrap().is_empty());

    // Draining one page must not trigger the next request
    for _ in 0..100 {
        stream.try_next().await.unwrap().unwrap();
    }
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);

    drop(stream);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_registry_bad_locator() {
    let mock_server = MockServer::start().await;
    let registry = SourceRegistry::with_github(fetcher_for(&mock_server, ""));

    let err = registry.create("github", "repo=a/b").err().unwrap();
    assert!(matches!(err, Error::MissingConfigField { .. }));

    let err = registry
        .create("bitbucket", "repo=a/b&endpoint=commits")
        .err()
        .unwrap();
    assert!(matches!(err, Error::SourceNotFound { .. }));
}

// ============================================================================
// Config Flow
// ============================================================================

#[tokio::test]
async fn test_config_token_scheme_and_extra_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("Authorization", "token ghp_test"))
        .and(header("Accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_for(
        &mock_server,
        "auth_scheme: token\nheaders:\n  Accept: application/vnd.github+json\n",
    );

    let records: Vec<Record> = fetcher
        .fetch_all("a/b", "pulls")
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_not_found_surfaces_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = fetcher_for(&mock_server, "")
        .fetch_all("nobody/nothing", "commits")
        .unwrap()
        .try_collect::<Vec<Record>>()
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("Not Found"));
}

// ============================================================================
// Snapshot Flow
// ============================================================================

#[tokio::test]
async fn test_snapshot_flow() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/affinity"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"a": "tea", "b": "cake", "score": 0.8}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = SnapshotConfig::from_json_str(
        &json!({
            "API_URL": format!("{}/rest/v1/rpc/affinity", mock_server.uri()),
            "API_KEY": "anon-key",
            "PAYLOAD": {"min_score": 0.5}
        })
        .to_string(),
    )
    .unwrap();

    let client = config.client(HttpClientConfig::default()).unwrap();
    let records = fetch_snapshot(&client, &config).await.unwrap();

    assert_eq!(records, vec![json!({"a": "tea", "b": "cake", "score": 0.8})]);
}

#[tokio::test]
async fn test_api_key_client_without_key_fails() {
    let err = HttpClient::with_auth(HttpClientConfig::default(), AuthConfig::api_key("apikey", ""))
        .unwrap_err();
    assert!(err.is_config());
}
