// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the GitHub directory client using wiremock.
//!
//! Covers:
//! - Pagination until an empty page
//! - Prefix/marker filtering and the diagnostic short-circuit
//! - Retry on transient failures, immediate failure on permanent ones
//! - Detail lookups and request headers

use fleet_deploy::config::types::GitHubConfig;
use fleet_deploy::error::{FleetError, NetworkError};
use fleet_deploy::github::DirectoryClient;
use serde_json::{Value, json};
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> DirectoryClient {
    let config = GitHubConfig {
        api_url: server.uri(),
        api_attempts: 3,
        api_backoff_ms: 1,
        timeout_secs: 5,
        ..GitHubConfig::default()
    };
    DirectoryClient::new(&config, "t0k3n").unwrap()
}

fn repo(name: &str) -> Value {
    json!({
        "id": 1,
        "name": name,
        "full_name": format!("acme/{name}"),
        "clone_url": format!("https://github.com/acme/{name}.git"),
        "default_branch": "main",
        "created_at": "2025-01-10T12:00:00Z",
        "updated_at": "2025-01-11T08:30:00Z",
        "fork": true,
        "private": true
    })
}

async fn mount_page(server: &MockServer, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path("/orgs/acme/repos"))
        .and(query_param("page", page.to_string()))
        .and(query_param("per_page", "100"))
        .and(query_param("type", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn names(repos: &[fleet_deploy::github::RepositoryDescriptor]) -> Vec<&str> {
    repos.iter().map(|r| r.name.as_str()).collect()
}

fn http_status(err: &FleetError) -> Option<u16> {
    match err {
        FleetError::Network(inner) => match inner.as_ref() {
            NetworkError::HttpError { status, .. } => Some(*status),
            _ => None,
        },
        _ => None,
    }
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn list_pages_until_empty_and_filters() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        json!([repo("tp1-alice"), repo("unrelated"), repo("TP1-Bob")]),
    )
    .await;
    mount_page(&server, 2, json!([repo("tp1-carol"), repo("tp1")])).await;
    mount_page(&server, 3, json!([])).await;

    let repos = client(&server)
        .list_repositories("acme", "tp1", "", false)
        .await
        .unwrap();

    assert_eq!(names(&repos), vec!["tp1-alice", "TP1-Bob", "tp1-carol"]);
    assert_eq!(repos[0].full_name, "acme/tp1-alice");
    assert_eq!(repos[0].created_at.as_deref(), Some("2025-01-10T12:00:00Z"));
}

#[tokio::test]
async fn list_includes_marker_matches() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        json!([repo("staff-test-tp1"), repo("other"), repo("tp1-dave")]),
    )
    .await;
    mount_page(&server, 2, json!([])).await;

    let repos = client(&server)
        .list_repositories("acme", "tp1", "STAFF-TEST", false)
        .await
        .unwrap();

    assert_eq!(names(&repos), vec!["staff-test-tp1", "tp1-dave"]);
}

#[tokio::test]
async fn diagnostic_mode_stops_at_first_marker() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        json!([repo("tp1-alice"), repo("staff-test"), repo("staff-test-2")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/repos"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let repos = client(&server)
        .list_repositories("acme", "tp1", "staff-test", true)
        .await
        .unwrap();

    assert_eq!(names(&repos), vec!["staff-test"]);
}

#[tokio::test]
async fn list_retries_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/repos"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_page(&server, 1, json!([repo("tp1-alice")])).await;
    mount_page(&server, 2, json!([])).await;

    let repos = client(&server)
        .list_repositories("acme", "tp1", "", false)
        .await
        .unwrap();

    assert_eq!(names(&repos), vec!["tp1-alice"]);
}

#[tokio::test]
async fn list_gives_up_after_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/repos"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server)
        .list_repositories("acme", "tp1", "", false)
        .await
        .unwrap_err();

    assert_eq!(http_status(&err), Some(500));
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/ghost/repos"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .list_repositories("ghost", "tp1", "", false)
        .await
        .unwrap_err();

    assert_eq!(http_status(&err), Some(404));
}

#[tokio::test]
async fn malformed_body_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .list_repositories("acme", "tp1", "", false)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("failed to decode"), "{err}");
}

// =============================================================================
// Detail
// =============================================================================

#[tokio::test]
async fn detail_reads_lineage_and_permission() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/tp1-alice"))
        .and(header("authorization", "Bearer t0k3n"))
        .and(header("accept", "application/vnd.github.v3+json"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "tp1-alice",
            "fork": true,
            "parent": { "full_name": "acme/tp1-template", "id": 7 },
            "permissions": { "admin": false, "push": true, "pull": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let detail = client(&server)
        .repository_detail("acme/tp1-alice")
        .await
        .unwrap();

    assert!(detail.fork);
    assert_eq!(detail.parent.as_deref(), Some("acme/tp1-template"));
    assert!(detail.can_push);
}

#[tokio::test]
async fn detail_without_permissions_cannot_push() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/tp1-bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "fork": false })))
        .mount(&server)
        .await;

    let detail = client(&server)
        .repository_detail("acme/tp1-bob")
        .await
        .unwrap();

    assert!(!detail.fork);
    assert!(detail.parent.is_none());
    assert!(!detail.can_push);
}

#[tokio::test]
async fn rate_limited_forbidden_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/tp1-carol"))
        .respond_with(ResponseTemplate::new(403).insert_header("x-ratelimit-remaining", "0"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/tp1-carol"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "permissions": { "push": true } })),
        )
        .mount(&server)
        .await;

    let detail = client(&server)
        .repository_detail("acme/tp1-carol")
        .await
        .unwrap();

    assert!(detail.can_push);
}

#[tokio::test]
async fn plain_forbidden_is_permanent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/tp1-dave"))
        .respond_with(ResponseTemplate::new(403).insert_header("x-ratelimit-remaining", "42"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .repository_detail("acme/tp1-dave")
        .await
        .unwrap_err();

    assert_eq!(http_status(&err), Some(403));
}
