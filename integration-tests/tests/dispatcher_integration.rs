//! Integration tests for the board dispatcher over real HTTP.
//!
//! Tests authentication, the structured-empty failure bodies, project and
//! column listing, and action routing into the upstream APIs.

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;

use common::{DispatcherHarness, TOKEN, http};

#[tokio::test]
async fn test_unauthenticated_listing_returns_empty_arrays() -> Result<()> {
    let harness = DispatcherHarness::start().await?;

    let response = http().get(harness.board_url()).send().await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["projects"], json!([]));
    assert_eq!(body["columns"], json!([]));
    assert_eq!(body["error"], "Authentication required");
    Ok(())
}

#[tokio::test]
async fn test_wrong_token_is_rejected_for_actions() -> Result<()> {
    let harness = DispatcherHarness::start().await?;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&harness.upstream)
        .await;

    let response = http()
        .post(harness.board_url())
        .bearer_auth("not-the-token")
        .json(&json!({ "action": "moveCard", "cardId": "101", "columnId": "12" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Invalid credentials");
    Ok(())
}

#[tokio::test]
async fn test_project_listing_falls_back_to_legacy_tier() -> Result<()> {
    let harness = DispatcherHarness::start().await?;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&harness.upstream)
        .await;
    harness
        .mount_json(
            "GET",
            "/repos/acme/web/projects",
            json!([{ "id": 7, "name": "Sprint", "number": 1 }]),
        )
        .await;

    let response = http()
        .get(harness.board_url())
        .bearer_auth(TOKEN)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(
        body["projects"],
        json!([{ "id": "7", "title": "Sprint", "numericId": 1, "isV2": false }])
    );
    Ok(())
}

#[tokio::test]
async fn test_columns_are_listed_for_classic_project() -> Result<()> {
    let harness = DispatcherHarness::start().await?;
    harness.mount_classic_board().await;

    let response = http()
        .get(harness.columns_url("7"))
        .bearer_auth(TOKEN)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    let names: Vec<&str> = body["columns"]
        .as_array()
        .map(|cols| cols.iter().filter_map(|c| c["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["To Do", "Doing", "Done"]);
    assert_eq!(body["columns"][0]["cards"][0]["title"], "C1");
    Ok(())
}

#[tokio::test]
async fn test_upstream_failure_keeps_listing_shape() -> Result<()> {
    let harness = DispatcherHarness::start().await?;
    Mock::given(method("GET"))
        .and(path("/projects/7"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&harness.upstream)
        .await;

    let response = http()
        .get(harness.columns_url("7"))
        .bearer_auth(TOKEN)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await?;
    assert_eq!(body["projects"], json!([]));
    assert_eq!(body["columns"], json!([]));
    Ok(())
}

#[tokio::test]
async fn test_move_card_reaches_legacy_api() -> Result<()> {
    let harness = DispatcherHarness::start().await?;
    Mock::given(method("POST"))
        .and(path("/projects/columns/cards/101/moves"))
        .and(body_json(json!({ "position": "after:102", "column_id": 12 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&harness.upstream)
        .await;

    let response = http()
        .post(harness.board_url())
        .bearer_auth(TOKEN)
        .json(&json!({
            "action": "moveCard", "cardId": "101", "columnId": "12", "position": "after:102"
        }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(
        body,
        json!({ "success": true, "data": { "cardId": "101", "columnId": "12" } })
    );
    Ok(())
}

#[tokio::test]
async fn test_create_issue_delegates_empty_labels() -> Result<()> {
    let harness = DispatcherHarness::start().await?;
    Mock::given(method("POST"))
        .and(path("/repos/acme/web/issues"))
        .and(body_json(json!({ "title": "T", "body": "B", "labels": [] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 99, "number": 3, "title": "T", "body": "B",
            "html_url": "https://example.test/acme/web/issues/3", "state": "open",
            "created_at": "2024-05-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&harness.upstream)
        .await;

    let response = http()
        .post(harness.board_url())
        .bearer_auth(TOKEN)
        .json(&json!({ "action": "createIssue", "title": "T", "body": "B" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["number"], 3);
    Ok(())
}

#[tokio::test]
async fn test_unknown_action_is_client_error() -> Result<()> {
    let harness = DispatcherHarness::start().await?;

    let response = http()
        .post(harness.board_url())
        .bearer_auth(TOKEN)
        .json(&json!({ "action": "archiveBoard" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({ "error": "Unknown action: archiveBoard" }));
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_structured_error() -> Result<()> {
    let harness = DispatcherHarness::start().await?;

    let response = http()
        .post(harness.board_url())
        .bearer_auth(TOKEN)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert!(body["error"].as_str().is_some_and(|e| e.starts_with("Invalid payload")));
    Ok(())
}

#[tokio::test]
async fn test_health_probes() -> Result<()> {
    let harness = DispatcherHarness::start().await?;

    for probe in ["health/live", "health/ready"] {
        let response = http().get(harness.base_url.join(probe)?).send().await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await?, "OK");
    }
    Ok(())
}
