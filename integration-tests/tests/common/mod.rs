//! Shared test utilities for integration tests.
//!
//! Starts the dispatcher on an ephemeral port in front of a wiremock
//! upstream that plays both the typed query API and the legacy REST API.

#![allow(dead_code)]

use anyhow::Result;
use reqwest::Url;
use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use trellis_kernel::api::{DispatcherClient, DispatcherState, TokenAuthenticator, BOARD_ROUTE};
use trellis_kernel::discovery::DiscoveryKeywords;
use trellis_kernel::infrastructure::server;
use trellis_kernel::remote::{RemoteBoardClient, RemoteConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Token accepted by the dispatcher under test.
pub const TOKEN: &str = "integration-token";

/// A running dispatcher with its mocked upstream.
pub struct DispatcherHarness {
    /// Upstream API mock.
    pub upstream: MockServer,
    /// Root URL of the dispatcher.
    pub base_url: Url,
    server: JoinHandle<()>,
}

impl DispatcherHarness {
    /// Starts a dispatcher backed by a fresh upstream mock.
    pub async fn start() -> Result<Self> {
        let upstream = MockServer::start().await;

        let config = RemoteConfig::new(
            SecretString::new("upstream-token".into()),
            "acme",
            "web",
            Url::parse(&format!("{}/graphql", upstream.uri()))?,
            Url::parse(&format!("{}/", upstream.uri()))?,
        )
        .with_max_retries(0);
        let client = RemoteBoardClient::new(config, DiscoveryKeywords::default())?;
        let auth = TokenAuthenticator::new(&[SecretString::new(TOKEN.into())]);
        let state = Arc::new(DispatcherState::new(Arc::new(client), auth));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = server::router(state);
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            upstream,
            base_url: Url::parse(&format!("http://{addr}/"))?,
            server,
        })
    }

    /// URL of the board route.
    pub fn board_url(&self) -> Url {
        self.base_url
            .join(BOARD_ROUTE)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    /// URL of the board route listing the columns of `project_id`.
    pub fn columns_url(&self, project_id: &str) -> Url {
        let mut url = self.board_url();
        url.query_pairs_mut().append_pair("projectId", project_id);
        url
    }

    /// A dispatcher client authenticated with [`TOKEN`].
    pub fn client(&self) -> Result<DispatcherClient> {
        Ok(DispatcherClient::new(
            &self.base_url,
            SecretString::new(TOKEN.into()),
        )?)
    }

    /// Mounts a classic project 7 with columns `To Do` (11), `Doing` (12)
    /// and `Done` (13); card 101 sits in `To Do`, card 102 in `Doing`.
    pub async fn mount_classic_board(&self) {
        self.mount_json("GET", "/projects/7", json!({ "id": 7, "name": "Sprint", "number": 1 }))
            .await;
        self.mount_json(
            "GET",
            "/projects/7/columns",
            json!([
                { "id": 11, "name": "To Do" },
                { "id": 12, "name": "Doing" },
                { "id": 13, "name": "Done" }
            ]),
        )
        .await;
        self.mount_json(
            "GET",
            "/projects/columns/11/cards",
            json!([{ "id": 101, "note": "C1", "created_at": "2024-01-01T00:00:00Z" }]),
        )
        .await;
        self.mount_json(
            "GET",
            "/projects/columns/12/cards",
            json!([{ "id": 102, "note": "C2", "created_at": "2024-01-01T00:00:00Z" }]),
        )
        .await;
        self.mount_json("GET", "/projects/columns/13/cards", json!([]))
            .await;
    }

    /// Answers `method path` with a JSON body.
    pub async fn mount_json(&self, verb: &str, route: &str, body: serde_json::Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.upstream)
            .await;
    }
}

impl Drop for DispatcherHarness {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// A plain HTTP client for raw requests.
pub fn http() -> reqwest::Client {
    reqwest::Client::new()
}
