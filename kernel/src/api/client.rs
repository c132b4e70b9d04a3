//! HTTP client for the dispatcher.
//!
//! Implements [`BoardService`] against a running dispatcher so a
//! presentation process can drive a
//! [`BoardViewModel`](crate::engine::BoardViewModel) remotely.

use async_trait::async_trait;
use reqwest::Url;
use secrecy::SecretString;
use tracing::warn;

use crate::api::handlers::BOARD_ROUTE;
use crate::api::types::{ActionResponse, BoardAction, ColumnsResponse, ErrorResponse, ProjectsResponse};
use crate::board::{Board, Project, ProjectRef};
use crate::remote::http::HttpTransport;
use crate::remote::{
    BoardService, CreateIssueRequest, Issue, MoveCardRequest, MovedCard, RemoteError, RetryConfig,
};

/// Client for the board dispatcher.
pub struct DispatcherClient {
    transport: HttpTransport,
    endpoint: Url,
}

impl DispatcherClient {
    /// Creates a client for the dispatcher served at `base_url`.
    ///
    /// Requests are not retried; the dispatcher retries upstream itself.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Config`] if the endpoint URL or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &Url, token: SecretString) -> Result<Self, RemoteError> {
        let endpoint = base_url
            .join(BOARD_ROUTE)
            .map_err(|e| RemoteError::Config(format!("Invalid dispatcher URL: {e}")))?;
        let transport = HttpTransport::new(token, RetryConfig::new().with_max_retries(0))?;
        Ok(Self {
            transport,
            endpoint,
        })
    }

    async fn perform<T>(&self, action: BoardAction) -> Result<T, RemoteError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response: ActionResponse<T> = self
            .transport
            .send_json("dispatcher.action", |client| {
                client.post(self.endpoint.clone()).json(&action)
            })
            .await
            .map_err(refine)?;
        Ok(response.data)
    }
}

/// Replaces raw `{"error": …}` bodies with their message.
fn refine(error: RemoteError) -> RemoteError {
    match error {
        RemoteError::Upstream { status: 400, body } => {
            RemoteError::InvalidRequest(error_message(&body))
        }
        RemoteError::Upstream { status, body } => RemoteError::Upstream {
            status,
            body: error_message(&body),
        },
        RemoteError::Unauthorized(body) => RemoteError::Unauthorized(error_message(&body)),
        other => other,
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body).map_or_else(|_| body.to_string(), |e| e.error)
}

#[async_trait]
impl BoardService for DispatcherClient {
    async fn list_projects(&self) -> Vec<Project> {
        let result: Result<ProjectsResponse, RemoteError> = self
            .transport
            .send_json("dispatcher.list_projects", |client| {
                client.get(self.endpoint.clone())
            })
            .await;

        match result {
            Ok(response) => response.projects,
            Err(e) => {
                warn!(error = %refine(e), "Dispatcher project listing failed");
                Vec::new()
            }
        }
    }

    async fn get_board(&self, project: &ProjectRef) -> Result<Board, RemoteError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("projectId", &project.id)
            .append_pair("isV2", if project.is_v2 { "true" } else { "false" });

        let response: ColumnsResponse = self
            .transport
            .send_json("dispatcher.get_board", |client| client.get(url.clone()))
            .await
            .map_err(refine)?;

        let listed = response.project.unwrap_or_else(|| Project {
            id: project.id.clone(),
            title: project.id.clone(),
            numeric_id: project.id.parse().unwrap_or_default(),
            is_v2: project.is_v2,
        });
        Ok(Board::new(listed, response.columns))
    }

    async fn move_card(&self, request: MoveCardRequest) -> Result<MovedCard, RemoteError> {
        self.perform(BoardAction::from(request)).await
    }

    async fn create_issue(&self, request: CreateIssueRequest) -> Result<Issue, RemoteError> {
        self.perform(BoardAction::from(request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::CardPosition;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> DispatcherClient {
        let base = Url::parse(&server.uri()).unwrap();
        DispatcherClient::new(&base, SecretString::new("token".into())).unwrap()
    }

    #[tokio::test]
    async fn test_list_projects_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(BOARD_ROUTE))
            .and(header("authorization", "Bearer token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "projects": [{"id": "PVT_1", "title": "Roadmap", "numericId": 1, "isV2": true}]
            })))
            .mount(&server)
            .await;

        let projects = client(&server).await.list_projects().await;

        assert_eq!(projects.len(), 1);
        assert!(projects[0].is_v2);
    }

    #[tokio::test]
    async fn test_list_projects_swallows_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(BOARD_ROUTE))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "Authentication required", "projects": [], "columns": []
            })))
            .mount(&server)
            .await;

        assert!(client(&server).await.list_projects().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_board_passes_adapter_choice() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(BOARD_ROUTE))
            .and(query_param("projectId", "42"))
            .and(query_param("isV2", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "columns": [{"id": "11", "name": "To Do", "cards": []}]
            })))
            .mount(&server)
            .await;

        let board = client(&server)
            .await
            .get_board(&ProjectRef::new("42", false))
            .await
            .unwrap();

        assert_eq!(board.project.numeric_id, 42);
        assert_eq!(board.columns[0].name, "To Do");
    }

    #[tokio::test]
    async fn test_move_card_posts_action() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BOARD_ROUTE))
            .and(body_partial_json(json!({
                "action": "moveCard", "cardId": "101", "columnId": "12", "position": "top"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true, "data": {"cardId": "101", "columnId": "12"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let moved = client(&server)
            .await
            .move_card(MoveCardRequest {
                card_id: "101".to_string(),
                column_id: "12".to_string(),
                position: CardPosition::Top,
                is_v2: false,
                field_id: None,
                project_id: None,
            })
            .await
            .unwrap();

        assert_eq!(moved.column_id, "12");
    }

    #[tokio::test]
    async fn test_failure_message_is_unwrapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BOARD_ROUTE))
            .respond_with(
                ResponseTemplate::new(502).set_body_json(json!({"error": "HTTP 500: boom"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .create_issue(CreateIssueRequest::new("T", "B"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RemoteError::Upstream {
                status: 502,
                body: "HTTP 500: boom".to_string()
            }
        );
    }
}
