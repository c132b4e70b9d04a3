//! API Handler implementations for the board dispatcher.
//!
//! Every failure is converted into a structured body here; nothing raised by
//! the remote client escapes as an unhandled fault.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::auth::{AuthFailure, TokenAuthenticator};
use crate::api::types::{
    ActionResponse, BoardAction, BoardQuery, ColumnsResponse, EmptyListing, ErrorResponse,
    ProjectsResponse,
};
use crate::infrastructure::audit::{log_audit, AuditEvent};
use crate::remote::{BoardService, CardPosition, CreateIssueRequest, MoveCardRequest, RemoteError};

/// Path the dispatcher is mounted at.
pub const BOARD_ROUTE: &str = "/api/v1/board";

/// Shared state of the dispatcher.
pub struct DispatcherState {
    /// Backend the actions are routed into.
    pub service: Arc<dyn BoardService>,
    /// Request authentication.
    pub auth: TokenAuthenticator,
}

impl DispatcherState {
    /// Creates dispatcher state.
    pub fn new(service: Arc<dyn BoardService>, auth: TokenAuthenticator) -> Self {
        Self { service, auth }
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        self.auth.authenticate(headers).map_err(|reason| {
            log_audit(&AuditEvent::AccessDenied {
                route: BOARD_ROUTE.to_string(),
                reason: reason.as_str().to_string(),
            });
            ApiError::Unauthorized(reason)
        })
    }
}

/// API errors for dispatcher operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request carried no valid bearer token.
    #[error("{0}")]
    Unauthorized(AuthFailure),
    /// The `action` field names no known action.
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    /// The body is not a valid action payload.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    /// The remote client failed.
    #[error("{0}")]
    Remote(#[from] RemoteError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::UnknownAction(_) | ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::Remote(RemoteError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            ApiError::Remote(RemoteError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Remote(RemoteError::RateLimit) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Remote(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// An [`ApiError`] on the listing route, rendered with empty arrays.
#[derive(Debug)]
pub struct ListingError(pub ApiError);

impl From<ApiError> for ListingError {
    fn from(error: ApiError) -> Self {
        Self(error)
    }
}

impl From<RemoteError> for ListingError {
    fn from(error: RemoteError) -> Self {
        Self(ApiError::Remote(error))
    }
}

impl IntoResponse for ListingError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        (status, Json(EmptyListing::new(self.0.to_string()))).into_response()
    }
}

fn record(action: &'static str, status: StatusCode) {
    metrics::counter!(
        "trellis_dispatch_requests_total",
        "action" => action,
        "status" => status.as_u16().to_string()
    )
    .increment(1);
}

/// GET /api/v1/board
///
/// Lists projects, or the columns of `projectId` when given.
pub async fn get_board(
    State(state): State<Arc<DispatcherState>>,
    headers: HeaderMap,
    query: Result<Query<BoardQuery>, QueryRejection>,
) -> Response {
    let query = query.map(|Query(q)| q);
    let action = match &query {
        Ok(q) if q.project().is_some() => "listColumns",
        _ => "listProjects",
    };

    let response = match list(&state, &headers, query).await {
        Ok(response) => response,
        Err(e) => {
            warn!(action, error = %e.0, "Board listing failed");
            e.into_response()
        }
    };
    record(action, response.status());
    response
}

async fn list(
    state: &DispatcherState,
    headers: &HeaderMap,
    query: Result<BoardQuery, QueryRejection>,
) -> Result<Response, ListingError> {
    state.authenticate(headers)?;
    let query = query.map_err(|e| ApiError::InvalidPayload(e.body_text()))?;

    match query.project() {
        None => {
            let projects = state.service.list_projects().await;
            Ok(Json(ProjectsResponse { projects }).into_response())
        }
        Some(project) => {
            let board = state.service.get_board(&project).await?;
            Ok(Json(ColumnsResponse {
                project: Some(board.project),
                columns: board.columns,
            })
            .into_response())
        }
    }
}

/// POST /api/v1/board
///
/// Performs a `moveCard` or `createIssue` action.
pub async fn post_board(
    State(state): State<Arc<DispatcherState>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let (action, result) = match state.authenticate(&headers) {
        Err(e) => ("unauthenticated", Err(e)),
        Ok(()) => match parse_action(payload) {
            Err(e) => ("invalid", Err(e)),
            Ok(action) => (action.name(), dispatch(&state, action).await),
        },
    };

    let response = result.unwrap_or_else(|e| {
        warn!(action, error = %e, "Board action failed");
        e.into_response()
    });
    record(action, response.status());
    response
}

fn parse_action(payload: Result<Json<Value>, JsonRejection>) -> Result<BoardAction, ApiError> {
    let Json(value) = payload.map_err(|e| ApiError::InvalidPayload(e.body_text()))?;

    let name = value
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::InvalidPayload("missing field `action`".to_string()))?;
    if !BoardAction::NAMES.contains(&name) {
        return Err(ApiError::UnknownAction(name.to_string()));
    }

    serde_json::from_value(value).map_err(|e| ApiError::InvalidPayload(e.to_string()))
}

async fn dispatch(state: &DispatcherState, action: BoardAction) -> Result<Response, ApiError> {
    match action {
        BoardAction::MoveCard {
            card_id,
            column_id,
            position,
            is_v2,
            field_id,
            project_id,
        } => {
            let request = MoveCardRequest {
                card_id,
                column_id,
                position: position.unwrap_or(CardPosition::Top),
                is_v2,
                field_id,
                project_id,
            };
            let moved = state.service.move_card(request).await?;
            log_audit(&AuditEvent::CardMoved {
                card_id: moved.card_id.clone(),
                column_id: moved.column_id.clone(),
            });
            Ok(Json(ActionResponse::ok(moved)).into_response())
        }
        BoardAction::CreateIssue {
            title,
            body,
            labels,
            repo,
        } => {
            let request = CreateIssueRequest {
                title,
                body,
                labels,
                repo,
            };
            let issue = state.service.create_issue(request).await?;
            info!(number = issue.number, "Issue created via dispatcher");
            log_audit(&AuditEvent::IssueCreated {
                number: issue.number,
                url: issue.url.clone(),
            });
            Ok(Json(ActionResponse::ok(issue)).into_response())
        }
    }
}
