//! Request/Response types for the board dispatcher.

use serde::{Deserialize, Serialize};

use crate::board::{Column, Project, ProjectRef};
use crate::remote::{CardPosition, CreateIssueRequest, MoveCardRequest};

/// Query string of `GET board`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardQuery {
    /// Project whose columns to return; the project list when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Overrides the adapter inferred from the project id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_v2: Option<bool>,
}

impl BoardQuery {
    /// The referenced project, if any.
    #[must_use]
    pub fn project(&self) -> Option<ProjectRef> {
        let id = self.project_id.as_deref().filter(|id| !id.is_empty())?;
        Some(match self.is_v2 {
            Some(is_v2) => ProjectRef::new(id, is_v2),
            None => ProjectRef::infer(id),
        })
    }
}

/// Actions accepted by `POST board`, discriminated by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BoardAction {
    /// Move a card into another column.
    #[serde(rename_all = "camelCase")]
    MoveCard {
        /// Card (classic) or item (V2) id.
        card_id: String,
        /// Destination column id (classic) or option id (V2).
        column_id: String,
        /// Placement; `top` when omitted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<CardPosition>,
        /// Selects the V2 field-value mutation.
        #[serde(default)]
        is_v2: bool,
        /// Status field id (V2).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_id: Option<String>,
        /// Project id (V2).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        project_id: Option<String>,
    },
    /// Open an issue.
    #[serde(rename_all = "camelCase")]
    CreateIssue {
        /// Issue title.
        title: String,
        /// Issue body.
        #[serde(default)]
        body: String,
        /// Labels; an empty array when omitted.
        #[serde(default)]
        labels: Vec<String>,
        /// Target repository; the configured default when omitted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        repo: Option<String>,
    },
}

impl BoardAction {
    /// Action names understood by the dispatcher.
    pub const NAMES: [&'static str; 2] = ["moveCard", "createIssue"];

    /// The wire name of this action.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MoveCard { .. } => "moveCard",
            Self::CreateIssue { .. } => "createIssue",
        }
    }
}

impl From<MoveCardRequest> for BoardAction {
    fn from(request: MoveCardRequest) -> Self {
        Self::MoveCard {
            card_id: request.card_id,
            column_id: request.column_id,
            position: Some(request.position),
            is_v2: request.is_v2,
            field_id: request.field_id,
            project_id: request.project_id,
        }
    }
}

impl From<CreateIssueRequest> for BoardAction {
    fn from(request: CreateIssueRequest) -> Self {
        Self::CreateIssue {
            title: request.title,
            body: request.body,
            labels: request.labels,
            repo: request.repo,
        }
    }
}

/// Body of `GET board` without a project id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsResponse {
    /// Listed projects; empty when none could be found.
    pub projects: Vec<Project>,
}

/// Body of `GET board?projectId=…`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsResponse {
    /// The project the columns belong to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
    /// Board columns in display order.
    pub columns: Vec<Column>,
}

/// Failure body of `GET board`; both arrays are always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyListing {
    /// Error message.
    pub error: String,
    /// Always empty.
    pub projects: Vec<Project>,
    /// Always empty.
    pub columns: Vec<Column>,
}

impl EmptyListing {
    /// Creates an empty listing carrying `error`.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            projects: Vec::new(),
            columns: Vec::new(),
        }
    }
}

/// Success body of `POST board`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Action result.
    pub data: T,
}

impl<T> ActionResponse<T> {
    /// Wraps a successful result.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure body of `POST board`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}
