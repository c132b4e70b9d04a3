//! Wire types of the legacy REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::{CardKind, Project};
use crate::remote::service::Issue;

/// A classic project.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassicProject {
    /// Numeric id.
    pub id: u64,
    /// Project name.
    pub name: String,
    /// Project number.
    #[serde(default)]
    pub number: u64,
}

impl From<ClassicProject> for Project {
    fn from(p: ClassicProject) -> Self {
        Self {
            id: p.id.to_string(),
            title: p.name,
            numeric_id: p.number,
            is_v2: false,
        }
    }
}

/// A classic column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassicColumn {
    /// Numeric id.
    pub id: u64,
    /// Column name.
    pub name: String,
}

/// A classic card: either a note or a link to an issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassicCard {
    /// Numeric id.
    pub id: u64,
    /// Free-form note text.
    pub note: Option<String>,
    /// API URL of the linked issue.
    pub content_url: Option<String>,
    /// Creation time of the card.
    pub created_at: DateTime<Utc>,
    /// Archived cards are hidden from the board.
    #[serde(default)]
    pub archived: bool,
}

/// An issue or pull request reached through a card's `content_url`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassicIssue {
    /// Numeric id.
    pub id: u64,
    /// Issue number.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Body.
    pub body: Option<String>,
    /// Web URL.
    pub html_url: String,
    /// `open` or `closed`.
    pub state: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Present when the issue is a pull request.
    pub pull_request: Option<serde_json::Value>,
}

impl ClassicIssue {
    /// Kind of card this issue renders as.
    #[must_use]
    pub fn kind(&self) -> CardKind {
        if self.pull_request.is_some() {
            CardKind::PullRequest
        } else {
            CardKind::Issue
        }
    }
}

impl From<ClassicIssue> for Issue {
    fn from(i: ClassicIssue) -> Self {
        Self {
            id: i.id,
            number: i.number,
            title: i.title,
            url: i.html_url,
            state: i.state,
        }
    }
}

/// Body of the card move call.
#[derive(Debug, Serialize)]
pub struct MoveCardBody {
    /// `top`, `bottom` or `after:<card id>`.
    pub position: String,
    /// Destination column.
    pub column_id: u64,
}

/// Body of the issue creation call.
#[derive(Debug, Serialize)]
pub struct CreateIssueBody<'a> {
    /// Title.
    pub title: &'a str,
    /// Body.
    pub body: &'a str,
    /// Labels; serialized even when empty.
    pub labels: &'a [String],
}
