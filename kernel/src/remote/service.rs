//! The board capability set shared by every backend.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Project, ProjectRef};
use crate::remote::error::RemoteError;

/// Where a moved card lands in its destination column, as told to the remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CardPosition {
    /// First in the column.
    Top,
    /// Last in the column.
    Bottom,
    /// Directly after the given card (legacy REST only).
    After(String),
}

impl CardPosition {
    /// Coarse position for an exact destination index.
    #[must_use]
    pub fn for_index(index: usize) -> Self {
        if index == 0 {
            Self::Top
        } else {
            Self::Bottom
        }
    }
}

impl fmt::Display for CardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Bottom => f.write_str("bottom"),
            Self::After(id) => write!(f, "after:{id}"),
        }
    }
}

impl FromStr for CardPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            _ => match s.strip_prefix("after:") {
                Some(id) if !id.is_empty() => Ok(Self::After(id.to_string())),
                _ => Err(format!("invalid card position '{s}'")),
            },
        }
    }
}

impl TryFrom<String> for CardPosition {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CardPosition> for String {
    fn from(position: CardPosition) -> Self {
        position.to_string()
    }
}

/// A request to move a card into another column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCardRequest {
    /// Card (classic) or item (V2) id.
    pub card_id: String,
    /// Destination column id (classic) or option id (V2).
    pub column_id: String,
    /// Placement inside the destination column.
    pub position: CardPosition,
    /// Selects the field-value mutation instead of the classic move.
    pub is_v2: bool,
    /// Status field id, required for the V2 mutation.
    pub field_id: Option<String>,
    /// Project id, required for the V2 mutation.
    pub project_id: Option<String>,
}

/// Result of a successful move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovedCard {
    /// The card that moved.
    pub card_id: String,
    /// The column it moved into.
    pub column_id: String,
}

/// A request to open an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIssueRequest {
    /// Issue title.
    pub title: String,
    /// Issue body.
    pub body: String,
    /// Labels, always sent (possibly empty).
    pub labels: Vec<String>,
    /// Target repository; the configured default when `None`.
    pub repo: Option<String>,
}

impl CreateIssueRequest {
    /// Creates a request with no labels against the default repository.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            labels: Vec::new(),
            repo: None,
        }
    }
}

/// An issue as returned by the remote after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Numeric issue id.
    pub id: u64,
    /// Issue number within its repository.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Web URL.
    pub url: String,
    /// Remote state.
    pub state: String,
}

/// Uniform board operations over the two backend API generations.
#[async_trait]
pub trait BoardService: Send + Sync {
    /// Lists the projects visible to the configured owner.
    ///
    /// Never fails: upstream problems yield an empty list.
    async fn list_projects(&self) -> Vec<Project>;

    /// Fetches and assembles the board of one project.
    async fn get_board(&self, project: &ProjectRef) -> Result<Board, RemoteError>;

    /// Moves a card on the remote.
    async fn move_card(&self, request: MoveCardRequest) -> Result<MovedCard, RemoteError>;

    /// Opens an issue on the remote.
    async fn create_issue(&self, request: CreateIssueRequest) -> Result<Issue, RemoteError>;
}
