//! Cards: the trackable items rendered inside a column.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a card points at on the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// A repository issue.
    Issue,
    /// A pull request.
    PullRequest,
    /// A draft issue or a free-form note.
    DraftIssue,
}

/// A card on the board, synthesized from V2 item content or classic card data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Identifier used when moving the card (V2 item id or classic card id).
    pub id: String,
    /// Kind of content behind the card.
    pub kind: CardKind,
    /// Title shown on the card face.
    pub title: String,
    /// Body or note text.
    pub body: String,
    /// Web URL of the underlying issue or pull request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Remote state, e.g. `OPEN` or `closed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Creation time of the underlying content.
    pub created_at: DateTime<Utc>,
    /// Issue or pull request number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
}

#[cfg(test)]
impl Card {
    /// Creates a draft card with only an id and title, stamped now.
    pub(crate) fn draft(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: CardKind::DraftIssue,
            title: title.into(),
            body: String::new(),
            url: None,
            state: None,
            created_at: Utc::now(),
            number: None,
        }
    }
}
