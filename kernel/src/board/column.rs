//! Columns and the board aggregate.

use serde::{Deserialize, Serialize};

use crate::board::{Card, Project};

/// A workflow column.
///
/// On V2 boards the id is the status value name, so the same column keeps its
/// identity across rebuilds even when the column order changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Stable column identity.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Status field backing this column (V2 only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
    /// Single-select option id for the column's value (V2 only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_id: Option<String>,
    /// Cards in display order.
    pub cards: Vec<Card>,
}

impl Column {
    /// Creates an empty column whose id and name coincide.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_id: None,
            option_id: None,
            cards: Vec::new(),
        }
    }

    /// Creates an empty V2 column for one value of the status field.
    #[must_use]
    pub fn for_value(field_id: &str, value: &str, option_id: Option<String>) -> Self {
        Self {
            id: value.to_string(),
            name: value.to_string(),
            field_id: Some(field_id.to_string()),
            option_id,
            cards: Vec::new(),
        }
    }

    /// Identifier the remote expects when a card is moved into this column.
    ///
    /// Classic columns are addressed by their own id. V2 columns need the
    /// single-select option id, so a column backed by a text or date field
    /// has no target.
    #[must_use]
    pub fn remote_target(&self) -> Option<&str> {
        if self.field_id.is_some() {
            self.option_id.as_deref()
        } else {
            Some(&self.id)
        }
    }
}

/// The board aggregate: a project and its ordered columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// The project this board renders.
    pub project: Project,
    /// Columns in display order.
    pub columns: Vec<Column>,
}

impl Board {
    /// Creates a board.
    #[must_use]
    pub fn new(project: Project, columns: Vec<Column>) -> Self {
        Self { project, columns }
    }

    /// Creates a board with no columns.
    #[must_use]
    pub fn empty(project: Project) -> Self {
        Self::new(project, Vec::new())
    }

    /// Returns the index of the column with the given id.
    #[must_use]
    pub fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    /// Returns the column with the given id.
    #[must_use]
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Total number of cards across all columns.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }
}
