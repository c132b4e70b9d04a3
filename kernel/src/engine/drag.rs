//! Pure drag-and-drop moves over a board snapshot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Board;

/// A card slot addressed by column id and index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Column id.
    pub column_id: String,
    /// Index within the column.
    pub index: usize,
}

impl Slot {
    /// Creates a slot.
    #[must_use]
    pub fn new(column_id: impl Into<String>, index: usize) -> Self {
        Self {
            column_id: column_id.into(),
            index,
        }
    }
}

/// A drag-end event emitted by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEnd {
    /// The dragged card.
    pub card_id: String,
    /// Where the drag started.
    pub source: Slot,
    /// Where the card was dropped; `None` when dropped outside any column.
    pub destination: Option<Slot>,
}

impl DragEnd {
    /// Creates a drag that landed on `destination`.
    #[must_use]
    pub fn new(card_id: impl Into<String>, source: Slot, destination: Slot) -> Self {
        Self {
            card_id: card_id.into(),
            source,
            destination: Some(destination),
        }
    }

    /// `true` when there is nothing to move: no destination, or the card was
    /// dropped back on its own slot.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        match &self.destination {
            Some(destination) => *destination == self.source,
            None => true,
        }
    }
}

/// Reasons a drag cannot be applied to a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragError {
    /// No board is loaded.
    #[error("no board is loaded")]
    NoBoard,

    /// The drag has no destination.
    #[error("drag has no destination")]
    NoDestination,

    /// A column id does not resolve on the current board.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// The source slot holds no card.
    #[error("no card at index {index} of column '{column_id}'")]
    EmptySlot {
        /// Source column.
        column_id: String,
        /// Reported index.
        index: usize,
    },

    /// The source slot holds a different card than the one dragged.
    #[error("expected card '{expected}' at the source slot, found '{found}'")]
    CardMismatch {
        /// The dragged card.
        expected: String,
        /// The card actually at the slot.
        found: String,
    },

    /// The destination index is past the end of the destination column.
    #[error("index {index} is past the end of column '{column_id}' ({len} cards)")]
    IndexOutOfRange {
        /// Destination column.
        column_id: String,
        /// Reported index.
        index: usize,
        /// Column length after removal of the dragged card.
        len: usize,
    },

    /// The destination column cannot be addressed on the remote, e.g. a V2
    /// column backed by a text or date field.
    #[error("column '{0}' has no remote option to move into")]
    NoRemoteTarget(String),

    /// Another move is still waiting for the remote.
    #[error("another move is still in flight")]
    MoveInFlight,
}

/// Applies a drag to `board`, returning the new snapshot.
///
/// The card is removed from the source column at the reported index and then
/// inserted into the destination column at the reported index. A reorder
/// within one column inserts into the already shortened sequence. `board` is
/// never modified.
///
/// # Errors
///
/// Returns a [`DragError`] when either column is unknown or an index does
/// not address a valid slot.
pub fn apply_move(board: &Board, drag: &DragEnd) -> Result<Board, DragError> {
    let destination = drag.destination.as_ref().ok_or(DragError::NoDestination)?;
    let from = board
        .column_index(&drag.source.column_id)
        .ok_or_else(|| DragError::UnknownColumn(drag.source.column_id.clone()))?;
    let to = board
        .column_index(&destination.column_id)
        .ok_or_else(|| DragError::UnknownColumn(destination.column_id.clone()))?;

    let found = board.columns[from]
        .cards
        .get(drag.source.index)
        .ok_or_else(|| DragError::EmptySlot {
            column_id: drag.source.column_id.clone(),
            index: drag.source.index,
        })?;
    if found.id != drag.card_id {
        return Err(DragError::CardMismatch {
            expected: drag.card_id.clone(),
            found: found.id.clone(),
        });
    }

    let mut next = board.clone();
    let card = next.columns[from].cards.remove(drag.source.index);

    let target = &mut next.columns[to].cards;
    if destination.index > target.len() {
        return Err(DragError::IndexOutOfRange {
            column_id: destination.column_id.clone(),
            index: destination.index,
            len: target.len(),
        });
    }
    target.insert(destination.index, card);

    Ok(next)
}
