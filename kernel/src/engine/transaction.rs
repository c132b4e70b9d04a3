//! The per-drag optimistic transaction.

use std::fmt;
use std::sync::Arc;

use crate::board::Board;
use crate::engine::drag::{apply_move, DragEnd, DragError};
use crate::remote::{CardPosition, MoveCardRequest};

/// Lifecycle of one drag: `Idle → OptimisticApplied → Confirmed | RolledBack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    /// No drag in flight.
    #[default]
    Idle,
    /// The move is on screen and the remote call is pending.
    OptimisticApplied,
    /// The remote accepted the move.
    Confirmed,
    /// The remote rejected the move and the pre-move board was restored.
    RolledBack,
}

impl fmt::Display for DragPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::OptimisticApplied => "optimistic_applied",
            Self::Confirmed => "confirmed",
            Self::RolledBack => "rolled_back",
        };
        f.write_str(s)
    }
}

/// An applied optimistic move awaiting remote confirmation.
///
/// Holds both whole snapshots so a failure restores the exact pre-move
/// board rather than patching the optimistic one.
#[derive(Debug, Clone)]
pub struct MoveTransaction {
    phase: DragPhase,
    before: Arc<Board>,
    after: Arc<Board>,
    request: MoveCardRequest,
}

impl MoveTransaction {
    /// Applies `drag` to `before` and prepares the matching remote request.
    ///
    /// # Errors
    ///
    /// Returns a [`DragError`] when the drag does not resolve on `before`,
    /// or when the destination column has no remote target.
    pub fn begin(before: Arc<Board>, drag: &DragEnd) -> Result<Self, DragError> {
        let after = apply_move(&before, drag)?;
        let destination = drag.destination.as_ref().ok_or(DragError::NoDestination)?;
        let column = after
            .column(&destination.column_id)
            .ok_or_else(|| DragError::UnknownColumn(destination.column_id.clone()))?;
        let target = column
            .remote_target()
            .ok_or_else(|| DragError::NoRemoteTarget(column.id.clone()))?;

        let is_v2 = after.project.is_v2;
        let request = MoveCardRequest {
            card_id: drag.card_id.clone(),
            column_id: target.to_string(),
            position: CardPosition::for_index(destination.index),
            is_v2,
            field_id: if is_v2 { column.field_id.clone() } else { None },
            project_id: is_v2.then(|| after.project.id.clone()),
        };

        Ok(Self {
            phase: DragPhase::OptimisticApplied,
            before,
            after: Arc::new(after),
            request,
        })
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// The board with the move applied.
    #[must_use]
    pub fn optimistic(&self) -> &Arc<Board> {
        &self.after
    }

    /// The board as it was before the move.
    #[must_use]
    pub fn snapshot(&self) -> &Arc<Board> {
        &self.before
    }

    /// The remote request that makes the move durable.
    #[must_use]
    pub fn request(&self) -> &MoveCardRequest {
        &self.request
    }

    /// Marks the move as accepted. The optimistic board stays as is.
    pub fn confirm(&mut self) {
        if self.phase == DragPhase::OptimisticApplied {
            self.phase = DragPhase::Confirmed;
        }
    }

    /// Marks the move as rejected and hands back the pre-move board.
    pub fn roll_back(&mut self) -> Arc<Board> {
        if self.phase == DragPhase::OptimisticApplied {
            self.phase = DragPhase::RolledBack;
        }
        Arc::clone(&self.before)
    }
}
