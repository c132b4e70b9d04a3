//! Optimistic Mutation Engine.
//!
//! Drag-and-drop moves are applied to the in-memory board at once and made
//! durable afterwards; a rejected move restores the whole pre-move board.

pub mod drag;
pub mod notice;
pub mod transaction;
pub mod view_model;

pub use drag::{apply_move, DragEnd, DragError, Slot};
pub use notice::{Notice, NoticeSlot, DEFAULT_NOTICE_TTL};
pub use transaction::{DragPhase, MoveTransaction};
pub use view_model::{BoardViewModel, MoveOutcome};
