//! Board data model.
//!
//! A [`Board`] is an ephemeral view of one remote project: an ordered list of
//! [`Column`]s, each holding an ordered list of [`Card`]s. Boards are rebuilt
//! from scratch on every fetch and replaced wholesale, never patched in place.

pub mod card;
pub mod column;
pub mod item;
pub mod project;

pub use card::{Card, CardKind};
pub use column::{Board, Column};
pub use item::{Field, FieldDataType, FieldOption, FieldValue, ItemContent, ProjectItem};
pub use project::{Project, ProjectRef};
