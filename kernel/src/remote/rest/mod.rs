//! Legacy REST adapter.
//!
//! Classic projects expose columns and cards as first-class resources under
//! per-repository and per-organization paths. Card text lives on the linked
//! issue, reached through each card's `content_url`.

pub mod client;
pub mod types;

pub use client::RestClient;
pub use types::{ClassicCard, ClassicColumn, ClassicIssue, ClassicProject};
