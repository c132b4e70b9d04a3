//! Schema discovery for V2 projects.
//!
//! V2 schemas are user-defined, so there is no fixed "status" field to read.
//! Discovery scans the values items actually carry and heuristically picks the
//! field that represents workflow stage, together with the distinct values it
//! takes in first-seen order. That order becomes the initial column order.

pub mod keywords;
pub mod status;

pub use keywords::DiscoveryKeywords;
pub use status::{discover_status_field, DiscoveryError, MatchRule, StatusField, StatusValue};
