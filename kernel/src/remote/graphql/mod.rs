//! Typed query (V2) adapter.
//!
//! Lists organization projects, fetches a project's fields and items, and
//! moves items by updating their single-select status value.

pub mod client;
pub mod mapping;
pub mod queries;

pub use client::{GraphQlClient, V2Snapshot};
