//! Remote project identity.

use serde::{Deserialize, Serialize};

/// Node id prefixes the typed query API hands out for project boards.
const V2_ID_PREFIXES: [&str; 2] = ["PVT_", "PN_"];

/// A remote board as listed by the Remote Board Client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Opaque identifier understood by the adapter that produced it.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Human-facing project number.
    pub numeric_id: u64,
    /// `true` when the typed query (V2) adapter produced this project.
    pub is_v2: bool,
}

/// Reference to a project for fetching and mutating its board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    /// Project identifier.
    pub id: String,
    /// Which adapter owns the project.
    pub is_v2: bool,
}

impl ProjectRef {
    /// Builds a reference with an explicit adapter choice.
    #[must_use]
    pub fn new(id: impl Into<String>, is_v2: bool) -> Self {
        Self {
            id: id.into(),
            is_v2,
        }
    }

    /// Builds a reference, inferring the adapter from the shape of the id.
    ///
    /// Typed-query node ids (`PVT_…`, `PN_…`) select V2; anything else,
    /// notably the purely numeric legacy ids, selects the classic adapter.
    #[must_use]
    pub fn infer(id: impl Into<String>) -> Self {
        let id = id.into();
        let is_v2 = V2_ID_PREFIXES.iter().any(|p| id.starts_with(p));
        Self { id, is_v2 }
    }
}

impl From<&Project> for ProjectRef {
    fn from(project: &Project) -> Self {
        Self::new(project.id.clone(), project.is_v2)
    }
}
