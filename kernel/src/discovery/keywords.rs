//! Keyword lists driving the status-field heuristic.

use serde::Deserialize;

/// Case-insensitive keywords used to recognise a status-like field.
///
/// Both lists are matched as substrings. They are a judgment call about how
/// teams name their workflow fields and should be tuned per organization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiscoveryKeywords {
    /// Matched against field names (rule i).
    #[serde(default = "default_field_keywords")]
    pub field_keywords: Vec<String>,
    /// Matched against observed values (rule ii).
    #[serde(default = "default_value_keywords")]
    pub value_keywords: Vec<String>,
}

fn default_field_keywords() -> Vec<String> {
    ["status", "state", "stage", "progress", "kanban"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_value_keywords() -> Vec<String> {
    ["todo", "to do", "in progress", "done", "complete", "ready"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for DiscoveryKeywords {
    fn default() -> Self {
        Self {
            field_keywords: default_field_keywords(),
            value_keywords: default_value_keywords(),
        }
    }
}

impl DiscoveryKeywords {
    /// Returns `true` if `name` contains any field keyword.
    #[must_use]
    pub fn matches_field_name(&self, name: &str) -> bool {
        contains_any(name, &self.field_keywords)
    }

    /// Returns `true` if `value` contains any value keyword.
    #[must_use]
    pub fn matches_value(&self, value: &str) -> bool {
        contains_any(value, &self.value_keywords)
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    needles
        .iter()
        .any(|n| !n.is_empty() && haystack.contains(&n.to_lowercase()))
}
