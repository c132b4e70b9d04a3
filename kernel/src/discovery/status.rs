//! Status-field selection.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::board::{Field, ProjectItem};
use crate::discovery::DiscoveryKeywords;

/// Errors from schema discovery.
///
/// Discovery failing is not fatal: callers render a board with zero columns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// No item carries a value for any field.
    #[error("No field has any observed values")]
    NoObservedValues,
}

/// Which rule selected the status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// The field name contains a field keyword.
    FieldName,
    /// One of the field's observed values contains a value keyword.
    ObservedValue,
    /// First field with any observed values.
    FirstObserved,
}

/// One distinct value of the chosen field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusValue {
    /// Value name, which becomes the column name and id.
    pub name: String,
    /// Single-select option id, when known.
    pub option_id: Option<String>,
}

/// The field chosen to represent workflow stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusField {
    /// Field id.
    pub field_id: String,
    /// Field name.
    pub field_name: String,
    /// Distinct values in first-seen order.
    pub values: Vec<StatusValue>,
    /// Rule that selected this field.
    pub rule: MatchRule,
}

struct Observed {
    field_id: String,
    field_name: String,
    values: Vec<StatusValue>,
}

impl Observed {
    fn into_status(self, rule: MatchRule) -> StatusField {
        StatusField {
            field_id: self.field_id,
            field_name: self.field_name,
            values: self.values,
            rule,
        }
    }
}

/// Picks the status-like field of a V2 project.
///
/// Candidate priority: a field whose name matches a field keyword; else a
/// field with an observed value matching a value keyword; else the first
/// field, in encounter order, with any observed value. Fields are keyed by
/// name and visited in the order their first value appears while walking
/// `items`, so identical input always yields an identical choice.
///
/// Empty and whitespace-only values are not observations: they never become
/// columns, and a field carrying only such values does not count as having
/// any observed value for the first-observed fallback.
///
/// # Errors
///
/// Returns [`DiscoveryError::NoObservedValues`] when no item carries any value.
pub fn discover_status_field(
    fields: &[Field],
    items: &[ProjectItem],
    keywords: &DiscoveryKeywords,
) -> Result<StatusField, DiscoveryError> {
    let mut observed = observe(fields, items);

    let chosen = observed
        .iter()
        .position(|o| keywords.matches_field_name(&o.field_name))
        .map(|i| (i, MatchRule::FieldName))
        .or_else(|| {
            observed
                .iter()
                .position(|o| o.values.iter().any(|v| keywords.matches_value(&v.name)))
                .map(|i| (i, MatchRule::ObservedValue))
        })
        .or_else(|| {
            observed
                .iter()
                .position(|o| !o.values.is_empty())
                .map(|i| (i, MatchRule::FirstObserved))
        });

    let Some((index, rule)) = chosen else {
        debug!(items = items.len(), "No status-like field discovered");
        return Err(DiscoveryError::NoObservedValues);
    };

    let status = observed.swap_remove(index).into_status(rule);
    debug!(
        field = %status.field_name,
        values = status.values.len(),
        rule = ?status.rule,
        "Discovered status field"
    );
    Ok(status)
}

/// Builds, per field name, the set of distinct values in first-seen order.
fn observe(fields: &[Field], items: &[ProjectItem]) -> Vec<Observed> {
    let mut observed: Vec<Observed> = Vec::new();
    let mut by_name: HashMap<&str, usize> = HashMap::new();

    for value in items.iter().flat_map(|i| i.field_values.iter()) {
        if value.value.trim().is_empty() {
            continue;
        }

        let slot = *by_name.entry(value.field_name.as_str()).or_insert_with(|| {
            observed.push(Observed {
                field_id: value.field_id.clone(),
                field_name: value.field_name.clone(),
                values: Vec::new(),
            });
            observed.len() - 1
        });

        let entry = &mut observed[slot];
        if entry.values.iter().any(|v| v.name == value.value) {
            continue;
        }

        let option_id = value.option_id.clone().or_else(|| {
            fields
                .iter()
                .find(|f| f.id == entry.field_id)
                .and_then(|f| f.option_id(&value.value))
                .map(str::to_string)
        });
        entry.values.push(StatusValue {
            name: value.value.clone(),
            option_id,
        });
    }

    observed
}
