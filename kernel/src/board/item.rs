//! Raw V2 project schema: fields, items and the values items carry.
//!
//! These are the inputs of schema discovery and board assembly. They mirror
//! what the typed query API returns, already flattened out of its connection
//! and fragment structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::CardKind;

/// Data type of a V2 project field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldDataType {
    /// Single-select with a fixed option list.
    SingleSelect,
    /// Free text.
    Text,
    /// Calendar date.
    Date,
    /// Iteration (sprint).
    Iteration,
    /// Number.
    Number,
    /// Any built-in or future type this crate does not read.
    #[serde(other)]
    Other,
}

/// One option of a single-select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Option id, used by the field-value update mutation.
    pub id: String,
    /// Option name as shown to users.
    pub name: String,
}

/// A typed attribute of a V2 project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Field id.
    pub id: String,
    /// User-defined field name.
    pub name: String,
    /// Data type.
    pub data_type: FieldDataType,
    /// Options, present for single-select fields only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

impl Field {
    /// Looks up the id of the option called `name`.
    #[must_use]
    pub fn option_id(&self, name: &str) -> Option<&str> {
        self.options
            .as_deref()?
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.id.as_str())
    }
}

/// A value an item holds for one field, rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    /// Id of the field this value belongs to.
    pub field_id: String,
    /// Name of the field this value belongs to.
    pub field_name: String,
    /// Value text: option name, text content, or ISO date.
    pub value: String,
    /// Option id when the value comes from a single-select field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_id: Option<String>,
}

/// Content behind a V2 item. Every attribute may be missing on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemContent {
    /// Kind of the content.
    pub kind: CardKind,
    /// Title.
    pub title: Option<String>,
    /// Body text.
    pub body: Option<String>,
    /// Web URL.
    pub url: Option<String>,
    /// Remote state.
    pub state: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Issue or pull request number.
    pub number: Option<u64>,
}

/// One item of a V2 project with the field values it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
    /// Item id (also the card id on the assembled board).
    pub id: String,
    /// Issue, pull request or draft content.
    pub content: ItemContent,
    /// Field values in the order the remote returned them.
    pub field_values: Vec<FieldValue>,
}

impl ProjectItem {
    /// Returns this item's value for the field with the given id.
    #[must_use]
    pub fn value_for(&self, field_id: &str) -> Option<&FieldValue> {
        self.field_values.iter().find(|v| v.field_id == field_id)
    }
}
