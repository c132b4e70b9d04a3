//! Wire types of the typed query API and their mapping to board types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::{
    CardKind, Field, FieldDataType, FieldOption, FieldValue, ItemContent, Project, ProjectItem,
};

/// Request envelope.
#[derive(Serialize)]
pub struct GraphQlRequest<'a, V: Serialize> {
    /// Query document.
    pub query: &'a str,
    /// Query variables.
    pub variables: V,
}

/// One entry of a response's `errors` array.
#[derive(Debug, Deserialize)]
pub struct GraphQlErrorEntry {
    /// Human-readable message.
    pub message: String,
}

/// Response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    /// Payload, absent when the whole query failed.
    pub data: Option<T>,
    /// API-level errors, possibly alongside partial data.
    #[serde(default)]
    pub errors: Vec<GraphQlErrorEntry>,
}

/// A connection page; GraphQL allows null entries.
#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    /// Page entries.
    #[serde(default = "Vec::new")]
    pub nodes: Vec<Option<T>>,
}

impl<T> Connection<T> {
    fn into_nodes(self) -> impl Iterator<Item = T> {
        self.nodes.into_iter().flatten()
    }
}

/// `data` of the project listing query.
#[derive(Debug, Deserialize)]
pub struct ListProjectsData {
    /// Owning organization, null when the login is not an organization.
    pub organization: Option<OrganizationNode>,
}

/// Organization node.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationNode {
    /// Its V2 projects.
    pub projects_v2: Connection<ProjectSummaryNode>,
}

/// Project summary in a listing.
#[derive(Debug, Deserialize)]
pub struct ProjectSummaryNode {
    /// Node id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Project number.
    pub number: u64,
}

/// `data` of the project board query.
#[derive(Debug, Deserialize)]
pub struct ProjectBoardData {
    /// The project node, null when the id is unknown.
    pub node: Option<ProjectNode>,
}

/// A project node. Fields are absent when the id names some other type.
#[derive(Debug, Deserialize)]
pub struct ProjectNode {
    /// Node id.
    pub id: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Project number.
    pub number: Option<u64>,
    /// First page of fields.
    pub fields: Option<Connection<FieldNode>>,
    /// First page of items.
    pub items: Option<Connection<ItemNode>>,
}

/// A field definition.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    /// Field id.
    pub id: Option<String>,
    /// Field name.
    pub name: Option<String>,
    /// Data type.
    pub data_type: Option<FieldDataType>,
    /// Options of a single-select field.
    pub options: Option<Vec<FieldOption>>,
}

/// Reference from a value to its field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRef {
    /// Field id.
    pub id: Option<String>,
    /// Field name.
    pub name: Option<String>,
    /// Data type.
    pub data_type: Option<FieldDataType>,
}

/// One item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemNode {
    /// Item id.
    pub id: String,
    /// First page of field values.
    pub field_values: Option<Connection<FieldValueNode>>,
    /// Content, null for redacted items.
    pub content: Option<ContentNode>,
}

/// A field value of any type; only the attributes of its own type are set.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValueNode {
    /// Concrete value type.
    #[serde(rename = "__typename")]
    pub typename: String,
    /// Single-select option name.
    pub name: Option<String>,
    /// Single-select option id.
    pub option_id: Option<String>,
    /// Text value.
    pub text: Option<String>,
    /// Date value.
    pub date: Option<String>,
    /// The field this value belongs to.
    pub field: Option<FieldRef>,
}

/// Item content.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    /// Concrete content type.
    #[serde(rename = "__typename")]
    pub typename: String,
    /// Title.
    pub title: Option<String>,
    /// Body.
    pub body: Option<String>,
    /// Web URL.
    pub url: Option<String>,
    /// State.
    pub state: Option<String>,
    /// Number.
    pub number: Option<u64>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
}

/// `data` of the single-select mutation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSingleSelectData {
    /// Mutation payload.
    pub update_project_v2_item_field_value: Option<SetSingleSelectPayload>,
}

/// Mutation payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSingleSelectPayload {
    /// The updated item.
    pub project_v2_item: Option<ItemRef>,
}

/// Bare item reference.
#[derive(Debug, Deserialize)]
pub struct ItemRef {
    /// Item id.
    pub id: String,
}

/// Maps a listed project.
#[must_use]
pub fn map_project_summary(node: ProjectSummaryNode) -> Project {
    Project {
        id: node.id,
        title: node.title,
        numeric_id: node.number,
        is_v2: true,
    }
}

/// Maps the organization listing, dropping null entries.
#[must_use]
pub fn map_project_list(data: ListProjectsData) -> Vec<Project> {
    data.organization
        .map(|org| org.projects_v2.into_nodes().map(map_project_summary).collect())
        .unwrap_or_default()
}

/// Splits a project node into project, fields and items.
///
/// Returns `None` when the node is not a project.
#[must_use]
pub fn map_project_node(node: ProjectNode) -> Option<(Project, Vec<Field>, Vec<ProjectItem>)> {
    let project = Project {
        id: node.id?,
        title: node.title.unwrap_or_default(),
        numeric_id: node.number.unwrap_or_default(),
        is_v2: true,
    };

    let fields = node
        .fields
        .map(|c| c.into_nodes().filter_map(map_field).collect())
        .unwrap_or_default();
    let items = node
        .items
        .map(|c| c.into_nodes().map(map_item).collect())
        .unwrap_or_default();

    Some((project, fields, items))
}

fn map_field(node: FieldNode) -> Option<Field> {
    Some(Field {
        id: node.id?,
        name: node.name?,
        data_type: node.data_type.unwrap_or(FieldDataType::Other),
        options: node.options,
    })
}

fn map_item(node: ItemNode) -> ProjectItem {
    let field_values = node
        .field_values
        .map(|c| c.into_nodes().filter_map(map_field_value).collect())
        .unwrap_or_default();

    ProjectItem {
        id: node.id,
        content: map_content(node.content),
        field_values,
    }
}

/// Keeps single-select, text and date values; everything else is ignored.
fn map_field_value(node: FieldValueNode) -> Option<FieldValue> {
    let field = node.field?;
    let readable = matches!(
        field.data_type,
        Some(FieldDataType::SingleSelect | FieldDataType::Text | FieldDataType::Date)
    );
    if !readable {
        return None;
    }

    let (value, option_id) = match node.typename.as_str() {
        "ProjectV2ItemFieldSingleSelectValue" => (node.name?, node.option_id),
        "ProjectV2ItemFieldTextValue" => (node.text?, None),
        "ProjectV2ItemFieldDateValue" => (node.date?, None),
        _ => return None,
    };

    Some(FieldValue {
        field_id: field.id?,
        field_name: field.name?,
        value,
        option_id,
    })
}

fn map_content(node: Option<ContentNode>) -> ItemContent {
    let Some(node) = node else {
        return ItemContent {
            kind: CardKind::DraftIssue,
            title: None,
            body: None,
            url: None,
            state: None,
            created_at: None,
            number: None,
        };
    };

    let kind = match node.typename.as_str() {
        "Issue" => CardKind::Issue,
        "PullRequest" => CardKind::PullRequest,
        _ => CardKind::DraftIssue,
    };

    ItemContent {
        kind,
        title: node.title.filter(|t| !t.is_empty()),
        body: node.body,
        url: node.url,
        state: node.state,
        created_at: node.created_at,
        number: node.number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD_JSON: &str = r#"{
        "node": {
            "id": "PVT_1",
            "title": "Roadmap",
            "number": 4,
            "fields": { "nodes": [
                { "id": "F_title", "name": "Title", "dataType": "TITLE" },
                { "id": "F_status", "name": "Status", "dataType": "SINGLE_SELECT",
                  "options": [ { "id": "o1", "name": "Todo" }, { "id": "o2", "name": "Done" } ] },
                {}
            ] },
            "items": { "nodes": [
                {
                    "id": "PVTI_1",
                    "fieldValues": { "nodes": [
                        { "__typename": "ProjectV2ItemFieldTextValue", "text": "Fix login",
                          "field": { "id": "F_title", "name": "Title", "dataType": "TITLE" } },
                        { "__typename": "ProjectV2ItemFieldSingleSelectValue", "name": "Todo", "optionId": "o1",
                          "field": { "id": "F_status", "name": "Status", "dataType": "SINGLE_SELECT" } },
                        { "__typename": "ProjectV2ItemFieldRepositoryValue" }
                    ] },
                    "content": { "__typename": "Issue", "title": "Fix login", "body": "", "url": "https://x/1",
                                 "state": "OPEN", "number": 12, "createdAt": "2024-03-01T10:00:00Z" }
                },
                null,
                { "id": "PVTI_2", "fieldValues": null, "content": null }
            ] }
        }
    }"#;

    #[test]
    fn maps_project_board_payload() {
        let data: ProjectBoardData = serde_json::from_str(BOARD_JSON).unwrap();
        let (project, fields, items) = map_project_node(data.node.unwrap()).unwrap();

        assert_eq!(project.id, "PVT_1");
        assert!(project.is_v2);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].option_id("Done"), Some("o2"));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].field_values.len(), 1);
        assert_eq!(items[0].field_values[0].value, "Todo");
        assert_eq!(items[0].field_values[0].option_id.as_deref(), Some("o1"));
        assert_eq!(items[0].content.kind, CardKind::Issue);
        assert_eq!(items[0].content.number, Some(12));

        assert!(items[1].field_values.is_empty());
        assert_eq!(items[1].content.kind, CardKind::DraftIssue);
    }

    #[test]
    fn non_project_node_maps_to_none() {
        let data: ProjectBoardData = serde_json::from_str(r#"{"node": {}}"#).unwrap();
        assert!(map_project_node(data.node.unwrap()).is_none());
    }

    #[test]
    fn maps_project_listing() {
        let json = r#"{"organization": {"projectsV2": {"nodes": [
            {"id": "PVT_a", "title": "A", "number": 1}, null, {"id": "PVT_b", "title": "B", "number": 2}
        ]}}}"#;
        let data: ListProjectsData = serde_json::from_str(json).unwrap();
        let projects = map_project_list(data);
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[1].numeric_id, 2);
        assert!(projects.iter().all(|p| p.is_v2));
    }

    #[test]
    fn missing_organization_lists_nothing() {
        let data: ListProjectsData = serde_json::from_str(r#"{"organization": null}"#).unwrap();
        assert!(map_project_list(data).is_empty());
    }

    #[test]
    fn errors_default_to_empty() {
        let response: GraphQlResponse<ListProjectsData> =
            serde_json::from_str(r#"{"data": {"organization": null}}"#).unwrap();
        assert!(response.errors.is_empty());
        assert!(response.data.is_some());
    }
}
