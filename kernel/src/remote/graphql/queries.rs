//! Query documents sent to the typed query API.

/// Organization-scoped project listing.
pub const LIST_PROJECTS: &str = r"
query ListProjects($login: String!, $first: Int!) {
  organization(login: $login) {
    projectsV2(first: $first) {
      nodes { id title number }
    }
  }
}";

/// Fields and items of one project, bounded to the first page of each.
pub const PROJECT_BOARD: &str = r"
query ProjectBoard($id: ID!, $fields: Int!, $items: Int!, $values: Int!) {
  node(id: $id) {
    ... on ProjectV2 {
      id
      title
      number
      fields(first: $fields) {
        nodes {
          ... on ProjectV2FieldCommon { id name dataType }
          ... on ProjectV2SingleSelectField { options { id name } }
        }
      }
      items(first: $items) {
        nodes {
          id
          fieldValues(first: $values) {
            nodes {
              __typename
              ... on ProjectV2ItemFieldSingleSelectValue {
                name
                optionId
                field { ... on ProjectV2FieldCommon { id name dataType } }
              }
              ... on ProjectV2ItemFieldTextValue {
                text
                field { ... on ProjectV2FieldCommon { id name dataType } }
              }
              ... on ProjectV2ItemFieldDateValue {
                date
                field { ... on ProjectV2FieldCommon { id name dataType } }
              }
            }
          }
          content {
            __typename
            ... on Issue { title body url state number createdAt }
            ... on PullRequest { title body url state number createdAt }
            ... on DraftIssue { title body createdAt }
          }
        }
      }
    }
  }
}";

/// Sets an item's single-select value.
pub const SET_SINGLE_SELECT: &str = r"
mutation SetSingleSelect($project: ID!, $item: ID!, $field: ID!, $option: String!) {
  updateProjectV2ItemFieldValue(
    input: {
      projectId: $project
      itemId: $item
      fieldId: $field
      value: { singleSelectOptionId: $option }
    }
  ) {
    projectV2Item { id }
  }
}";
