//! HTTP client for the typed query API.

use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::board::{Field, Project, ProjectItem};
use crate::remote::config::PageLimits;
use crate::remote::error::RemoteError;
use crate::remote::graphql::mapping::{
    map_project_list, map_project_node, GraphQlRequest, GraphQlResponse, ListProjectsData,
    ProjectBoardData, SetSingleSelectData,
};
use crate::remote::graphql::queries::{LIST_PROJECTS, PROJECT_BOARD, SET_SINGLE_SELECT};
use crate::remote::http::HttpTransport;

/// Everything the typed query API returns for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V2Snapshot {
    /// The project.
    pub project: Project,
    /// Field definitions.
    pub fields: Vec<Field>,
    /// Items with their field values.
    pub items: Vec<ProjectItem>,
}

/// Client for the typed query (V2) API.
pub struct GraphQlClient {
    transport: Arc<HttpTransport>,
    endpoint: Url,
    limits: PageLimits,
}

impl GraphQlClient {
    /// Creates a client posting to `endpoint`.
    #[must_use]
    pub fn new(transport: Arc<HttpTransport>, endpoint: Url, limits: PageLimits) -> Self {
        Self {
            transport,
            endpoint,
            limits,
        }
    }

    /// Runs one query document and unwraps the response envelope.
    async fn execute<V, T>(
        &self,
        operation: &'static str,
        query: &str,
        variables: V,
    ) -> Result<T, RemoteError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let body = GraphQlRequest { query, variables };
        let response: GraphQlResponse<T> = self
            .transport
            .send_json(operation, |client| {
                client.post(self.endpoint.clone()).json(&body)
            })
            .await?;

        if !response.errors.is_empty() {
            let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(RemoteError::GraphQl(messages.join("; ")));
        }

        response
            .data
            .ok_or_else(|| RemoteError::Parse(format!("{operation}: response has no data")))
    }

    /// Lists up to the configured number of projects owned by `login`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports errors.
    pub async fn list_org_projects(&self, login: &str) -> Result<Vec<Project>, RemoteError> {
        let data: ListProjectsData = self
            .execute(
                "graphql.list_projects",
                LIST_PROJECTS,
                json!({ "login": login, "first": self.limits.projects }),
            )
            .await?;
        Ok(map_project_list(data))
    }

    /// Fetches a project's fields and items.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] if the id does not name a project,
    /// or any transport or API error.
    pub async fn fetch_project(&self, project_id: &str) -> Result<V2Snapshot, RemoteError> {
        let data: ProjectBoardData = self
            .execute(
                "graphql.project_board",
                PROJECT_BOARD,
                json!({
                    "id": project_id,
                    "fields": self.limits.fields,
                    "items": self.limits.items,
                    "values": self.limits.field_values,
                }),
            )
            .await?;

        let (project, fields, items) = data
            .node
            .and_then(map_project_node)
            .ok_or_else(|| RemoteError::NotFound(format!("project {project_id}")))?;

        debug!(
            project_id,
            fields = fields.len(),
            items = items.len(),
            "Fetched V2 project"
        );
        Ok(V2Snapshot {
            project,
            fields,
            items,
        })
    }

    /// Sets an item's single-select value, which moves it between columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or reports no updated item.
    pub async fn set_single_select(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<String, RemoteError> {
        let data: SetSingleSelectData = self
            .execute(
                "graphql.set_single_select",
                SET_SINGLE_SELECT,
                json!({
                    "project": project_id,
                    "item": item_id,
                    "field": field_id,
                    "option": option_id,
                }),
            )
            .await?;

        data.update_project_v2_item_field_value
            .and_then(|p| p.project_v2_item)
            .map(|item| item.id)
            .ok_or_else(|| RemoteError::Parse("mutation returned no item".to_string()))
    }
}
