//! HTTP client for the legacy REST API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::assembler::IssueLookup;
use crate::board::Project;
use crate::remote::error::RemoteError;
use crate::remote::http::HttpTransport;
use crate::remote::rest::types::{
    ClassicCard, ClassicColumn, ClassicIssue, ClassicProject, CreateIssueBody, MoveCardBody,
};
use crate::remote::service::{CardPosition, CreateIssueRequest, Issue};

/// Page size for listings; only the first page is read.
const PER_PAGE: &str = "100";

/// Columns of a classic project, each with its raw cards.
pub type ClassicLayout = Vec<(ClassicColumn, Vec<ClassicCard>)>;

/// Client for the legacy REST API.
pub struct RestClient {
    transport: Arc<HttpTransport>,
    base: Url,
}

impl RestClient {
    /// Creates a client rooted at `base` (which must end with a slash).
    #[must_use]
    pub fn new(transport: Arc<HttpTransport>, base: Url) -> Self {
        Self { transport, base }
    }

    fn url(&self, path: &str) -> Result<Url, RemoteError> {
        self.base
            .join(path)
            .map_err(|e| RemoteError::Config(format!("Invalid URL join: {e}")))
    }

    fn listing_url(&self, path: &str) -> Result<Url, RemoteError> {
        let mut url = self.url(path)?;
        url.query_pairs_mut().append_pair("per_page", PER_PAGE);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: Url,
    ) -> Result<T, RemoteError> {
        self.transport
            .send_json(operation, |client| client.get(url.clone()))
            .await
    }

    /// Lists the projects of a repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_repo_projects(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<Project>, RemoteError> {
        let url = self.listing_url(&format!("repos/{owner}/{repo}/projects"))?;
        let projects: Vec<ClassicProject> = self.get("rest.list_repo_projects", url).await?;
        Ok(projects.into_iter().map(Project::from).collect())
    }

    /// Lists the projects of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_org_projects(&self, org: &str) -> Result<Vec<Project>, RemoteError> {
        let url = self.listing_url(&format!("orgs/{org}/projects"))?;
        let projects: Vec<ClassicProject> = self.get("rest.list_org_projects", url).await?;
        Ok(projects.into_iter().map(Project::from).collect())
    }

    /// Fetches a project and all of its columns with their cards.
    ///
    /// # Errors
    ///
    /// Returns an error if the project, its columns or any column's cards
    /// cannot be fetched.
    pub async fn fetch_layout(&self, project_id: &str) -> Result<(Project, ClassicLayout), RemoteError> {
        let project_id = numeric_id("project", project_id)?;

        let project: ClassicProject = self
            .get("rest.get_project", self.url(&format!("projects/{project_id}"))?)
            .await?;
        let columns: Vec<ClassicColumn> = self
            .get(
                "rest.list_columns",
                self.listing_url(&format!("projects/{project_id}/columns"))?,
            )
            .await?;

        let mut layout = Vec::with_capacity(columns.len());
        for column in columns {
            let cards: Vec<ClassicCard> = self
                .get(
                    "rest.list_cards",
                    self.listing_url(&format!("projects/columns/{}/cards", column.id))?,
                )
                .await?;
            layout.push((column, cards));
        }

        debug!(project_id, columns = layout.len(), "Fetched classic project");
        Ok((project.into(), layout))
    }

    /// Moves a card to another column.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::InvalidRequest`] for non-numeric ids, or any
    /// transport error.
    pub async fn move_card(
        &self,
        card_id: &str,
        column_id: &str,
        position: &CardPosition,
    ) -> Result<(), RemoteError> {
        let card_id = numeric_id("card", card_id)?;
        let body = MoveCardBody {
            position: position.to_string(),
            column_id: numeric_id("column", column_id)?,
        };
        let url = self.url(&format!("projects/columns/cards/{card_id}/moves"))?;

        let _: serde_json::Value = self
            .transport
            .send_json("rest.move_card", |client| client.post(url.clone()).json(&body))
            .await?;
        Ok(())
    }

    /// Opens an issue in `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        request: &CreateIssueRequest,
    ) -> Result<Issue, RemoteError> {
        let body = CreateIssueBody {
            title: &request.title,
            body: &request.body,
            labels: &request.labels,
        };
        let url = self.url(&format!("repos/{owner}/{repo}/issues"))?;

        let issue: ClassicIssue = self
            .transport
            .send_json("rest.create_issue", |client| client.post(url.clone()).json(&body))
            .await?;
        Ok(issue.into())
    }
}

#[async_trait]
impl IssueLookup for RestClient {
    async fn fetch_issue(&self, content_url: &str) -> Result<ClassicIssue, RemoteError> {
        let url = Url::parse(content_url)
            .map_err(|e| RemoteError::InvalidRequest(format!("content_url '{content_url}': {e}")))?;
        self.get("rest.fetch_issue", url).await
    }
}

fn numeric_id(what: &str, id: &str) -> Result<u64, RemoteError> {
    id.parse()
        .map_err(|_| RemoteError::InvalidRequest(format!("{what} id must be numeric, got '{id}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_id_rejects_node_ids() {
        assert_eq!(numeric_id("card", "42"), Ok(42));
        assert!(matches!(
            numeric_id("card", "PVTI_x"),
            Err(RemoteError::InvalidRequest(_))
        ));
    }
}
