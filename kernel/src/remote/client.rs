//! The remote board client: one capability set over both API generations.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::assembler::{assemble_classic, assemble_v2};
use crate::board::{Board, Project, ProjectRef};
use crate::discovery::DiscoveryKeywords;
use crate::remote::config::RemoteConfig;
use crate::remote::error::RemoteError;
use crate::remote::graphql::GraphQlClient;
use crate::remote::http::HttpTransport;
use crate::remote::rest::RestClient;
use crate::remote::retry::{RetryConfig, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_RETRIES};
use crate::remote::service::{BoardService, CreateIssueRequest, Issue, MoveCardRequest, MovedCard};

/// A source of project listings, tried in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectTier {
    /// Organization-scoped typed query.
    OrgTyped,
    /// Repository-scoped legacy listing.
    RepoLegacy,
    /// Organization-scoped legacy listing.
    OrgLegacy,
}

impl ProjectTier {
    /// Tiers in the order they are tried.
    pub const ORDER: [Self; 3] = [Self::OrgTyped, Self::RepoLegacy, Self::OrgLegacy];

    /// Short label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrgTyped => "org_typed",
            Self::RepoLegacy => "repo_legacy",
            Self::OrgLegacy => "org_legacy",
        }
    }
}

impl fmt::Display for ProjectTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The API generation serving one project.
enum Adapter<'a> {
    V2(&'a GraphQlClient),
    Classic(&'a RestClient),
}

impl Adapter<'_> {
    async fn board(&self, project_id: &str, keywords: &DiscoveryKeywords) -> Result<Board, RemoteError> {
        match self {
            Self::V2(graphql) => {
                let snapshot = graphql.fetch_project(project_id).await?;
                Ok(assemble_v2(snapshot, keywords))
            }
            Self::Classic(rest) => {
                let (project, layout) = rest.fetch_layout(project_id).await?;
                Ok(assemble_classic(project, layout, *rest).await)
            }
        }
    }

    async fn move_card(&self, request: &MoveCardRequest) -> Result<(), RemoteError> {
        match self {
            Self::V2(graphql) => {
                let field_id = request
                    .field_id
                    .as_deref()
                    .ok_or_else(|| RemoteError::InvalidRequest("fieldId is required".to_string()))?;
                let project_id = request.project_id.as_deref().ok_or_else(|| {
                    RemoteError::InvalidRequest("projectId is required for V2 moves".to_string())
                })?;
                graphql
                    .set_single_select(project_id, &request.card_id, field_id, &request.column_id)
                    .await
                    .map(|_| ())
            }
            Self::Classic(rest) => {
                rest.move_card(&request.card_id, &request.column_id, &request.position)
                    .await
            }
        }
    }
}

/// Client for remote boards across both API generations.
///
/// Projects are listed through a three-tier fallback chain; everything else
/// is routed per project to the typed query or the legacy REST adapter.
pub struct RemoteBoardClient {
    graphql: GraphQlClient,
    rest: RestClient,
    owner: String,
    repository: String,
    keywords: DiscoveryKeywords,
}

impl RemoteBoardClient {
    /// Creates a client sharing one HTTP transport between both adapters.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Config`] if the HTTP client cannot be built.
    pub fn new(config: RemoteConfig, keywords: DiscoveryKeywords) -> Result<Self, RemoteError> {
        let retry = RetryConfig::new()
            .with_max_retries(config.max_retries.unwrap_or(DEFAULT_MAX_RETRIES))
            .with_base_delay_ms(config.base_delay_ms.unwrap_or(DEFAULT_BASE_DELAY_MS));
        let transport = Arc::new(HttpTransport::new(config.token, retry)?);

        Ok(Self {
            graphql: GraphQlClient::new(Arc::clone(&transport), config.graphql_url, config.limits),
            rest: RestClient::new(transport, config.rest_url),
            owner: config.owner,
            repository: config.repository,
            keywords,
        })
    }

    fn adapter(&self, is_v2: bool) -> Adapter<'_> {
        if is_v2 {
            Adapter::V2(&self.graphql)
        } else {
            Adapter::Classic(&self.rest)
        }
    }

    async fn list_tier(&self, tier: ProjectTier) -> Result<Vec<Project>, RemoteError> {
        match tier {
            ProjectTier::OrgTyped => self.graphql.list_org_projects(&self.owner).await,
            ProjectTier::RepoLegacy => {
                self.rest
                    .list_repo_projects(&self.owner, &self.repository)
                    .await
            }
            ProjectTier::OrgLegacy => self.rest.list_org_projects(&self.owner).await,
        }
    }
}

#[async_trait]
impl BoardService for RemoteBoardClient {
    async fn list_projects(&self) -> Vec<Project> {
        for tier in ProjectTier::ORDER {
            match self.list_tier(tier).await {
                Ok(projects) if !projects.is_empty() => {
                    info!(%tier, count = projects.len(), "Listed projects");
                    return projects;
                }
                Ok(_) => {
                    warn!(%tier, "Project tier returned no projects, falling through");
                }
                Err(e) => {
                    warn!(%tier, error = %e, "Project tier unavailable, falling through");
                }
            }
            metrics::counter!("trellis_tier_fallbacks_total", "tier" => tier.as_str()).increment(1);
        }

        warn!(owner = %self.owner, "No project tier yielded any projects");
        Vec::new()
    }

    async fn get_board(&self, project: &ProjectRef) -> Result<Board, RemoteError> {
        self.adapter(project.is_v2)
            .board(&project.id, &self.keywords)
            .await
    }

    async fn move_card(&self, request: MoveCardRequest) -> Result<MovedCard, RemoteError> {
        let v2 = request.is_v2 && request.field_id.is_some();
        self.adapter(v2).move_card(&request).await?;

        info!(
            card_id = %request.card_id,
            column_id = %request.column_id,
            position = %request.position,
            v2,
            "Moved card"
        );
        Ok(MovedCard {
            card_id: request.card_id,
            column_id: request.column_id,
        })
    }

    async fn create_issue(&self, request: CreateIssueRequest) -> Result<Issue, RemoteError> {
        let repo = request
            .repo
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(&self.repository);

        let issue = self.rest.create_issue(&self.owner, repo, &request).await?;
        info!(repo, number = issue.number, "Created issue");
        Ok(issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_tried_typed_first() {
        assert_eq!(
            ProjectTier::ORDER,
            [
                ProjectTier::OrgTyped,
                ProjectTier::RepoLegacy,
                ProjectTier::OrgLegacy
            ]
        );
        assert_eq!(ProjectTier::RepoLegacy.to_string(), "repo_legacy");
    }
}
