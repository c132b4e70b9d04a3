//! Connection settings for the remote board client.

use reqwest::Url;
use secrecy::SecretString;
use serde::Deserialize;

/// Bounds for the single page of data each query fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageLimits {
    /// Projects returned by the typed project listing.
    pub projects: u32,
    /// Fields fetched per V2 project.
    pub fields: u32,
    /// Items fetched per V2 project.
    pub items: u32,
    /// Field values fetched per V2 item.
    pub field_values: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            projects: 10,
            fields: 20,
            items: 100,
            field_values: 20,
        }
    }
}

/// Configuration for the remote board client.
pub struct RemoteConfig {
    /// Bearer token sent to both API families.
    pub token: SecretString,
    /// Organization or user that owns the projects.
    pub owner: String,
    /// Default repository for repository-scoped calls.
    pub repository: String,
    /// Endpoint of the typed query API.
    pub graphql_url: Url,
    /// Base URL of the legacy REST API, with a trailing slash.
    pub rest_url: Url,
    /// Maximum number of retries for transient errors.
    pub max_retries: Option<u32>,
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: Option<u64>,
    /// Page bounds.
    pub limits: PageLimits,
}

impl RemoteConfig {
    /// Creates a config with default retry settings and page limits.
    #[must_use]
    pub fn new(
        token: SecretString,
        owner: impl Into<String>,
        repository: impl Into<String>,
        graphql_url: Url,
        rest_url: Url,
    ) -> Self {
        Self {
            token,
            owner: owner.into(),
            repository: repository.into(),
            graphql_url,
            rest_url,
            max_retries: None,
            base_delay_ms: None,
            limits: PageLimits::default(),
        }
    }

    /// Sets the maximum number of retries
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the base delay for exponential backoff
    #[must_use]
    pub fn with_base_delay_ms(mut self, delay_ms: u64) -> Self {
        self.base_delay_ms = Some(delay_ms);
        self
    }

    /// Sets the page bounds
    #[must_use]
    pub fn with_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }
}
