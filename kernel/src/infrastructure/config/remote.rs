//! Remote backend configuration.

use reqwest::Url;
use secrecy::SecretString;
use serde::Deserialize;

use crate::remote::{PageLimits, RemoteConfig, RemoteError};

/// Connection settings for the upstream project-tracking API.
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteSettings {
    /// Bearer token for both API families.
    pub token: SecretString,
    /// Organization or user owning the projects.
    pub owner: String,
    /// Default repository.
    pub repository: String,
    /// Typed query endpoint.
    pub graphql_url: String,
    /// Legacy REST base URL.
    pub rest_url: String,
    /// Retries for transient failures.
    pub max_retries: Option<u32>,
    /// Base backoff delay in milliseconds.
    pub base_delay_ms: Option<u64>,
    /// First-page bounds.
    #[serde(default)]
    pub page: PageLimits,
}

impl RemoteSettings {
    /// Builds the client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Config`] if either URL is invalid.
    pub fn to_remote_config(&self) -> Result<RemoteConfig, RemoteError> {
        let graphql_url = parse_url("graphql_url", &self.graphql_url)?;
        let rest_url = if self.rest_url.ends_with('/') {
            parse_url("rest_url", &self.rest_url)?
        } else {
            parse_url("rest_url", &format!("{}/", self.rest_url))?
        };

        let mut config = RemoteConfig::new(
            self.token.clone(),
            self.owner.clone(),
            self.repository.clone(),
            graphql_url,
            rest_url,
        )
        .with_limits(self.page);
        if let Some(max_retries) = self.max_retries {
            config = config.with_max_retries(max_retries);
        }
        if let Some(delay_ms) = self.base_delay_ms {
            config = config.with_base_delay_ms(delay_ms);
        }
        Ok(config)
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url, RemoteError> {
    Url::parse(value).map_err(|e| RemoteError::Config(format!("remote.{key} '{value}': {e}")))
}
