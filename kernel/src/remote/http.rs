//! Shared HTTP transport for both API families.
//!
//! Wraps a single `reqwest` client with bearer authentication, status
//! mapping and retry with backoff for transient failures.

use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::remote::error::RemoteError;
use crate::remote::retry::RetryConfig;

const USER_AGENT: &str = concat!("trellis-kernel/", env!("CARGO_PKG_VERSION"));
const ACCEPT_JSON: &str = "application/vnd.github+json";

/// Authenticated HTTP transport with retry.
pub struct HttpTransport {
    client: Client,
    token: SecretString,
    retry: RetryConfig,
}

impl HttpTransport {
    /// Creates a transport.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Config`] if the HTTP client cannot be built.
    pub fn new(token: SecretString, retry: RetryConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RemoteError::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            token,
            retry,
        })
    }

    /// Returns the underlying client for building requests.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Sends the request produced by `build`, retrying transient failures,
    /// and decodes the JSON body.
    ///
    /// `build` is called once per attempt. An empty success body decodes as
    /// JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted or on the first
    /// non-retryable error.
    pub async fn send_json<T, F>(&self, operation: &'static str, build: F) -> Result<T, RemoteError>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut last_error = RemoteError::Network("No attempts made".to_string());

        for attempt in 0..=self.retry.max_retries {
            match self.attempt(&build).await {
                Ok(response) => return decode(response).await,
                Err(error) => {
                    last_error = error;
                    if !last_error.is_retryable() || attempt >= self.retry.max_retries {
                        break;
                    }

                    let delay = self.retry.calculate_backoff_delay(attempt);
                    let delay_ms: u64 = delay.as_millis().try_into().unwrap_or(u64::MAX);
                    warn!(
                        operation,
                        attempt = attempt + 1,
                        max_retries = self.retry.max_retries,
                        delay_ms,
                        error = %last_error,
                        "Upstream request failed, retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        debug!(operation, error = %last_error, "Upstream request failed");
        Err(last_error)
    }

    async fn attempt<F>(&self, build: &F) -> Result<Response, RemoteError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let response = build(&self.client)
            .bearer_auth(self.token.expose_secret())
            .header(ACCEPT, HeaderValue::from_static(ACCEPT_JSON))
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        map_status(response).await
    }
}

async fn map_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let rate_limited = response
        .headers()
        .get("x-ratelimit-remaining")
        .is_some_and(|v| v.as_bytes() == b"0");
    let path = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();

    Err(match status {
        StatusCode::TOO_MANY_REQUESTS => RemoteError::RateLimit,
        StatusCode::FORBIDDEN if rate_limited => RemoteError::RateLimit,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unauthorized(body),
        StatusCode::NOT_FOUND => RemoteError::NotFound(path),
        _ => RemoteError::Upstream {
            status: status.as_u16(),
            body,
        },
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    let text = response
        .text()
        .await
        .map_err(|e| RemoteError::Network(e.to_string()))?;
    let text = if text.trim().is_empty() { "null" } else { &text };
    serde_json::from_str(text).map_err(|e| RemoteError::Parse(e.to_string()))
}
