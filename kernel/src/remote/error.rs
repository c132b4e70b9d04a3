//! Error types for remote board operations.

/// Errors that can occur talking to either backend API family.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// Transport-level failure.
    #[error("Network Error: {0}")]
    Network(String),
    /// Rate limit exceeded.
    #[error("Rate Limit Exceeded")]
    RateLimit,
    /// The token was rejected or lacks the required scopes.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// The requested resource does not exist.
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Non-success HTTP status from the backend.
    #[error("HTTP {status}: {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },
    /// The typed query API answered with an `errors` array.
    #[error("GraphQL Error: {0}")]
    GraphQl(String),
    /// Response body could not be decoded.
    #[error("Parse Error: {0}")]
    Parse(String),
    /// Client misconfiguration.
    #[error("Configuration Error: {0}")]
    Config(String),
    /// The request is malformed or lacks something the selected adapter needs.
    #[error("Invalid Request: {0}")]
    InvalidRequest(String),
}

impl RemoteError {
    /// Returns `true` if this error is transient and retry may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimit => true,
            Self::Upstream { status, .. } => *status >= 500,
            Self::Unauthorized(_)
            | Self::NotFound(_)
            | Self::GraphQl(_)
            | Self::Parse(_)
            | Self::Config(_)
            | Self::InvalidRequest(_) => false,
        }
    }
}
