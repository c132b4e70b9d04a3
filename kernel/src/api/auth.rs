//! Bearer-token authentication for the dispatcher.

use std::fmt;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

/// Why a request was not authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No `Authorization: Bearer` header.
    MissingCredentials,
    /// The token is not one of the configured tokens.
    InvalidToken,
}

impl AuthFailure {
    /// Short reason recorded in audit events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingCredentials => "missing_credentials",
            Self::InvalidToken => "invalid_token",
        }
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingCredentials => "Authentication required",
            Self::InvalidToken => "Invalid credentials",
        })
    }
}

/// Checks bearer tokens against a configured set.
///
/// Only SHA-256 digests of the tokens are kept, and digests are compared
/// without early exit. With no tokens configured every request is rejected.
#[derive(Clone, Default)]
pub struct TokenAuthenticator {
    digests: Vec<[u8; 32]>,
}

impl fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("tokens", &self.digests.len())
            .finish()
    }
}

impl TokenAuthenticator {
    /// Creates an authenticator accepting any of `tokens`. Empty tokens are
    /// ignored.
    #[must_use]
    pub fn new(tokens: &[SecretString]) -> Self {
        let digests = tokens
            .iter()
            .map(|t| t.expose_secret())
            .filter(|t| !t.is_empty())
            .map(digest)
            .collect();
        Self { digests }
    }

    /// Number of accepted tokens.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.digests.len()
    }

    /// Authenticates a request by its headers.
    ///
    /// # Errors
    ///
    /// Returns the [`AuthFailure`] describing why the request is rejected.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<(), AuthFailure> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthFailure::MissingCredentials)?;

        let presented = digest(token);
        let matched = self
            .digests
            .iter()
            .fold(false, |found, known| found | same_digest(known, &presented));

        if matched {
            Ok(())
        } else {
            Err(AuthFailure::InvalidToken)
        }
    }
}

fn digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}

fn same_digest(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn authenticator() -> TokenAuthenticator {
        TokenAuthenticator::new(&[SecretString::new("s3cret".into()), SecretString::new("".into())])
    }

    #[test]
    fn accepts_configured_token() {
        assert_eq!(authenticator().authenticate(&headers("Bearer s3cret")), Ok(()));
        assert_eq!(authenticator().token_count(), 1);
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        let auth = authenticator();
        assert_eq!(
            auth.authenticate(&HeaderMap::new()),
            Err(AuthFailure::MissingCredentials)
        );
        assert_eq!(
            auth.authenticate(&headers("Basic s3cret")),
            Err(AuthFailure::MissingCredentials)
        );
        assert_eq!(
            auth.authenticate(&headers("Bearer ")),
            Err(AuthFailure::MissingCredentials)
        );
    }

    #[test]
    fn rejects_unknown_token() {
        assert_eq!(
            authenticator().authenticate(&headers("Bearer guess")),
            Err(AuthFailure::InvalidToken)
        );
    }

    #[test]
    fn no_tokens_rejects_everything() {
        let auth = TokenAuthenticator::default();
        assert_eq!(
            auth.authenticate(&headers("Bearer anything")),
            Err(AuthFailure::InvalidToken)
        );
    }

    #[test]
    fn debug_does_not_leak_tokens() {
        let rendered = format!("{:?}", authenticator());
        assert!(!rendered.contains("s3cret"));
    }
}
