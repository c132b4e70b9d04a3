//! Dispatcher authentication configuration.

use secrecy::SecretString;
use serde::Deserialize;

/// Bearer tokens accepted by the dispatcher.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthSettings {
    /// Accepted tokens. Empty rejects every request.
    #[serde(default)]
    pub tokens: Vec<SecretString>,
}
