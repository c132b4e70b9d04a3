//! Configuration management for the Trellis kernel.
//!
//! Settings are layered: built-in defaults, then an optional `trellis.toml`
//! (or the file named by `TRELLIS_CONFIG`), then `TRELLIS__SECTION__KEY`
//! environment variables. List values in the environment are comma
//! separated.
//!
//! # Example
//!
//! ```no_run
//! use trellis_kernel::infrastructure::config::Settings;
//!
//! let settings = Settings::new().expect("Failed to load configuration");
//! ```

pub mod auth;
pub mod engine;
pub mod remote;
pub mod server;
pub mod telemetry;

pub use auth::AuthSettings;
pub use engine::EngineSettings;
pub use remote::RemoteSettings;
pub use server::ServerSettings;
pub use telemetry::TelemetrySettings;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::discovery::DiscoveryKeywords;

/// Top-level configuration for the Trellis kernel.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Server settings.
    pub server: ServerSettings,
    /// Telemetry settings.
    pub telemetry: TelemetrySettings,
    /// Upstream API settings.
    pub remote: RemoteSettings,
    /// Dispatcher authentication.
    #[serde(default)]
    pub auth: AuthSettings,
    /// Status-field heuristic keywords.
    #[serde(default)]
    pub discovery: DiscoveryKeywords,
    /// View-model settings.
    #[serde(default)]
    pub engine: EngineSettings,
}

const LIST_KEYS: [&str; 3] = [
    "auth.tokens",
    "discovery.field_keywords",
    "discovery.value_keywords",
];

impl Settings {
    /// Creates a new settings instance from defaults, the optional config
    /// file and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be built or deserialized.
    pub fn new() -> Result<Self, ConfigError> {
        let file = std::env::var("TRELLIS_CONFIG").unwrap_or_else(|_| "trellis".into());
        Self::load(File::with_name(&file).required(false), environment())
    }

    /// Builds settings from the given file and environment sources on top
    /// of the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be built or deserialized.
    pub fn load<F>(file: F, env: Environment) -> Result<Self, ConfigError>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let s = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 9090)?
            .set_default("telemetry.service_name", "trellis-kernel")?
            .set_default("telemetry.sampling_ratio", 1.0)?
            .set_default("telemetry.log_level", "info")?
            .set_default("remote.graphql_url", "https://api.github.com/graphql")?
            .set_default("remote.rest_url", "https://api.github.com/")?
            .add_source(file)
            .add_source(env)
            .build()?;

        s.try_deserialize()
    }
}

/// The `TRELLIS__…` environment source.
#[must_use]
pub fn environment() -> Environment {
    LIST_KEYS.iter().fold(
        Environment::with_prefix("TRELLIS")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(","),
        |env, key| env.with_list_parse_key(key),
    )
}

/// Helper for strong typing addresses
pub struct BindAddress(pub String, pub u16);

impl BindAddress {
    /// Converts the bind address to a `SocketAddr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the IP address string cannot be parsed.
    pub fn to_socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        let ip = self
            .0
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid IP address '{}': {e}", self.0))?;
        Ok(std::net::SocketAddr::new(ip, self.1))
    }
}

impl From<&ServerSettings> for BindAddress {
    fn from(server: &ServerSettings) -> Self {
        Self(server.host.clone(), server.port)
    }
}
