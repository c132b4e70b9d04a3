//! Optimistic mutation engine configuration.

use std::time::Duration;

use serde::Deserialize;

/// View-model settings.
///
/// The dispatcher binary holds no view model; these settings are read by
/// presentation processes that embed the kernel and build a
/// [`BoardViewModel`](crate::engine::BoardViewModel) from
/// [`EngineSettings::notice_ttl`].
#[derive(Debug, Deserialize, Clone)]
pub struct EngineSettings {
    /// How long error notices stay up, in milliseconds.
    #[serde(default = "default_notice_ttl_ms")]
    pub notice_ttl_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            notice_ttl_ms: default_notice_ttl_ms(),
        }
    }
}

impl EngineSettings {
    /// Notice lifetime.
    #[must_use]
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }
}

fn default_notice_ttl_ms() -> u64 {
    3_000
}
