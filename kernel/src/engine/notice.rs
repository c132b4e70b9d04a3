//! Self-dismissing error notices.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// How long a notice stays up unless dismissed earlier.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

/// A transient, user-visible error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// Identity, so a late timer never clears a newer notice.
    pub id: Uuid,
    /// Message text.
    pub message: String,
    /// When the notice was raised.
    pub raised_at: DateTime<Utc>,
}

/// Holds at most one notice and clears it after a fixed delay.
#[derive(Debug, Clone)]
pub struct NoticeSlot {
    current: Arc<Mutex<Option<Notice>>>,
    ttl: Duration,
}

impl Default for NoticeSlot {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

impl NoticeSlot {
    /// Creates an empty slot whose notices expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            ttl,
        }
    }

    /// Shows `message`, replacing any current notice, and schedules its
    /// removal.
    ///
    /// Outside a Tokio runtime the notice stays until dismissed.
    pub fn raise(&self, message: impl Into<String>) -> Uuid {
        let notice = Notice {
            id: Uuid::new_v4(),
            message: message.into(),
            raised_at: Utc::now(),
        };
        let id = notice.id;
        *self.current.lock() = Some(notice);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let current = Arc::clone(&self.current);
            let ttl = self.ttl;
            handle.spawn(async move {
                tokio::time::sleep(ttl).await;
                let mut slot = current.lock();
                if slot.as_ref().is_some_and(|n| n.id == id) {
                    debug!(%id, "Notice expired");
                    *slot = None;
                }
            });
        }
        id
    }

    /// The notice currently shown, if any.
    #[must_use]
    pub fn current(&self) -> Option<Notice> {
        self.current.lock().clone()
    }

    /// Removes the current notice.
    pub fn dismiss(&self) {
        *self.current.lock() = None;
    }
}
