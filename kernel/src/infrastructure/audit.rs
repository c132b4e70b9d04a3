use serde::Serialize;
use tracing::{info, info_span};

/// Domain event for audit logging.
/// Structured for JSON serialization to enable machine-readable audit trails.
#[derive(Debug, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// The process started serving.
    SystemStartup {
        /// Component that started.
        component: String,
    },
    /// The process is shutting down.
    SystemShutdown {
        /// Why.
        reason: String,
    },
    /// A dispatcher request failed authentication.
    AccessDenied {
        /// Route that was requested.
        route: String,
        /// Why the request was rejected.
        reason: String,
    },
    /// A card move was accepted by the remote.
    CardMoved {
        /// Moved card.
        card_id: String,
        /// Destination column or option.
        column_id: String,
    },
    /// An issue was opened.
    IssueCreated {
        /// Issue number.
        number: u64,
        /// Issue URL.
        url: String,
    },
}

/// Logs an audit event to the dedicated audit channel as structured JSON.
/// This uses a specific `target` which can be filtered by the subscriber to redirect to a secure file.
pub fn log_audit(event: &AuditEvent) {
    let span = info_span!(target: "audit", "audit_event");
    let _enter = span.enter();

    let json = serde_json::to_string(event).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"));
    info!(target: "audit", audit_json = %json, "Security Audit Event");
}
