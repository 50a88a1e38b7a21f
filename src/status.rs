//! Status events: the append-only audit trail of a run.
//!
//! Every side-effect attempt in the workflow produces a [`StatusEvent`] at
//! the moment it happens. Events are immutable after creation; they are
//! appended to the run's history through the barrier merge and forwarded to
//! the configured [`AuditSink`](crate::audit::AuditSink) by the reporter.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "when": "2026-08-07T10:30:00Z",
//!   "scope": "web",
//!   "status": "warning",
//!   "message": "Linter found errors",
//!   "details": {"errors": "..."}
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The source of a status event.
///
/// `Common` covers run-wide stages shared by every branch (validation,
/// context retrieval); `System` is reserved for the executor itself;
/// `Web`/`Mobile` are the per-platform pipeline branches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusScope {
    Common,
    System,
    Web,
    Mobile,
}

impl fmt::Display for StatusScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Common => write!(f, "common"),
            Self::System => write!(f, "system"),
            Self::Web => write!(f, "web"),
            Self::Mobile => write!(f, "mobile"),
        }
    }
}

/// Severity / lifecycle marker of a status event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// One immutable, timestamped record of a stage's outcome.
///
/// # Examples
///
/// ```rust
/// use uiforge::status::{Status, StatusEvent, StatusScope};
/// use serde_json::json;
///
/// let event = StatusEvent::warning(StatusScope::Web, "Linter found errors")
///     .with_details(json!({"errors": "unexpected token"}));
///
/// assert_eq!(event.status, Status::Warning);
/// assert!(event.details.is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Creation time of the event.
    #[serde(default = "Utc::now")]
    pub when: DateTime<Utc>,
    /// Which part of the run emitted the event.
    pub scope: StatusScope,
    /// Outcome marker.
    pub status: Status,
    /// Human-readable message intended for the audit consumer.
    pub message: String,
    /// Optional structured payload (e.g. truncated linter output).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl StatusEvent {
    /// Create an event with an explicit status.
    pub fn new(scope: StatusScope, status: Status, message: impl Into<String>) -> Self {
        Self {
            when: Utc::now(),
            scope,
            status,
            message: message.into(),
            details: None,
        }
    }

    /// Create a `pending` event (stage started).
    pub fn pending(scope: StatusScope, message: impl Into<String>) -> Self {
        Self::new(scope, Status::Pending, message)
    }

    /// Create a `success` event.
    pub fn success(scope: StatusScope, message: impl Into<String>) -> Self {
        Self::new(scope, Status::Success, message)
    }

    /// Create an `error` event.
    pub fn error(scope: StatusScope, message: impl Into<String>) -> Self {
        Self::new(scope, Status::Error, message)
    }

    /// Create a `warning` event.
    pub fn warning(scope: StatusScope, message: impl Into<String>) -> Self {
        Self::new(scope, Status::Warning, message)
    }

    /// Create an `info` event.
    pub fn info(scope: StatusScope, message: impl Into<String>) -> Self {
        Self::new(scope, Status::Info, message)
    }

    /// Attach a structured details payload.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}
