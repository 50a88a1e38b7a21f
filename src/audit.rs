//! Audit sink plumbing: fire-and-forget forwarding of status events.
//!
//! Every [`StatusEvent`] a node creates is forwarded to the configured
//! [`AuditSink`] at the moment of creation, in addition to being merged
//! into the run's own history at the barrier. Sink failure is logged
//! locally and never propagated back into the run; the audit trail is an
//! observer, not a participant.
//!
//! Shipped sinks cover the common cases: [`MemorySink`] for tests and
//! inspection, [`ChannelSink`] for streaming consumers, [`LogSink`] for
//! plain tracing output. A durable key-value store with TTL (what the
//! production service uses) is one more implementation of the same trait.

use async_trait::async_trait;
use miette::Diagnostic;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::status::StatusEvent;

/// Destination for status events, keyed by task id.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one event to the task's audit trail.
    async fn append(&self, task_id: &str, event: &StatusEvent) -> Result<(), AuditError>;
}

/// Errors an audit sink may surface. The reporter swallows them.
#[derive(Debug, Error, Diagnostic)]
pub enum AuditError {
    /// The sink's backing store is unreachable or rejected the write.
    #[error("audit sink unavailable: {message}")]
    #[diagnostic(code(uiforge::audit::unavailable))]
    Unavailable { message: String },

    /// The event could not be serialized for the sink.
    #[error(transparent)]
    #[diagnostic(code(uiforge::audit::serde))]
    Serde(#[from] serde_json::Error),
}

/// Per-task handle that forwards events to a sink.
///
/// Cloneable and cheap; the runner hands one to every node through its
/// context. A disabled reporter (no sink) drops events silently, which is
/// what unit tests of individual nodes usually want.
#[derive(Clone)]
pub struct StatusReporter {
    task_id: Arc<str>,
    sink: Option<Arc<dyn AuditSink>>,
}

impl StatusReporter {
    /// Create a reporter bound to a task id and sink.
    pub fn new(task_id: impl Into<String>, sink: Arc<dyn AuditSink>) -> Self {
        Self {
            task_id: task_id.into().into(),
            sink: Some(sink),
        }
    }

    /// A reporter that discards everything.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            task_id: Arc::from(""),
            sink: None,
        }
    }

    /// The task id this reporter writes under.
    #[must_use]
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Forward one event. Sink failure is logged and swallowed.
    pub async fn report(&self, event: &StatusEvent) {
        let Some(sink) = &self.sink else { return };
        if let Err(err) = sink.append(&self.task_id, event).await {
            tracing::warn!(
                task_id = %self.task_id,
                scope = %event.scope,
                error = %err,
                "audit sink append failed; event kept only in run history"
            );
        }
    }
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusReporter")
            .field("task_id", &self.task_id)
            .field("enabled", &self.sink.is_some())
            .finish()
    }
}

/// In-memory sink for tests and snapshots.
#[derive(Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<(String, StatusEvent)>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured `(task_id, event)` pairs, in append order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, StatusEvent)> {
        self.entries.lock().clone()
    }

    /// Events only, discarding task ids.
    #[must_use]
    pub fn events(&self) -> Vec<StatusEvent> {
        self.entries
            .lock()
            .iter()
            .map(|(_, event)| event.clone())
            .collect()
    }

    /// Drop all captured events.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[async_trait]
impl AuditSink for MemorySink {
    async fn append(&self, task_id: &str, event: &StatusEvent) -> Result<(), AuditError> {
        self.entries
            .lock()
            .push((task_id.to_string(), event.clone()));
        Ok(())
    }
}

/// Channel-based sink for streaming events to async consumers.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use uiforge::audit::{AuditSink, ChannelSink, StatusReporter};
///
/// let (tx, rx) = flume::unbounded();
/// let reporter = StatusReporter::new("task-1", Arc::new(ChannelSink::new(tx)));
///
/// // A consumer drains `rx` while the workflow runs.
/// # drop(reporter);
/// # drop(rx);
/// ```
pub struct ChannelSink {
    tx: flume::Sender<StatusEvent>,
}

impl ChannelSink {
    #[must_use]
    pub fn new(tx: flume::Sender<StatusEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl AuditSink for ChannelSink {
    async fn append(&self, _task_id: &str, event: &StatusEvent) -> Result<(), AuditError> {
        self.tx
            .send(event.clone())
            .map_err(|_| AuditError::Unavailable {
                message: "channel receiver dropped".to_string(),
            })
    }
}

/// Sink that renders events through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

#[async_trait]
impl AuditSink for LogSink {
    async fn append(&self, task_id: &str, event: &StatusEvent) -> Result<(), AuditError> {
        tracing::info!(
            task_id,
            scope = %event.scope,
            status = %event.status,
            message = %event.message,
            "status event"
        );
        Ok(())
    }
}
