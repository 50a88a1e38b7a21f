//! Node execution primitives: the [`Node`] trait, its context, and the
//! sparse state updates nodes return.
//!
//! A node receives an owned snapshot of the current [`ExecutionState`] and
//! returns a [`NodePartial`] holding only the fields it wants changed. The
//! executor merges partials at the superstep barrier under the statically
//! declared per-channel policies (append for the status log, field-wise
//! replace for platform slots).
//!
//! # Error handling
//!
//! Two distinct paths, chosen per stage by design:
//!
//! 1. **Propagate** (`Err(NodeError)`): aborts this node's branch. Used by
//!    side-effecting setup and publish stages where continuing would
//!    operate on a broken workspace.
//! 2. **Swallow**: record a status event, leave the output field unset,
//!    return `Ok`. Used by tool-invocation stages (generate, lint, fix,
//!    context fetch) where the loop or downstream stages can degrade
//!    gracefully.

use async_trait::async_trait;
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::audit::StatusReporter;
use crate::clients::ModelError;
use crate::state::{ExecutionState, SlotUpdate};
use crate::status::StatusEvent;
use crate::types::Platform;
use crate::workspace::WorkspaceError;

/// An executable unit of work in the workflow graph.
#[async_trait]
pub trait Node: Send + Sync {
    /// Execute against a state snapshot, returning a sparse update.
    async fn run(
        &self,
        snapshot: ExecutionState,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError>;
}

/// Execution context handed to a node for one invocation.
#[derive(Clone, Debug)]
pub struct NodeContext {
    /// Graph name of the executing node.
    pub node_id: String,
    /// Superstep number, starting at 1.
    pub step: u64,
    /// Handle for forwarding status events to the audit sink.
    pub reporter: StatusReporter,
}

impl NodeContext {
    /// Forward a status event to the audit sink.
    ///
    /// Fire-and-forget: sink failures are logged by the reporter and never
    /// surface here. The event still belongs in the node's returned
    /// partial so it reaches the run history.
    pub async fn report(&self, event: &StatusEvent) {
        self.reporter.report(event).await;
    }
}

/// Sparse state update returned by a node.
///
/// # Examples
///
/// ```rust
/// use uiforge::node::NodePartial;
/// use uiforge::state::SlotUpdate;
/// use uiforge::status::{StatusEvent, StatusScope};
/// use uiforge::types::Platform;
///
/// let partial = NodePartial::new()
///     .with_status(vec![StatusEvent::success(StatusScope::Web, "code written")])
///     .with_slot(Platform::Web, SlotUpdate::new().code("export default ..."));
/// # let _ = partial;
/// ```
#[derive(Clone, Debug, Default)]
pub struct NodePartial {
    /// Events to append to the run's status history.
    pub status: Option<Vec<StatusEvent>>,
    /// Per-platform slot updates to merge field-wise.
    pub slots: Option<FxHashMap<Platform, SlotUpdate>>,
}

impl NodePartial {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the events to append.
    #[must_use]
    pub fn with_status(mut self, events: Vec<StatusEvent>) -> Self {
        self.status = Some(events);
        self
    }

    /// Add one slot update for a platform.
    #[must_use]
    pub fn with_slot(mut self, platform: Platform, update: SlotUpdate) -> Self {
        self.slots
            .get_or_insert_with(FxHashMap::default)
            .insert(platform, update);
        self
    }
}

/// Fatal errors that abort a node's branch.
///
/// Recoverable conditions are not errors here: they become status events
/// inside an `Ok` partial.
#[derive(Debug, Error, Diagnostic)]
pub enum NodeError {
    /// Expected input data is missing from the state snapshot.
    #[error("missing expected input: {what}")]
    #[diagnostic(
        code(uiforge::node::missing_input),
        help("Check that the upstream node produced the required data.")
    )]
    MissingInput { what: &'static str },

    /// Workspace operation failed in a stage that must not continue.
    #[error(transparent)]
    #[diagnostic(code(uiforge::node::workspace))]
    Workspace(#[from] WorkspaceError),

    /// Model invocation failed in a context with no degraded path.
    #[error(transparent)]
    #[diagnostic(code(uiforge::node::model))]
    Model(#[from] ModelError),

    /// JSON (de)serialization failed.
    #[error(transparent)]
    #[diagnostic(code(uiforge::node::serde_json))]
    Serde(#[from] serde_json::Error),

    /// The spawned node task could not be joined (panicked or aborted).
    #[error("node task failed to join: {message}")]
    #[diagnostic(code(uiforge::node::join))]
    Join { message: String },
}
