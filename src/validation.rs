//! Input validation: the single entry guard of the workflow.
//!
//! Validation runs before any side effect. An absent or empty design tree
//! appends a terminal error event and the gate router sends the run
//! straight to `End`; nothing downstream (context retrieval, pipelines)
//! executes.

use async_trait::async_trait;

use crate::graphs::EdgeRouter;
use crate::node::{Node, NodeContext, NodeError, NodePartial};
use crate::state::ExecutionState;
use crate::status::{StatusEvent, StatusScope};
use crate::types::NodeKind;

/// Returns `true` when the state carries no usable design tree.
fn design_tree_missing(state: &ExecutionState) -> bool {
    state.design_tree.as_ref().is_none_or(|tree| tree.is_empty())
}

/// Entry node checking that the design tree input is present.
pub struct ValidateInput;

#[async_trait]
impl Node for ValidateInput {
    async fn run(
        &self,
        snapshot: ExecutionState,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        let event = if design_tree_missing(&snapshot) {
            tracing::warn!(task_id = %snapshot.task_id, "design tree missing; run will stop");
            StatusEvent::error(StatusScope::Common, "Missing design tree data")
        } else {
            StatusEvent::success(StatusScope::Common, "Input validated successfully")
        };
        ctx.report(&event).await;
        Ok(NodePartial::new().with_status(vec![event]))
    }
}

/// Router for the gate's conditional edge: proceed to `next` on valid
/// input, `End` otherwise.
///
/// The decision is re-derived from the design tree itself: a pure,
/// deterministic function of the state, independent of whatever else may
/// have landed in the history.
pub fn validation_router(next: NodeKind) -> EdgeRouter {
    std::sync::Arc::new(move |state: &ExecutionState| {
        if design_tree_missing(state) {
            NodeKind::End
        } else {
            next.clone()
        }
    })
}
