//! Conditional edges and their routing functions.

use crate::state::ExecutionState;
use crate::types::NodeKind;
use std::sync::Arc;

/// Routing function for a conditional edge.
///
/// Evaluated after its source node runs, against the freshly merged state.
/// Must be deterministic given the same state and total: it always returns
/// exactly one destination (possibly [`NodeKind::End`]).
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use uiforge::graphs::EdgeRouter;
/// use uiforge::types::{NodeKind, Platform};
///
/// let router: EdgeRouter = Arc::new(|state| {
///     if state.slot(Platform::Web).lint_errors.is_some() {
///         NodeKind::custom("fix_web")
///     } else {
///         NodeKind::custom("push_web")
///     }
/// });
/// # let _ = router;
/// ```
pub type EdgeRouter = Arc<dyn Fn(&ExecutionState) -> NodeKind + Send + Sync + 'static>;

/// A guarded edge: routing from `from` is decided by `router` at runtime.
///
/// A node with a conditional edge routes exclusively through it; its
/// unconditional edges (if any) are ignored. One conditional edge per
/// source node; compilation rejects duplicates.
#[derive(Clone)]
pub struct ConditionalEdge {
    from: NodeKind,
    router: EdgeRouter,
}

impl ConditionalEdge {
    pub fn new(from: impl Into<NodeKind>, router: EdgeRouter) -> Self {
        Self {
            from: from.into(),
            router,
        }
    }

    /// The source node of this edge.
    pub fn from(&self) -> &NodeKind {
        &self.from
    }

    /// The routing function.
    pub fn router(&self) -> &EdgeRouter {
        &self.router
    }
}
