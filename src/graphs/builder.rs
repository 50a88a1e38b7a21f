//! Fluent construction of workflow graphs.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use super::edges::{ConditionalEdge, EdgeRouter};
use crate::audit::StatusReporter;
use crate::node::Node;
use crate::types::NodeKind;

/// Builder for workflow graphs.
///
/// Every graph needs at least one executable node, an edge out of
/// [`NodeKind::Start`], and a path to [`NodeKind::End`]. `Start`/`End` are
/// virtual endpoints: they are never registered or executed, they only
/// anchor the topology.
///
/// # Examples
///
/// ```rust
/// use uiforge::graphs::GraphBuilder;
/// use uiforge::types::NodeKind;
/// use uiforge::node::{Node, NodeContext, NodeError, NodePartial};
/// use uiforge::state::ExecutionState;
/// use async_trait::async_trait;
///
/// struct Noop;
///
/// #[async_trait]
/// impl Node for Noop {
///     async fn run(&self, _: ExecutionState, _: NodeContext) -> Result<NodePartial, NodeError> {
///         Ok(NodePartial::default())
///     }
/// }
///
/// let app = GraphBuilder::new()
///     .add_node(NodeKind::custom("work"), Noop)
///     .add_edge(NodeKind::Start, NodeKind::custom("work"))
///     .add_edge(NodeKind::custom("work"), NodeKind::End)
///     .compile()
///     .unwrap();
/// # let _ = app;
/// ```
pub struct GraphBuilder {
    pub(crate) nodes: FxHashMap<NodeKind, Arc<dyn Node>>,
    pub(crate) edges: FxHashMap<NodeKind, Vec<NodeKind>>,
    pub(crate) conditional_edges: Vec<ConditionalEdge>,
    pub(crate) reporter: StatusReporter,
    pub(crate) concurrency_limit: Option<usize>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: FxHashMap::default(),
            edges: FxHashMap::default(),
            conditional_edges: Vec::new(),
            reporter: StatusReporter::disabled(),
            concurrency_limit: None,
        }
    }

    /// Register an executable node under a unique identifier.
    ///
    /// Registering the virtual `Start`/`End` kinds is ignored with a
    /// warning; they exist only for topology.
    #[must_use]
    pub fn add_node(mut self, id: NodeKind, node: impl Node + 'static) -> Self {
        match id {
            NodeKind::Start | NodeKind::End => {
                tracing::warn!(?id, "ignoring registration of virtual node kind");
            }
            _ => {
                self.nodes.insert(id, Arc::new(node));
            }
        }
        self
    }

    /// Add an unconditional edge. Multiple edges from the same node fan
    /// out; multiple edges into the same node fan in (the executor joins
    /// them at the superstep barrier).
    #[must_use]
    pub fn add_edge(mut self, from: NodeKind, to: NodeKind) -> Self {
        self.edges.entry(from).or_default().push(to);
        self
    }

    /// Add a conditional edge whose router picks the destination at
    /// runtime. At most one per source node.
    #[must_use]
    pub fn add_conditional_edge(mut self, from: NodeKind, router: EdgeRouter) -> Self {
        self.conditional_edges
            .push(ConditionalEdge::new(from, router));
        self
    }

    /// Attach the status reporter handed to every node context.
    #[must_use]
    pub fn with_reporter(mut self, reporter: StatusReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Cap the number of nodes executing concurrently within one
    /// superstep. Defaults to available parallelism.
    #[must_use]
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = Some(limit.max(1));
        self
    }
}
