//! The compiled workflow graph and its barrier merge.
//!
//! [`App`] owns the static topology (nodes, edges, routers) plus the
//! reducer registry that defines how partial updates land in the shared
//! state. Execution itself lives in [`runner`](crate::runner); `App` keeps
//! the graph reusable across runs.

use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::instrument;

use crate::audit::StatusReporter;
use crate::graphs::ConditionalEdge;
use crate::node::{Node, NodePartial};
use crate::reducers::{ReducerError, ReducerRegistry};
use crate::runner::{self, RunnerError};
use crate::state::{ExecutionState, SlotUpdate};
use crate::status::StatusEvent;
use crate::types::{NodeKind, Platform};

/// An executable workflow graph.
///
/// Built by [`GraphBuilder::compile`](crate::graphs::GraphBuilder::compile).
/// Cloning is cheap (nodes are shared behind `Arc`), and one `App` may be
/// invoked any number of times; each run owns its own state.
#[derive(Clone)]
pub struct App {
    nodes: FxHashMap<NodeKind, Arc<dyn Node>>,
    edges: FxHashMap<NodeKind, Vec<NodeKind>>,
    conditional_edges: Vec<ConditionalEdge>,
    reducer_registry: ReducerRegistry,
    reporter: StatusReporter,
    concurrency_limit: usize,
}

/// Result of merging one superstep's partials into the state.
#[derive(Debug, Clone, Default)]
pub struct BarrierOutcome {
    /// How many status events were appended.
    pub appended_events: usize,
    /// Platforms whose slots were touched.
    pub updated_platforms: Vec<Platform>,
}

impl App {
    /// Internal factory used by graph compilation.
    pub(crate) fn from_parts(
        nodes: FxHashMap<NodeKind, Arc<dyn Node>>,
        edges: FxHashMap<NodeKind, Vec<NodeKind>>,
        conditional_edges: Vec<ConditionalEdge>,
        reporter: StatusReporter,
        concurrency_limit: Option<usize>,
    ) -> Self {
        let concurrency_limit = concurrency_limit.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        App {
            nodes,
            edges,
            conditional_edges,
            reducer_registry: ReducerRegistry::default(),
            reporter,
            concurrency_limit,
        }
    }

    /// The node registry.
    #[must_use]
    pub fn nodes(&self) -> &FxHashMap<NodeKind, Arc<dyn Node>> {
        &self.nodes
    }

    /// The unconditional edge map.
    #[must_use]
    pub fn edges(&self) -> &FxHashMap<NodeKind, Vec<NodeKind>> {
        &self.edges
    }

    /// The conditional edges.
    #[must_use]
    pub fn conditional_edges(&self) -> &[ConditionalEdge] {
        &self.conditional_edges
    }

    /// The conditional edge leaving `from`, if one was declared.
    #[must_use]
    pub fn router_for(&self, from: &NodeKind) -> Option<&ConditionalEdge> {
        self.conditional_edges
            .iter()
            .find(|edge| edge.from() == from)
    }

    /// The reporter cloned into every node context.
    #[must_use]
    pub fn reporter(&self) -> &StatusReporter {
        &self.reporter
    }

    /// Maximum nodes running concurrently within one superstep.
    #[must_use]
    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// Execute the workflow to completion.
    ///
    /// Runs supersteps until the frontier drains or only `End` remains.
    /// On `Ok` the returned state carries the complete status history; on
    /// `Err(RunnerError::NodeFailures)` the final state is embedded in the
    /// error, so the audit trail survives partial failure either way.
    ///
    /// A whole-run deadline, when desired, belongs to the caller: wrap
    /// this future in `tokio::time::timeout`. Nodes bound their own
    /// retries; the executor imposes no time limit.
    #[instrument(skip(self, initial_state), err)]
    pub async fn invoke(
        &self,
        initial_state: ExecutionState,
    ) -> Result<ExecutionState, RunnerError> {
        runner::run(self, initial_state).await
    }

    /// Merge node outputs at a superstep barrier.
    ///
    /// Partials are folded in the scheduling order of their producing
    /// nodes: status events concatenate (each branch's internal order is
    /// preserved), slot updates merge field-wise. Cross-branch interleaving
    /// follows scheduling order and is deliberately unspecified to
    /// callers.
    pub fn apply_barrier(
        &self,
        state: &mut ExecutionState,
        ran_nodes: &[NodeKind],
        partials: Vec<NodePartial>,
    ) -> Result<BarrierOutcome, ReducerError> {
        let mut events_all: Vec<StatusEvent> = Vec::new();
        let mut slots_all: FxHashMap<Platform, SlotUpdate> = FxHashMap::default();
        let mut updated_platforms: Vec<Platform> = Vec::new();

        for (i, partial) in partials.into_iter().enumerate() {
            let node = ran_nodes.get(i);

            if let Some(events) = partial.status
                && !events.is_empty()
            {
                tracing::debug!(?node, count = events.len(), "node appended status events");
                events_all.extend(events);
            }

            if let Some(slots) = partial.slots {
                for (platform, update) in slots {
                    if update.is_empty() {
                        continue;
                    }
                    tracing::debug!(?node, %platform, "node updated platform slot");
                    if !updated_platforms.contains(&platform) {
                        updated_platforms.push(platform);
                    }
                    // Each platform is written by its own branch only, so
                    // one barrier sees at most one update per platform;
                    // folding keeps later fields anyway for safety.
                    let merged = slots_all.entry(platform).or_default();
                    fold_slot_update(merged, update);
                }
            }
        }

        let appended_events = events_all.len();
        let merged_update = NodePartial {
            status: if events_all.is_empty() {
                None
            } else {
                Some(events_all)
            },
            slots: if slots_all.is_empty() {
                None
            } else {
                Some(slots_all)
            },
        };

        self.reducer_registry.apply_all(state, &merged_update)?;

        Ok(BarrierOutcome {
            appended_events,
            updated_platforms,
        })
    }
}

fn fold_slot_update(target: &mut SlotUpdate, incoming: SlotUpdate) {
    if incoming.docs.is_some() {
        target.docs = incoming.docs;
    }
    if incoming.code.is_some() {
        target.code = incoming.code;
    }
    if !incoming.lint_errors.is_keep() {
        target.lint_errors = incoming.lint_errors;
    }
    if incoming.retry_count.is_some() {
        target.retry_count = incoming.retry_count;
    }
}
