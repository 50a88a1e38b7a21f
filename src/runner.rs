//! Superstep execution of a compiled workflow graph.
//!
//! Execution proceeds in supersteps: every executable node in the current
//! frontier runs concurrently against the same state snapshot, the barrier
//! merges their partial updates, and the next frontier is computed from
//! unconditional edges and conditional routers. The loop ends when the
//! frontier drains or only the virtual `End` node remains.
//!
//! # Failure isolation
//!
//! A node returning `Err` aborts only its own branch: its successors are
//! not scheduled, concurrently running siblings are never cancelled, and
//! the run keeps going until every live branch finishes. Failures are
//! recorded as system-scoped status events and collected into
//! [`RunnerError::NodeFailures`], which carries the final state, so the
//! audit trail survives partial failure.
//!
//! Cycles are legal and unbounded here: the lint → fix → write → lint loop
//! revisits the same node names as often as its router decides, and the
//! executor holds no per-visit resources beyond the spawned task.

use miette::Diagnostic;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::instrument;

use crate::app::App;
use crate::node::{NodeContext, NodeError, NodePartial};
use crate::reducers::ReducerError;
use crate::state::ExecutionState;
use crate::status::{StatusEvent, StatusScope};
use crate::types::NodeKind;

/// One node's fatal failure during a run.
#[derive(Debug)]
pub struct NodeFailure {
    /// The node that failed.
    pub node: NodeKind,
    /// Superstep in which it failed.
    pub step: u64,
    /// The propagated error.
    pub error: NodeError,
}

/// Errors surfaced by a full workflow run.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The graph has no executable entry (empty Start frontier).
    #[error("no nodes to run from Start (empty frontier)")]
    #[diagnostic(
        code(uiforge::runner::no_start_nodes),
        help("Add edges from NodeKind::Start or check the entry router.")
    )]
    NoStartNodes,

    /// A reducer rejected a barrier merge.
    #[error(transparent)]
    #[diagnostic(code(uiforge::runner::reducer))]
    Reducer(#[from] ReducerError),

    /// One or more branches aborted. The final state, including the
    /// complete status history and any surviving branches' output, rides
    /// along.
    #[error("{} branch(es) failed during the run", .failures.len())]
    #[diagnostic(
        code(uiforge::runner::node_failures),
        help("Inspect `failures` for per-node errors and `state` for the audit trail.")
    )]
    NodeFailures {
        failures: Vec<NodeFailure>,
        state: Box<ExecutionState>,
    },
}

impl RunnerError {
    /// The final state, when this error carries one.
    #[must_use]
    pub fn state(&self) -> Option<&ExecutionState> {
        match self {
            RunnerError::NodeFailures { state, .. } => Some(state),
            _ => None,
        }
    }
}

/// Drive a compiled graph to completion.
#[instrument(skip(app, initial_state), fields(concurrency = app.concurrency_limit()), err)]
pub(crate) async fn run(
    app: &App,
    initial_state: ExecutionState,
) -> Result<ExecutionState, RunnerError> {
    let mut state = initial_state;
    let mut frontier = next_targets(app, &state, &NodeKind::Start, 0);
    if frontier.is_empty() {
        return Err(RunnerError::NoStartNodes);
    }

    let mut failures: Vec<NodeFailure> = Vec::new();
    let mut step: u64 = 0;

    loop {
        let runnable: Vec<NodeKind> = frontier
            .iter()
            .filter(|kind| kind.is_custom())
            .cloned()
            .collect();
        if runnable.is_empty() {
            break;
        }
        step += 1;
        tracing::debug!(step, frontier = ?runnable, "starting superstep");

        let outputs = superstep(app, &state, &runnable, step).await;

        let mut ran_ok: Vec<NodeKind> = Vec::new();
        let mut partials: Vec<NodePartial> = Vec::new();
        let mut failed_events: Vec<StatusEvent> = Vec::new();

        for (kind, result) in outputs {
            match result {
                Ok(partial) => {
                    ran_ok.push(kind);
                    partials.push(partial);
                }
                Err(error) => {
                    tracing::error!(node = %kind, step, error = %error, "node failed; aborting its branch");
                    let event = StatusEvent::error(
                        StatusScope::System,
                        format!("node '{kind}' failed: {error}"),
                    )
                    .with_details(serde_json::json!({
                        "node": kind.to_string(),
                        "step": step,
                    }));
                    app.reporter().report(&event).await;
                    failed_events.push(event);
                    failures.push(NodeFailure {
                        node: kind,
                        step,
                        error,
                    });
                }
            }
        }

        let outcome = app.apply_barrier(&mut state, &ran_ok, partials)?;
        state.status_history.extend(failed_events);
        tracing::debug!(
            step,
            appended_events = outcome.appended_events,
            updated_platforms = ?outcome.updated_platforms,
            "barrier applied"
        );

        // Failed nodes contribute no successors: their branch ends here.
        let mut next: Vec<NodeKind> = Vec::new();
        for kind in &ran_ok {
            for target in next_targets(app, &state, kind, step) {
                if !next.contains(&target) {
                    next.push(target);
                }
            }
        }
        tracing::debug!(step, next_frontier = ?next, "computed next frontier");
        frontier = next;
    }

    if failures.is_empty() {
        tracing::info!(steps = step, "workflow run completed");
        Ok(state)
    } else {
        tracing::warn!(
            steps = step,
            failed = failures.len(),
            "workflow run completed with failed branches"
        );
        Err(RunnerError::NodeFailures {
            failures,
            state: Box::new(state),
        })
    }
}

/// Run every frontier node concurrently and join them all.
///
/// Nodes are spawned as independent tasks gated by the app's concurrency
/// limit; results come back in frontier order. A node's failure never
/// cancels its siblings; the barrier waits for everyone.
async fn superstep(
    app: &App,
    state: &ExecutionState,
    runnable: &[NodeKind],
    step: u64,
) -> Vec<(NodeKind, Result<NodePartial, NodeError>)> {
    let semaphore = Arc::new(Semaphore::new(app.concurrency_limit()));
    let mut handles = Vec::with_capacity(runnable.len());

    for kind in runnable {
        let Some(node) = app.nodes().get(kind).cloned() else {
            // Compilation validates static edges; only a router can name
            // an unknown node, and that is caught in next_targets.
            tracing::warn!(node = %kind, step, "frontier node not registered; skipping");
            continue;
        };
        let snapshot = state.clone();
        let ctx = NodeContext {
            node_id: kind.to_string(),
            step,
            reporter: app.reporter().clone(),
        };
        let permits = semaphore.clone();
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await.map_err(|_| NodeError::Join {
                message: "scheduler semaphore closed".to_string(),
            })?;
            node.run(snapshot, ctx).await
        });
        handles.push((kind.clone(), handle));
    }

    let mut outputs = Vec::with_capacity(handles.len());
    for (kind, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(join_error) => Err(NodeError::Join {
                message: join_error.to_string(),
            }),
        };
        outputs.push((kind, result));
    }
    outputs
}

/// Successors of `from` given the current state.
///
/// A conditional edge, when present, decides exclusively; otherwise the
/// unconditional edges apply. Unknown destinations named by a router are
/// skipped with a warning so a typo degrades the branch instead of
/// wedging the run.
fn next_targets(app: &App, state: &ExecutionState, from: &NodeKind, step: u64) -> Vec<NodeKind> {
    let targets: Vec<NodeKind> = if let Some(edge) = app.router_for(from) {
        let target = (edge.router())(state);
        tracing::debug!(from = %from, target = %target, step, "conditional edge routed");
        vec![target]
    } else {
        app.edges().get(from).cloned().unwrap_or_default()
    };

    targets
        .into_iter()
        .filter(|target| {
            let valid = match target {
                NodeKind::Start | NodeKind::End => true,
                NodeKind::Custom(_) => app.nodes().contains_key(target),
            };
            if !valid {
                tracing::warn!(
                    from = %from,
                    target = %target,
                    step,
                    "frontier target not found; skipping"
                );
            }
            valid
        })
        .collect()
}
