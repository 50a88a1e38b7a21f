//! The bounded self-correction router.
//!
//! Evaluated after every lint run, this is the sole loop-termination
//! guarantee in the system: a pure, total function that always picks one
//! of exactly two destinations. Hitting the retry ceiling with errors
//! still present is not a failure: it is the forced-publish path, marked
//! as such in the commit message and the status log by the push stage.

use std::sync::Arc;

use super::node_name;
use crate::graphs::EdgeRouter;
use crate::state::ExecutionState;
use crate::types::Platform;

/// Maximum fix attempts per platform before publishing anyway.
pub const MAX_ITERATIONS: u32 = 3;

/// Where the lint router sends the branch next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Errors present and attempts remain: ask the model to fix.
    Fix,
    /// Clean, or the ceiling is reached: publish.
    Push,
}

/// Decide the next stage from the lint outcome and attempt count.
///
/// `Fix` iff diagnostics are present *and* the counter is below
/// [`MAX_ITERATIONS`]; everything else, including "errors present but
/// ceiling reached", routes to `Push`.
#[must_use]
pub fn retry_decision(lint_errors: Option<&str>, retry_count: u32) -> RetryDecision {
    if lint_errors.is_some_and(|errors| !errors.is_empty()) && retry_count < MAX_ITERATIONS {
        RetryDecision::Fix
    } else {
        RetryDecision::Push
    }
}

/// The conditional-edge router for one platform's lint node.
#[must_use]
pub fn retry_router(platform: Platform) -> EdgeRouter {
    Arc::new(move |state: &ExecutionState| {
        let slot = state.slot(platform);
        match retry_decision(slot.lint_errors.as_deref(), slot.retry_count) {
            RetryDecision::Fix => node_name::fix(platform),
            RetryDecision::Push => node_name::push(platform),
        }
    })
}
