use super::Reducer;
use crate::node::NodePartial;
use crate::state::ExecutionState;

/// Appends status events to the run history.
///
/// The history is append-only: events from one barrier keep the relative
/// order their producing node emitted them in, and nothing already in the
/// history is ever dropped or reordered.
#[derive(Debug, PartialEq, Clone, Hash, Eq)]
pub struct AppendStatus;

impl Reducer for AppendStatus {
    fn apply(&self, state: &mut ExecutionState, update: &NodePartial) {
        if let Some(events) = &update.status
            && !events.is_empty()
        {
            state.status_history.extend(events.iter().cloned());
        }
    }
}
