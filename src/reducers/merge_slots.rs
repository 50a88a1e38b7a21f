use super::Reducer;
use crate::node::NodePartial;
use crate::state::ExecutionState;

/// Merges per-platform slot updates field by field.
///
/// Populated fields replace their counterparts; `lint_errors` honors the
/// explicit `Patch` so the clean-lint path can reset it to absent. Each
/// platform's slot is only ever written by that platform's own branch, so
/// updates for different platforms in one barrier never conflict.
#[derive(Debug, PartialEq, Clone, Hash, Eq)]
pub struct MergeSlots;

impl Reducer for MergeSlots {
    fn apply(&self, state: &mut ExecutionState, update: &NodePartial) {
        if let Some(slots) = &update.slots {
            for (platform, slot_update) in slots {
                if slot_update.is_empty() {
                    continue;
                }
                slot_update.clone().apply_to(state.slot_mut(*platform));
            }
        }
    }
}
