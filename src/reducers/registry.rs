use rustc_hash::FxHashMap;
use std::sync::Arc;

use super::{AppendStatus, MergeSlots, Reducer, ReducerError};
use crate::node::NodePartial;
use crate::state::ExecutionState;
use crate::types::ChannelType;

/// Static declaration of merge policies, one entry per channel.
#[derive(Clone)]
pub struct ReducerRegistry {
    reducer_map: FxHashMap<ChannelType, Vec<Arc<dyn Reducer>>>,
}

/// Checks whether a partial carries meaningful data for a channel, so the
/// registry can skip reducers with nothing to do.
fn channel_guard(channel: &ChannelType, partial: &NodePartial) -> bool {
    match channel {
        ChannelType::Status => partial
            .status
            .as_ref()
            .map(|events| !events.is_empty())
            .unwrap_or(false),
        ChannelType::Slots => partial
            .slots
            .as_ref()
            .map(|slots| slots.values().any(|update| !update.is_empty()))
            .unwrap_or(false),
    }
}

impl Default for ReducerRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry
            .register(ChannelType::Status, Arc::new(AppendStatus))
            .register(ChannelType::Slots, Arc::new(MergeSlots));
        registry
    }
}

impl ReducerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reducer_map: FxHashMap::default(),
        }
    }

    /// Register a reducer for a channel. Multiple reducers on the same
    /// channel run in registration order.
    pub fn register(&mut self, channel: ChannelType, reducer: Arc<dyn Reducer>) -> &mut Self {
        self.reducer_map.entry(channel).or_default().push(reducer);
        self
    }

    /// Apply one channel's reducers to the state.
    pub fn try_update(
        &self,
        channel: ChannelType,
        state: &mut ExecutionState,
        update: &NodePartial,
    ) -> Result<(), ReducerError> {
        if !channel_guard(&channel, update) {
            return Ok(());
        }

        if let Some(reducers) = self.reducer_map.get(&channel) {
            for reducer in reducers {
                reducer.apply(state, update);
            }
            Ok(())
        } else {
            Err(ReducerError::UnknownChannel(channel))
        }
    }

    /// Apply every registered channel; guards skip channels with no data.
    pub fn apply_all(
        &self,
        state: &mut ExecutionState,
        merged_update: &NodePartial,
    ) -> Result<(), ReducerError> {
        for channel in self.reducer_map.keys() {
            self.try_update(channel.clone(), state, merged_update)?;
        }
        Ok(())
    }
}
