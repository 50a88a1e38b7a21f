//! State merge policies applied at superstep barriers.
//!
//! Each channel of [`ExecutionState`](crate::state::ExecutionState) has
//! exactly one merge policy, declared once in the [`ReducerRegistry`]:
//!
//! - **status** ([`AppendStatus`]): list concatenation, never overwrite.
//! - **slots** ([`MergeSlots`]): field-wise replace per platform, with an
//!   explicit clear for lint errors.

mod append_status;
mod merge_slots;
mod registry;

pub use append_status::AppendStatus;
pub use merge_slots::MergeSlots;
pub use registry::ReducerRegistry;

use crate::node::NodePartial;
use crate::state::ExecutionState;
use crate::types::ChannelType;
use std::fmt;

/// A reducer mutates state using one channel of a merged [`NodePartial`].
pub trait Reducer: Send + Sync {
    fn apply(&self, state: &mut ExecutionState, update: &NodePartial);
}

/// Errors raised while applying reducers at a barrier.
#[derive(Debug)]
pub enum ReducerError {
    /// A partial carried data for a channel nothing is registered for.
    UnknownChannel(ChannelType),
}

impl fmt::Display for ReducerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReducerError::UnknownChannel(channel) => {
                write!(f, "no reducers registered for channel: {channel}")
            }
        }
    }
}

impl std::error::Error for ReducerError {}
