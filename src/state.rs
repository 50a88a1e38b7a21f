//! Execution state threaded through the workflow graph.
//!
//! [`ExecutionState`] is the single record every node reads and every
//! barrier merge writes. Immutable inputs (task id, component name, user
//! instructions, design tree) are set once at construction; mutable data
//! is confined to the append-only status history and the per-platform
//! [`PlatformSlot`]s.
//!
//! Nodes never mutate state directly: they receive a cloned snapshot and
//! return a sparse [`NodePartial`](crate::node::NodePartial) whose
//! [`SlotUpdate`]s are merged under the statically declared per-field
//! policies (replace for scalars, append for the status log, explicit
//! [`Patch::Clear`] for the one field that must be clearable).
//!
//! # Examples
//!
//! ```rust
//! use uiforge::state::ExecutionState;
//! use uiforge::types::Platform;
//!
//! let state = ExecutionState::builder()
//!     .with_task_id("3f2a9c1d-0000-0000-0000-000000000000")
//!     .with_component_name("HeroBanner")
//!     .with_user_instructions("Keep it compact")
//!     .build();
//!
//! assert_eq!(state.scoped_component_name(), "HeroBanner-3f2a9c1d");
//! assert_eq!(state.branch_name(), "codegen/HeroBanner-3f2a9c1d");
//! assert_eq!(state.slot(Platform::Web).retry_count, 0);
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::design::DesignNode;
use crate::status::StatusEvent;
use crate::types::Platform;

/// Number of task-id characters folded into branch and file names.
const TASK_ID_PREFIX_LEN: usize = 8;

static EMPTY_SLOT: PlatformSlot = PlatformSlot {
    docs: None,
    code: None,
    lint_errors: None,
    retry_count: 0,
};

/// Per-platform mutable state owned by one pipeline branch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformSlot {
    /// Retrieved documentation context, if a source produced any.
    pub docs: Option<String>,
    /// Latest code candidate. After a clean lint pass this holds the
    /// linter's own (possibly reformatted) output.
    pub code: Option<String>,
    /// Outstanding linter diagnostics; `None` is the clean state.
    pub lint_errors: Option<String>,
    /// Fix-loop attempt counter; reset to 0 exactly once at prepare.
    pub retry_count: u32,
}

/// The state record for one workflow run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionState {
    /// Correlation id, stable for the run's lifetime.
    pub task_id: String,
    /// Name of the component being generated.
    pub component_name: String,
    /// Optional free-form instructions from the requesting user.
    pub user_instructions: Option<String>,
    /// The design-tool input document.
    pub design_tree: Option<DesignNode>,
    /// Append-only, chronologically ordered audit trail.
    pub status_history: Vec<StatusEvent>,
    /// Per-platform branch state, keyed structurally.
    pub slots: FxHashMap<Platform, PlatformSlot>,
}

impl ExecutionState {
    /// Start building a state record.
    #[must_use]
    pub fn builder() -> ExecutionStateBuilder {
        ExecutionStateBuilder::default()
    }

    /// Read access to a platform's slot.
    ///
    /// Unknown platforms resolve to an empty slot so readers never need to
    /// distinguish "not configured" from "nothing produced yet".
    #[must_use]
    pub fn slot(&self, platform: Platform) -> &PlatformSlot {
        self.slots.get(&platform).unwrap_or(&EMPTY_SLOT)
    }

    /// Mutable access to a platform's slot, creating it on first touch.
    pub fn slot_mut(&mut self, platform: Platform) -> &mut PlatformSlot {
        self.slots.entry(platform).or_default()
    }

    /// Component name suffixed with a short task-id prefix, shared by the
    /// generated file path, the branch name, and the commit message.
    #[must_use]
    pub fn scoped_component_name(&self) -> String {
        let prefix: String = self.task_id.chars().take(TASK_ID_PREFIX_LEN).collect();
        format!("{}-{prefix}", self.component_name)
    }

    /// Deterministic branch name for this run: `codegen/<name>-<task8>`.
    ///
    /// Used identically by prepare and push; the branch is agent-owned and
    /// force-pushed, so collisions across retries of the same task are
    /// intentional.
    #[must_use]
    pub fn branch_name(&self) -> String {
        format!("codegen/{}", self.scoped_component_name())
    }

    /// The most recent status event, if any.
    #[must_use]
    pub fn last_event(&self) -> Option<&StatusEvent> {
        self.status_history.last()
    }
}

/// Fluent builder for [`ExecutionState`].
#[derive(Debug, Default)]
pub struct ExecutionStateBuilder {
    task_id: Option<String>,
    component_name: Option<String>,
    user_instructions: Option<String>,
    design_tree: Option<DesignNode>,
}

impl ExecutionStateBuilder {
    /// Set the correlation id. A v4 UUID is generated when absent.
    #[must_use]
    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Set the component name (defaults to `"component"`).
    #[must_use]
    pub fn with_component_name(mut self, name: impl Into<String>) -> Self {
        self.component_name = Some(name.into());
        self
    }

    /// Attach free-form user instructions.
    #[must_use]
    pub fn with_user_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.user_instructions = Some(instructions.into());
        self
    }

    /// Attach the design tree input.
    #[must_use]
    pub fn with_design_tree(mut self, tree: DesignNode) -> Self {
        self.design_tree = Some(tree);
        self
    }

    /// Finalize the state, initializing an empty slot per known platform.
    #[must_use]
    pub fn build(self) -> ExecutionState {
        let mut slots = FxHashMap::default();
        for platform in Platform::ALL {
            slots.insert(platform, PlatformSlot::default());
        }
        ExecutionState {
            task_id: self
                .task_id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            component_name: self
                .component_name
                .unwrap_or_else(|| "component".to_string()),
            user_instructions: self.user_instructions,
            design_tree: self.design_tree,
            status_history: Vec::new(),
            slots,
        }
    }
}

/// Three-way patch for an optional field.
///
/// `Option<T>` in a sparse update cannot distinguish "leave alone" from
/// "reset to absent"; lint errors need both (a clean lint pass must clear
/// them). `Patch` makes the intent explicit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the current value untouched.
    #[default]
    Keep,
    /// Replace the current value.
    Assign(T),
    /// Reset the field to absent.
    Clear,
}

impl<T> Patch<T> {
    /// Apply this patch to a target field.
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Assign(value) => *target = Some(value),
            Patch::Clear => *target = None,
        }
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }
}

/// Sparse update to one platform's slot, produced by a node.
///
/// Every populated field replaces its counterpart; `lint_errors` uses
/// [`Patch`] so a node can also clear it.
#[derive(Clone, Debug, Default)]
pub struct SlotUpdate {
    pub docs: Option<String>,
    pub code: Option<String>,
    pub lint_errors: Patch<String>,
    pub retry_count: Option<u32>,
}

impl SlotUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the retrieved documentation.
    #[must_use]
    pub fn docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }

    /// Replace the code candidate.
    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Record linter diagnostics.
    #[must_use]
    pub fn lint_errors(mut self, errors: impl Into<String>) -> Self {
        self.lint_errors = Patch::Assign(errors.into());
        self
    }

    /// Clear linter diagnostics (the clean-lint path).
    #[must_use]
    pub fn clear_lint_errors(mut self) -> Self {
        self.lint_errors = Patch::Clear;
        self
    }

    /// Replace the retry counter.
    #[must_use]
    pub fn retry_count(mut self, count: u32) -> Self {
        self.retry_count = Some(count);
        self
    }

    /// Returns `true` when the update carries no changes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_none()
            && self.code.is_none()
            && self.lint_errors.is_keep()
            && self.retry_count.is_none()
    }

    /// Merge this update into a slot, field by field.
    pub fn apply_to(self, slot: &mut PlatformSlot) {
        if let Some(docs) = self.docs {
            slot.docs = Some(docs);
        }
        if let Some(code) = self.code {
            slot.code = Some(code);
        }
        self.lint_errors.apply_to(&mut slot.lint_errors);
        if let Some(count) = self.retry_count {
            slot.retry_count = count;
        }
    }
}
