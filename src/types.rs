//! Core identifier types for the workflow graph.
//!
//! [`NodeKind`] names the steps of a workflow graph, with virtual
//! `Start`/`End` endpoints that exist only for topology. [`Platform`]
//! is the closed set of code-generation targets; every per-platform
//! piece of state is keyed by it (never by a constructed string).
//! [`ChannelType`] identifies the state channels the reducer registry
//! merges at each barrier.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::status::StatusScope;

/// Identifies a node within a workflow graph.
///
/// `Start` and `End` are virtual: they have no implementation, are never
/// executed, and exist only so edges can express entry points and
/// termination. All executable nodes are `Custom` with a unique name.
///
/// # Examples
///
/// ```rust
/// use uiforge::types::NodeKind;
///
/// let lint = NodeKind::custom("lint_web");
/// assert!(lint.is_custom());
/// assert_eq!(lint.to_string(), "lint_web");
/// assert_eq!(NodeKind::from("End"), NodeKind::End);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Virtual entry point; the first edge of every graph starts here.
    Start,
    /// Virtual terminal; routing here completes a branch.
    End,
    /// Executable node identified by a user-defined name.
    Custom(String),
}

impl NodeKind {
    /// Convenience constructor for custom nodes.
    pub fn custom(name: impl Into<String>) -> Self {
        NodeKind::Custom(name.into())
    }

    /// Returns `true` if this is the virtual [`Start`](Self::Start) node.
    #[must_use]
    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start)
    }

    /// Returns `true` if this is the virtual [`End`](Self::End) node.
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    /// Returns `true` if this is an executable custom node.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::End => write!(f, "End"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

// Developer experience: allow string literals where a NodeKind is expected.
impl From<&str> for NodeKind {
    fn from(s: &str) -> Self {
        match s {
            "Start" => NodeKind::Start,
            "End" => NodeKind::End,
            other => NodeKind::Custom(other.to_string()),
        }
    }
}

/// A code-generation target platform.
///
/// The set is closed on purpose: per-platform state lives in a map keyed
/// by this enum, so a typo in a platform name is a compile error rather
/// than a silently empty state field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Web,
    Mobile,
}

impl Platform {
    /// All known platforms, in declaration order.
    pub const ALL: [Platform; 2] = [Platform::Web, Platform::Mobile];

    /// Lowercase identifier used in node names and branch scopes.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Web => "web",
            Platform::Mobile => "mobile",
        }
    }

    /// Capitalized form for human-facing status messages.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Platform::Web => "Web",
            Platform::Mobile => "Mobile",
        }
    }

    /// The status scope events from this platform's branch carry.
    #[must_use]
    pub fn scope(&self) -> StatusScope {
        match self {
            Platform::Web => StatusScope::Web,
            Platform::Mobile => StatusScope::Mobile,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a state channel for reducer registration.
///
/// Each channel has exactly one merge policy, declared once in the
/// [`ReducerRegistry`](crate::reducers::ReducerRegistry): the status log
/// appends, the platform slots replace field-wise.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChannelType {
    /// The append-only status event log.
    Status,
    /// The per-platform slot map (docs, code, lint errors, retry counter).
    Slots,
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status => write!(f, "status"),
            Self::Slots => write!(f, "slots"),
        }
    }
}
