//! Graph validation and compilation into an executable [`App`].

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::app::App;
use crate::types::NodeKind;

/// Structural errors detected at compile time.
#[derive(Debug, Error, Diagnostic)]
pub enum CompileError {
    /// No edge (unconditional or conditional) leaves `Start`.
    #[error("graph has no entry: no edge leaves Start")]
    #[diagnostic(
        code(uiforge::graphs::missing_entry),
        help("Add an edge from NodeKind::Start to the first executable node.")
    )]
    MissingEntry,

    /// An edge references a node that was never registered.
    #[error("edge references unregistered node: {node}")]
    #[diagnostic(
        code(uiforge::graphs::unknown_node),
        help("Register the node with add_node before wiring edges to it.")
    )]
    UnknownNode { node: String },

    /// Two conditional edges share a source node.
    #[error("duplicate conditional edge from node: {node}")]
    #[diagnostic(
        code(uiforge::graphs::duplicate_router),
        help("A node routes through at most one conditional edge.")
    )]
    DuplicateRouter { node: String },
}

impl super::builder::GraphBuilder {
    /// Validate the topology and produce an executable [`App`].
    ///
    /// Checks performed:
    /// - at least one edge (of either kind) leaves `Start`;
    /// - every edge endpoint is a registered node or a virtual endpoint;
    /// - at most one conditional edge per source node.
    ///
    /// Router *targets* are values computed at runtime and cannot be
    /// checked here; the executor validates them per step and skips
    /// unknown destinations with a warning.
    pub fn compile(self) -> Result<App, CompileError> {
        let has_entry = self
            .edges
            .get(&NodeKind::Start)
            .is_some_and(|targets| !targets.is_empty())
            || self
                .conditional_edges
                .iter()
                .any(|edge| edge.from().is_start());
        if !has_entry {
            return Err(CompileError::MissingEntry);
        }

        let known = |kind: &NodeKind| -> bool {
            match kind {
                NodeKind::Start | NodeKind::End => true,
                NodeKind::Custom(_) => self.nodes.contains_key(kind),
            }
        };

        for (from, targets) in &self.edges {
            if !known(from) {
                return Err(CompileError::UnknownNode {
                    node: from.to_string(),
                });
            }
            for to in targets {
                if !known(to) {
                    return Err(CompileError::UnknownNode {
                        node: to.to_string(),
                    });
                }
            }
        }

        let mut sources: FxHashMap<&NodeKind, usize> = FxHashMap::default();
        for edge in &self.conditional_edges {
            if !known(edge.from()) {
                return Err(CompileError::UnknownNode {
                    node: edge.from().to_string(),
                });
            }
            let seen = sources.entry(edge.from()).or_insert(0);
            *seen += 1;
            if *seen > 1 {
                return Err(CompileError::DuplicateRouter {
                    node: edge.from().to_string(),
                });
            }
        }

        Ok(App::from_parts(
            self.nodes,
            self.edges,
            self.conditional_edges,
            self.reporter,
            self.concurrency_limit,
        ))
    }
}
