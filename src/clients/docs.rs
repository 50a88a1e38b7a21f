//! Component-documentation client seam.

use async_trait::async_trait;
use miette::Diagnostic;
use std::collections::BTreeSet;
use thiserror::Error;

/// A documentation source for one platform's component library.
///
/// The context-retrieval stage first asks for the full known-component
/// list, intersects it with the names discovered in the design tree, and
/// then fetches documentation per recognized name. Each method is
/// independently failure-tolerant at the call site: a broken source
/// degrades that platform's context, never the run.
#[async_trait]
pub trait DocsClient: Send + Sync {
    /// The set of component names this source can document.
    async fn list_components(&self) -> Result<BTreeSet<String>, DocsError>;

    /// Documentation text for one component.
    async fn get_doc(&self, component: &str) -> Result<String, DocsError>;

    /// Release the underlying connection.
    ///
    /// Called by the agent on every exit path once the run is over,
    /// whether it succeeded or failed. The default is a no-op for
    /// connectionless sources.
    async fn close(&self) -> Result<(), DocsError> {
        Ok(())
    }
}

/// Errors surfaced by a documentation source.
#[derive(Debug, Error, Diagnostic)]
pub enum DocsError {
    /// The source cannot be reached at all.
    #[error("documentation source unavailable: {message}")]
    #[diagnostic(code(uiforge::docs::unavailable))]
    Unavailable { message: String },

    /// The source does not know the requested component.
    #[error("unknown component: {name}")]
    #[diagnostic(code(uiforge::docs::unknown_component))]
    UnknownComponent { name: String },

    /// The source answered with something the client could not decode.
    #[error("documentation protocol error: {message}")]
    #[diagnostic(code(uiforge::docs::protocol))]
    Protocol { message: String },
}
