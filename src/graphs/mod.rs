//! Workflow graph definition and compilation.
//!
//! [`GraphBuilder`] collects nodes and edges through a fluent API and
//! compiles them into an executable [`App`](crate::app::App). Edges are
//! either unconditional (static topology) or conditional: a pure router
//! function of the current state that names exactly one destination.

mod builder;
mod compilation;
mod edges;

pub use builder::GraphBuilder;
pub use compilation::CompileError;
pub use edges::{ConditionalEdge, EdgeRouter};
