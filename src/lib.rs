//! # uiforge: graph-driven design-to-code generation
//!
//! uiforge turns a design-tool JSON tree into source code by driving a
//! text-generation service through a repeated generate → write → lint →
//! fix cycle, then publishing the result to a source-control branch. The
//! core is a workflow execution engine: a declarative graph of named steps
//! with conditional routing, a bounded self-correction loop, parallel
//! fan-out for context gathering and per-platform pipelines, and an
//! append-only status log that survives partial failures.
//!
//! ## Core concepts
//!
//! - **Nodes**: async units of work that receive a state snapshot and
//!   return a sparse update ([`node::Node`], [`node::NodePartial`])
//! - **State**: one [`state::ExecutionState`] per run holding immutable inputs,
//!   per-platform slots keyed by [`types::Platform`], and the
//!   append-only [`status::StatusEvent`] history
//! - **Graph**: declarative topology with conditional edges
//!   ([`graphs::GraphBuilder`]) compiled into an [`app::App`]
//! - **Execution**: concurrent supersteps with barrier merges and
//!   per-branch failure isolation ([`runner`])
//! - **Pipeline**: the six-stage per-platform template ([`pipeline`]),
//!   bounded by the retry router ([`pipeline::retry_decision`])
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use uiforge::agent::CodegenAgent;
//! use uiforge::audit::{LogSink, StatusReporter};
//! use uiforge::pipeline::PlatformConfig;
//! use uiforge::state::ExecutionState;
//! use uiforge::types::Platform;
//! use uiforge::workspace::{GitWorkspace, GitWorkspaceConfig};
//!
//! # async fn example(
//! #     model: Arc<dyn uiforge::clients::ModelClient>,
//! #     docs: Arc<dyn uiforge::clients::DocsClient>,
//! #     tree: uiforge::design::DesignNode,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let workspace = Arc::new(GitWorkspace::new(GitWorkspaceConfig::new(
//!     "git@example.com:acme/web.git",
//!     "/var/tmp/uiforge/web",
//! )));
//!
//! let agent = CodegenAgent::builder()
//!     .with_model(model)
//!     .add_docs_source(Platform::Web, docs)
//!     .add_pipeline(PlatformConfig::web(), workspace)
//!     .with_reporter(StatusReporter::new("task-1", Arc::new(LogSink)))
//!     .build()?;
//!
//! let state = ExecutionState::builder()
//!     .with_task_id("task-1")
//!     .with_component_name("HeroBanner")
//!     .with_design_tree(tree)
//!     .build();
//!
//! let final_state = agent.run(state).await?;
//! println!("history: {} events", final_state.status_history.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! Stage outcomes follow a fixed taxonomy: workspace setup and publish
//! failures propagate and abort their branch (sibling branches keep
//! running); model, linter, and documentation failures are swallowed into
//! status events and the run degrades gracefully. Either way the caller
//! gets the complete state back; on failure it rides inside
//! [`runner::RunnerError::NodeFailures`].
//!
//! ## Module guide
//!
//! - [`agent`] - collaborator wiring and the run lifecycle
//! - [`app`] / [`graphs`] / [`runner`] - the execution engine
//! - [`node`] / [`state`] / [`reducers`] - node contract and merge policies
//! - [`pipeline`] / [`context`] / [`validation`] - the workflow's stages
//! - [`clients`] / [`workspace`] / [`audit`] - external collaborator seams
//! - [`config`] / [`telemetry`] / [`utils`] - service plumbing

pub mod agent;
pub mod app;
pub mod audit;
pub mod clients;
pub mod config;
pub mod context;
pub mod design;
pub mod graphs;
pub mod node;
pub mod pipeline;
pub mod reducers;
pub mod runner;
pub mod state;
pub mod status;
pub mod telemetry;
pub mod types;
pub mod utils;
pub mod validation;
pub mod workspace;
