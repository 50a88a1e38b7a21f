//! The code generation agent: graph wiring and run lifecycle.
//!
//! [`CodegenAgent`] owns the injected collaborators (model client,
//! documentation sources, per-platform workspaces, audit reporter), builds
//! the workflow graph once, and runs it per task. Documentation sources
//! are released on every exit path: success, branch failure, or
//! validation stop.
//!
//! Graph shape:
//!
//! ```text
//! Start ─► validate_input ─?─► retrieve_context ─┬─► prepare_web ─► generate_web ─► write_web ─► lint_web ─?─► push_web ─► End
//!                │                               │                                     ▲             │
//!                └──► End (invalid input)        │                                     └── fix_web ◄─┘
//!                                                └─► prepare_mobile ─► ... (same template)
//! ```

use rustc_hash::FxHashMap;
use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;

use crate::app::App;
use crate::audit::StatusReporter;
use crate::clients::{DocsClient, ModelClient};
use crate::context::ContextRetrieval;
use crate::graphs::{CompileError, GraphBuilder};
use crate::pipeline::{
    FixCode, GenerateCode, PlatformConfig, PlatformPipeline, PrepareRepo, PushCode, RunLinter,
    WriteFile, node_name, retry_router,
};
use crate::runner::RunnerError;
use crate::state::ExecutionState;
use crate::types::{NodeKind, Platform};
use crate::validation::{ValidateInput, validation_router};
use crate::workspace::Workspace;

const VALIDATE_NODE: &str = "validate_input";
const CONTEXT_NODE: &str = "retrieve_context";

/// Errors from agent construction.
#[derive(Debug, Error, Diagnostic)]
pub enum AgentError {
    /// No model client was provided.
    #[error("a model client is required to build the agent")]
    #[diagnostic(code(uiforge::agent::missing_model))]
    MissingModel,

    /// No platform pipeline was configured.
    #[error("at least one platform pipeline is required")]
    #[diagnostic(code(uiforge::agent::no_pipelines))]
    NoPipelines,

    /// The assembled graph failed structural validation.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Compile(#[from] CompileError),
}

/// Builder collecting the agent's collaborators.
#[derive(Default)]
pub struct CodegenAgentBuilder {
    model: Option<Arc<dyn ModelClient>>,
    docs_sources: FxHashMap<Platform, Arc<dyn DocsClient>>,
    pipelines: Vec<(PlatformConfig, Arc<dyn Workspace>)>,
    reporter: StatusReporter,
    concurrency_limit: Option<usize>,
}

impl CodegenAgentBuilder {
    /// The shared text-generation client.
    #[must_use]
    pub fn with_model(mut self, model: Arc<dyn ModelClient>) -> Self {
        self.model = Some(model);
        self
    }

    /// Register a documentation source for a platform. Platforms without
    /// a source run with degraded (absent) context.
    #[must_use]
    pub fn add_docs_source(mut self, platform: Platform, client: Arc<dyn DocsClient>) -> Self {
        self.docs_sources.insert(platform, client);
        self
    }

    /// Register one platform pipeline: its configuration plus the
    /// workspace it owns.
    #[must_use]
    pub fn add_pipeline(mut self, config: PlatformConfig, workspace: Arc<dyn Workspace>) -> Self {
        self.pipelines.push((config, workspace));
        self
    }

    /// Attach the audit reporter handed to every node.
    #[must_use]
    pub fn with_reporter(mut self, reporter: StatusReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Cap per-superstep concurrency.
    #[must_use]
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = Some(limit);
        self
    }

    /// Wire the graph and compile it.
    pub fn build(self) -> Result<CodegenAgent, AgentError> {
        let model = self.model.ok_or(AgentError::MissingModel)?;
        if self.pipelines.is_empty() {
            return Err(AgentError::NoPipelines);
        }

        let validate = NodeKind::custom(VALIDATE_NODE);
        let retrieve = NodeKind::custom(CONTEXT_NODE);

        let mut builder = GraphBuilder::new()
            .add_node(validate.clone(), ValidateInput)
            .add_node(
                retrieve.clone(),
                ContextRetrieval::new(self.docs_sources.clone()),
            )
            .add_edge(NodeKind::Start, validate.clone())
            .add_conditional_edge(validate, validation_router(retrieve.clone()));

        for (config, workspace) in self.pipelines {
            let platform = config.platform;
            let pipeline = Arc::new(PlatformPipeline::new(config, model.clone(), workspace));

            builder = builder
                .add_node(node_name::prepare(platform), PrepareRepo(pipeline.clone()))
                .add_node(node_name::generate(platform), GenerateCode(pipeline.clone()))
                .add_node(node_name::write(platform), WriteFile(pipeline.clone()))
                .add_node(node_name::lint(platform), RunLinter(pipeline.clone()))
                .add_node(node_name::fix(platform), FixCode(pipeline.clone()))
                .add_node(node_name::push(platform), PushCode(pipeline))
                // Fan-out: every platform branch leaves context retrieval.
                .add_edge(retrieve.clone(), node_name::prepare(platform))
                .add_edge(node_name::prepare(platform), node_name::generate(platform))
                .add_edge(node_name::generate(platform), node_name::write(platform))
                .add_edge(node_name::write(platform), node_name::lint(platform))
                // The self-correction loop closes back through write.
                .add_conditional_edge(node_name::lint(platform), retry_router(platform))
                .add_edge(node_name::fix(platform), node_name::write(platform))
                .add_edge(node_name::push(platform), NodeKind::End);
        }

        builder = builder.with_reporter(self.reporter);
        if let Some(limit) = self.concurrency_limit {
            builder = builder.with_concurrency_limit(limit);
        }

        let app = builder.compile()?;
        tracing::info!("codegen graph built");
        Ok(CodegenAgent {
            app,
            docs_sources: self.docs_sources,
        })
    }
}

/// A ready-to-run code generation agent.
pub struct CodegenAgent {
    app: App,
    docs_sources: FxHashMap<Platform, Arc<dyn DocsClient>>,
}

impl CodegenAgent {
    /// Start collecting collaborators.
    #[must_use]
    pub fn builder() -> CodegenAgentBuilder {
        CodegenAgentBuilder::default()
    }

    /// The compiled workflow graph.
    #[must_use]
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Run one task to completion, then release the documentation
    /// sources.
    ///
    /// The release runs whether the workflow succeeded, stopped at
    /// validation, or failed branches; the agent owns those connections
    /// and never leaks them past a run.
    pub async fn run(&self, state: ExecutionState) -> Result<ExecutionState, RunnerError> {
        let result = self.app.invoke(state).await;

        for (platform, client) in &self.docs_sources {
            if let Err(err) = client.close().await {
                tracing::warn!(%platform, error = %err, "docs client close failed");
            }
        }

        result
    }
}
