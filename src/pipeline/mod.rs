//! The per-platform code generation pipeline.
//!
//! Six stages, one template: prepare → generate → write → lint →
//! (fix → write → lint)* → push. The template is generic; everything
//! platform-specific lives in a [`PlatformConfig`] value. Each stage is a
//! thin graph-node wrapper delegating to the shared [`PlatformPipeline`],
//! which mirrors how the stages share one model client and one workspace.
//!
//! Error policy per stage (see the crate's error taxonomy):
//! - `prepare` and `push` are side-effecting and **propagate**: a broken
//!   workspace must not be generated into, and a failed publish ends the
//!   branch.
//! - `generate`, `lint`, and `fix` **swallow** into status events; the
//!   loop and the downstream stages degrade gracefully.

mod config;
pub mod prompts;
mod router;

pub use config::{PlatformConfig, mobile_component_path, web_component_path};
pub use router::{MAX_ITERATIONS, RetryDecision, retry_decision, retry_router};

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::clients::ModelClient;
use crate::node::{Node, NodeContext, NodeError, NodePartial};
use crate::state::{ExecutionState, SlotUpdate};
use crate::status::StatusEvent;
use crate::types::Platform;
use crate::utils::code::strip_code_fences;
use crate::workspace::Workspace;

/// Docs stand-in when no source produced context for a platform.
pub const NO_DOCS_PLACEHOLDER: &str = "No docs provided";

/// Linter output is truncated to this many characters in event details;
/// the fix prompt always receives the full text.
const LINT_DETAIL_LIMIT: usize = 500;

/// Graph node names for one platform's pipeline stages.
pub mod node_name {
    use crate::types::{NodeKind, Platform};

    pub fn prepare(platform: Platform) -> NodeKind {
        NodeKind::custom(format!("prepare_{platform}"))
    }
    pub fn generate(platform: Platform) -> NodeKind {
        NodeKind::custom(format!("generate_{platform}"))
    }
    pub fn write(platform: Platform) -> NodeKind {
        NodeKind::custom(format!("write_{platform}"))
    }
    pub fn lint(platform: Platform) -> NodeKind {
        NodeKind::custom(format!("lint_{platform}"))
    }
    pub fn fix(platform: Platform) -> NodeKind {
        NodeKind::custom(format!("fix_{platform}"))
    }
    pub fn push(platform: Platform) -> NodeKind {
        NodeKind::custom(format!("push_{platform}"))
    }
}

/// Shared implementation of the six pipeline stages for one platform.
pub struct PlatformPipeline {
    config: PlatformConfig,
    model: Arc<dyn ModelClient>,
    workspace: Arc<dyn Workspace>,
}

impl PlatformPipeline {
    pub fn new(
        config: PlatformConfig,
        model: Arc<dyn ModelClient>,
        workspace: Arc<dyn Workspace>,
    ) -> Self {
        Self {
            config,
            model,
            workspace,
        }
    }

    /// The platform this pipeline instance serves.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.config.platform
    }

    fn file_path(&self, state: &ExecutionState) -> String {
        (self.config.path_for)(&state.scoped_component_name())
    }

    // --- Stage 1: prepare workspace -------------------------------------

    async fn prepare(
        &self,
        state: &ExecutionState,
        ctx: &NodeContext,
    ) -> Result<NodePartial, NodeError> {
        let platform = self.config.platform;
        let scope = platform.scope();
        let branch = state.branch_name();

        let pending = StatusEvent::pending(
            scope,
            format!("Preparing {} repository", platform.title()),
        )
        .with_details(json!({"branch": branch}));
        ctx.report(&pending).await;
        let mut events = vec![pending];

        if let Err(err) = self.workspace.prepare(&branch).await {
            tracing::error!(%platform, error = %err, "repository preparation failed");
            let event = StatusEvent::error(
                scope,
                format!("{} repository preparation failed: {err}", platform.title()),
            );
            ctx.report(&event).await;
            // Fatal to this branch: generating into a broken workspace
            // helps nobody.
            return Err(NodeError::Workspace(err));
        }

        let done = StatusEvent::success(scope, format!("{} repository prepared", platform.title()));
        ctx.report(&done).await;
        events.push(done);

        Ok(NodePartial::new()
            .with_status(events)
            .with_slot(platform, SlotUpdate::new().retry_count(0)))
    }

    // --- Stage 2: generate code ------------------------------------------

    async fn generate(
        &self,
        state: &ExecutionState,
        ctx: &NodeContext,
    ) -> Result<NodePartial, NodeError> {
        let platform = self.config.platform;
        let scope = platform.scope();

        let pending = StatusEvent::pending(
            scope,
            format!("Starting {} code generation", platform.title()),
        );
        ctx.report(&pending).await;
        let mut events = vec![pending];

        let slot = state.slot(platform);
        let docs = slot.docs.as_deref().unwrap_or(NO_DOCS_PLACEHOLDER);
        let instructions = state.user_instructions.as_deref().unwrap_or("None");
        let tree = state
            .design_tree
            .as_ref()
            .and_then(|tree| serde_json::to_string(tree).ok())
            .unwrap_or_else(|| "{}".to_string());

        let user_prompt = format!(
            "{}\n\nAdditional user instructions: {instructions}\n\n\
             ## Component documentation:\n{docs}\n\n\
             ## Design tree:\n{tree}",
            self.config.user_prompt_start
        );

        match self.model.invoke(self.config.system_prompt, &user_prompt).await {
            Ok(raw) => {
                let code = strip_code_fences(&raw);
                let done = StatusEvent::success(
                    scope,
                    format!("{} code generated - initial pass", platform.title()),
                );
                ctx.report(&done).await;
                events.push(done);
                Ok(NodePartial::new()
                    .with_status(events)
                    .with_slot(platform, SlotUpdate::new().code(code)))
            }
            Err(err) => {
                tracing::error!(%platform, error = %err, "code generation failed");
                let event = StatusEvent::error(
                    scope,
                    format!("{} code generation failed: {err}", platform.title()),
                );
                ctx.report(&event).await;
                events.push(event);
                // Branch continues without code; the write stage treats
                // that as its own no-op.
                Ok(NodePartial::new().with_status(events))
            }
        }
    }

    // --- Stage 3: write file ---------------------------------------------

    async fn write_file(
        &self,
        state: &ExecutionState,
        ctx: &NodeContext,
    ) -> Result<NodePartial, NodeError> {
        let platform = self.config.platform;
        let scope = platform.scope();
        let path = self.file_path(state);

        let Some(code) = state.slot(platform).code.as_deref() else {
            let event = StatusEvent::warning(
                scope,
                format!("No {platform} code candidate to write; skipping '{path}'"),
            );
            ctx.report(&event).await;
            return Ok(NodePartial::new().with_status(vec![event]));
        };

        match self.workspace.write_file(&path, code).await {
            Ok(()) => {
                let event = StatusEvent::success(
                    scope,
                    format!("{} code written to '{path}'", platform.title()),
                );
                ctx.report(&event).await;
                Ok(NodePartial::new().with_status(vec![event]))
            }
            Err(err) => {
                tracing::error!(%platform, error = %err, path = %path, "code write failed");
                let event = StatusEvent::error(
                    scope,
                    format!("{} code write failed: {err}", platform.title()),
                );
                ctx.report(&event).await;
                Ok(NodePartial::new().with_status(vec![event]))
            }
        }
    }

    // --- Stage 4: lint ----------------------------------------------------

    async fn lint(
        &self,
        state: &ExecutionState,
        ctx: &NodeContext,
    ) -> Result<NodePartial, NodeError> {
        let platform = self.config.platform;
        let scope = platform.scope();
        let retry_count = state.slot(platform).retry_count;

        let pending =
            StatusEvent::pending(scope, format!("Running {platform} linter"));
        ctx.report(&pending).await;
        let mut events = vec![pending];

        let lint_result = self.workspace.run_lint_fix().await;
        let diagnostics = match lint_result {
            Ok(outcome) if outcome.success => {
                // The linter may have reformatted the file; the state's
                // code candidate must be the artifact that actually passed.
                let path = self.file_path(state);
                match self.workspace.read_file(&path).await {
                    Ok(clean_code) => {
                        let done = StatusEvent::success(
                            scope,
                            format!("{} linter passed (auto-fixed)", platform.title()),
                        );
                        ctx.report(&done).await;
                        events.push(done);
                        return Ok(NodePartial::new().with_status(events).with_slot(
                            platform,
                            SlotUpdate::new().code(clean_code).clear_lint_errors(),
                        ));
                    }
                    Err(err) => err.to_string(),
                }
            }
            Ok(outcome) => outcome.output,
            Err(err) => err.to_string(),
        };

        let warning = StatusEvent::warning(
            scope,
            format!("{} linter found errors", platform.title()),
        )
        .with_details(json!({
            "errors": truncate_chars(&diagnostics, LINT_DETAIL_LIMIT),
        }));
        ctx.report(&warning).await;
        events.push(warning);

        // The counter advances on every failed attempt, tool breakage
        // included; otherwise the fix loop would never terminate.
        Ok(NodePartial::new().with_status(events).with_slot(
            platform,
            SlotUpdate::new()
                .lint_errors(diagnostics)
                .retry_count(retry_count + 1),
        ))
    }

    // --- Stage 5: fix (reached only through the router) -------------------

    async fn fix(
        &self,
        state: &ExecutionState,
        ctx: &NodeContext,
    ) -> Result<NodePartial, NodeError> {
        let platform = self.config.platform;
        let scope = platform.scope();
        let slot = state.slot(platform);

        let pending = StatusEvent::pending(
            scope,
            format!(
                "Fixing {} code (attempt {})",
                platform.title(),
                slot.retry_count
            ),
        );
        ctx.report(&pending).await;
        let mut events = vec![pending];

        let Some(code) = slot.code.as_deref() else {
            let event = StatusEvent::error(
                scope,
                format!("{} fix skipped: no code candidate available", platform.title()),
            );
            ctx.report(&event).await;
            events.push(event);
            return Ok(NodePartial::new().with_status(events));
        };
        // The fix prompt gets the untruncated diagnostics.
        let errors = slot.lint_errors.as_deref().unwrap_or_default();
        let user_prompt = (self.config.fix_user_prompt)(code, errors);

        match self
            .model
            .invoke(self.config.fix_system_prompt, &user_prompt)
            .await
        {
            Ok(raw) => Ok(NodePartial::new()
                .with_status(events)
                .with_slot(platform, SlotUpdate::new().code(strip_code_fences(&raw)))),
            Err(err) => {
                tracing::error!(%platform, error = %err, "code fix failed");
                let event = StatusEvent::error(
                    scope,
                    format!("{} code fix failed: {err}", platform.title()),
                );
                ctx.report(&event).await;
                events.push(event);
                // Code left unchanged: the next lint run fails the same
                // way and the ceiling bounds the loop.
                Ok(NodePartial::new().with_status(events))
            }
        }
    }

    // --- Stage 6: push -----------------------------------------------------

    async fn push(
        &self,
        state: &ExecutionState,
        ctx: &NodeContext,
    ) -> Result<NodePartial, NodeError> {
        let platform = self.config.platform;
        let scope = platform.scope();
        let scoped_name = state.scoped_component_name();
        let branch = state.branch_name();
        let slot = state.slot(platform);

        let forced = slot.lint_errors.is_some();
        let mut message = format!("feat({scoped_name}): generate {platform} component");
        if forced {
            message.push_str(" (forced push with lint errors)");
        }

        let mut events = Vec::new();
        if forced {
            let event = StatusEvent::warning(
                scope,
                format!(
                    "Publishing {platform} code despite outstanding lint errors (retry ceiling reached)"
                ),
            )
            .with_details(json!({"retry_count": slot.retry_count}));
            ctx.report(&event).await;
            events.push(event);
        }

        match self.workspace.commit_and_push(&message, &branch).await {
            Ok(()) => {
                let event =
                    StatusEvent::success(scope, format!("Code pushed to branch '{branch}'"));
                ctx.report(&event).await;
                events.push(event);
                Ok(NodePartial::new().with_status(events))
            }
            Err(err) => {
                tracing::error!(%platform, error = %err, branch = %branch, "push failed");
                let event = StatusEvent::error(
                    scope,
                    format!("{} push failed: {err}", platform.title()),
                );
                ctx.report(&event).await;
                Err(NodeError::Workspace(err))
            }
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

// --- Graph node wrappers ---------------------------------------------------

/// Stage 1 node: workspace checkout and branch reset.
pub struct PrepareRepo(pub Arc<PlatformPipeline>);

#[async_trait]
impl Node for PrepareRepo {
    async fn run(
        &self,
        snapshot: ExecutionState,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        self.0.prepare(&snapshot, &ctx).await
    }
}

/// Stage 2 node: initial model generation.
pub struct GenerateCode(pub Arc<PlatformPipeline>);

#[async_trait]
impl Node for GenerateCode {
    async fn run(
        &self,
        snapshot: ExecutionState,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        self.0.generate(&snapshot, &ctx).await
    }
}

/// Stage 3 node: persist the candidate into the workspace.
pub struct WriteFile(pub Arc<PlatformPipeline>);

#[async_trait]
impl Node for WriteFile {
    async fn run(
        &self,
        snapshot: ExecutionState,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        self.0.write_file(&snapshot, &ctx).await
    }
}

/// Stage 4 node: fix-capable lint run.
pub struct RunLinter(pub Arc<PlatformPipeline>);

#[async_trait]
impl Node for RunLinter {
    async fn run(
        &self,
        snapshot: ExecutionState,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        self.0.lint(&snapshot, &ctx).await
    }
}

/// Stage 5 node: model-driven self-correction.
pub struct FixCode(pub Arc<PlatformPipeline>);

#[async_trait]
impl Node for FixCode {
    async fn run(
        &self,
        snapshot: ExecutionState,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        self.0.fix(&snapshot, &ctx).await
    }
}

/// Stage 6 node: commit and force-push the branch.
pub struct PushCode(pub Arc<PlatformPipeline>);

#[async_trait]
impl Node for PushCode {
    async fn run(
        &self,
        snapshot: ExecutionState,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        self.0.push(&snapshot, &ctx).await
    }
}
