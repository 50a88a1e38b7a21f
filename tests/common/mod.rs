#![allow(dead_code)]

//! Shared test doubles: scripted model, static docs source, in-memory
//! workspace, and a few trivial graph nodes.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use uiforge::audit::StatusReporter;
use uiforge::clients::{DocsClient, DocsError, ModelClient, ModelError};
use uiforge::design::DesignNode;
use uiforge::node::{Node, NodeContext, NodeError, NodePartial};
use uiforge::state::ExecutionState;
use uiforge::status::{StatusEvent, StatusScope};
use uiforge::workspace::{LintOutcome, Workspace, WorkspaceError};

// --- state helpers ---------------------------------------------------------

pub fn sample_tree() -> DesignNode {
    serde_json::from_value(serde_json::json!({
        "type": "FRAME",
        "name": "Screen",
        "children": [
            {"type": "INSTANCE", "name": "Button", "componentProperties": {"variant": "primary"}},
            {"type": "INSTANCE", "name": "Button"},
            {"type": "GROUP", "name": "g", "children": [
                {"type": "INSTANCE", "name": "Card"}
            ]}
        ]
    }))
    .unwrap()
}

pub fn base_state() -> ExecutionState {
    ExecutionState::builder()
        .with_task_id("abcd1234-efgh-5678")
        .with_component_name("Button")
        .with_design_tree(sample_tree())
        .build()
}

pub fn test_ctx(node_id: &str) -> NodeContext {
    NodeContext {
        node_id: node_id.to_string(),
        step: 1,
        reporter: StatusReporter::disabled(),
    }
}

// --- graph nodes -----------------------------------------------------------

pub struct NoopNode;

#[async_trait]
impl Node for NoopNode {
    async fn run(&self, _: ExecutionState, _: NodeContext) -> Result<NodePartial, NodeError> {
        Ok(NodePartial::default())
    }
}

/// Appends one system-scoped info event carrying its own name, so tests
/// can observe execution and ordering through the history.
pub struct RecordingNode(pub &'static str);

#[async_trait]
impl Node for RecordingNode {
    async fn run(&self, _: ExecutionState, _: NodeContext) -> Result<NodePartial, NodeError> {
        Ok(NodePartial::new().with_status(vec![StatusEvent::info(StatusScope::System, self.0)]))
    }
}

pub struct FailingNode;

#[async_trait]
impl Node for FailingNode {
    async fn run(&self, _: ExecutionState, _: NodeContext) -> Result<NodePartial, NodeError> {
        Err(NodeError::MissingInput { what: "test_key" })
    }
}

// --- model doubles ---------------------------------------------------------

/// Pops one scripted response per invocation; records every prompt pair.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String, String>>>,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<Result<&str, &str>>) -> Self {
        Self {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn invoke(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ModelError> {
        self.prompts
            .lock()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        match self.responses.lock().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ModelError::Transport { message }),
            None => Ok("// exhausted script".to_string()),
        }
    }
}

/// Always returns the same response.
pub struct ConstModel(pub String);

#[async_trait]
impl ModelClient for ConstModel {
    async fn invoke(&self, _: &str, _: &str) -> Result<String, ModelError> {
        Ok(self.0.clone())
    }
}

/// Every invocation fails at the transport.
pub struct FailingModel;

#[async_trait]
impl ModelClient for FailingModel {
    async fn invoke(&self, _: &str, _: &str) -> Result<String, ModelError> {
        Err(ModelError::Transport {
            message: "connection reset".to_string(),
        })
    }
}

// --- docs doubles ----------------------------------------------------------

/// Serves a fixed component/documentation map; tracks `close`.
pub struct StaticDocs {
    docs: BTreeMap<String, String>,
    pub closed: AtomicBool,
}

impl StaticDocs {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            docs: entries
                .iter()
                .map(|(name, doc)| (name.to_string(), doc.to_string()))
                .collect(),
            closed: AtomicBool::new(false),
        }
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocsClient for StaticDocs {
    async fn list_components(&self) -> Result<BTreeSet<String>, DocsError> {
        Ok(self.docs.keys().cloned().collect())
    }

    async fn get_doc(&self, component: &str) -> Result<String, DocsError> {
        self.docs
            .get(component)
            .cloned()
            .ok_or_else(|| DocsError::UnknownComponent {
                name: component.to_string(),
            })
    }

    async fn close(&self) -> Result<(), DocsError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// A source that is down entirely.
pub struct BrokenDocs;

#[async_trait]
impl DocsClient for BrokenDocs {
    async fn list_components(&self) -> Result<BTreeSet<String>, DocsError> {
        Err(DocsError::Unavailable {
            message: "server unreachable".to_string(),
        })
    }

    async fn get_doc(&self, _: &str) -> Result<String, DocsError> {
        Err(DocsError::Unavailable {
            message: "server unreachable".to_string(),
        })
    }
}

// --- workspace double ------------------------------------------------------

pub fn lint_pass() -> LintOutcome {
    LintOutcome {
        success: true,
        output: "Linter passed".to_string(),
    }
}

pub fn lint_fail(diagnostics: &str) -> LintOutcome {
    LintOutcome {
        success: false,
        output: diagnostics.to_string(),
    }
}

/// In-memory workspace: files in a map, scripted lint outcomes, recorded
/// branch preparations and pushes. An exhausted lint script passes.
#[derive(Default)]
pub struct MockWorkspace {
    pub files: Mutex<HashMap<String, String>>,
    pub lint_script: Mutex<VecDeque<LintOutcome>>,
    pub fail_prepare: bool,
    pub fail_push: bool,
    pub prepared_branches: Mutex<Vec<String>>,
    pub pushes: Mutex<Vec<(String, String)>>,
}

impl MockWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lint_script(outcomes: Vec<LintOutcome>) -> Self {
        Self {
            lint_script: Mutex::new(outcomes.into()),
            ..Self::default()
        }
    }

    pub fn failing_prepare() -> Self {
        Self {
            fail_prepare: true,
            ..Self::default()
        }
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.files.lock().get(path).cloned()
    }
}

#[async_trait]
impl Workspace for MockWorkspace {
    async fn prepare(&self, branch: &str) -> Result<(), WorkspaceError> {
        if self.fail_prepare {
            return Err(WorkspaceError::Command {
                command: "git clone".to_string(),
                status: "exit status: 128".to_string(),
                output: "could not read from remote repository".to_string(),
            });
        }
        self.prepared_branches.lock().push(branch.to_string());
        Ok(())
    }

    async fn write_file(&self, path: &str, content: &str) -> Result<(), WorkspaceError> {
        self.files
            .lock()
            .insert(path.to_string(), content.to_string());
        Ok(())
    }

    async fn read_file(&self, path: &str) -> Result<String, WorkspaceError> {
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| WorkspaceError::Io {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            })
    }

    async fn run_lint_fix(&self) -> Result<LintOutcome, WorkspaceError> {
        Ok(self.lint_script.lock().pop_front().unwrap_or_else(lint_pass))
    }

    async fn commit_and_push(&self, message: &str, branch: &str) -> Result<(), WorkspaceError> {
        if self.fail_push {
            return Err(WorkspaceError::Command {
                command: "git push".to_string(),
                status: "exit status: 1".to_string(),
                output: "remote rejected".to_string(),
            });
        }
        self.pushes
            .lock()
            .push((message.to_string(), branch.to_string()));
        Ok(())
    }
}

// --- misc ------------------------------------------------------------------

pub fn arc<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
