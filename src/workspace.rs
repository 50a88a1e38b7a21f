//! Local workspace management: checkout, file injection, lint, publish.
//!
//! [`Workspace`] is the seam the pipeline stages talk to; [`GitWorkspace`]
//! is the real implementation over a git checkout driven through
//! subprocesses. All operations run through tokio's async process and fs
//! APIs so a slow clone or lint run never blocks a sibling branch.

use async_trait::async_trait;
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use std::process::Output;
use thiserror::Error;
use tokio::process::Command;

/// Result of one fix-capable linter run.
#[derive(Clone, Debug)]
pub struct LintOutcome {
    /// `true` when the linter exited cleanly (possibly after auto-fixes).
    pub success: bool,
    /// Tool output; on failure this is the diagnostic text handed to the
    /// fix prompt.
    pub output: String,
}

/// Manager of one local repository checkout.
///
/// One instance per platform; branches never share a checkout, so no
/// cross-branch locking is needed.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Acquire or refresh the checkout and create-or-reset the given
    /// branch. Fatal on failure: the pipeline must not generate into a
    /// broken workspace.
    async fn prepare(&self, branch: &str) -> Result<(), WorkspaceError>;

    /// Write `content` to a workspace-relative path, creating parent
    /// directories as needed. Re-running with the same content is
    /// byte-identical to a single write.
    async fn write_file(&self, path: &str, content: &str) -> Result<(), WorkspaceError>;

    /// Read a workspace-relative file back.
    async fn read_file(&self, path: &str) -> Result<String, WorkspaceError>;

    /// Run the project's fix-capable linter.
    ///
    /// A linter that runs but finds problems is `Ok(LintOutcome { success:
    /// false, .. })`; `Err` means the tool itself could not run.
    async fn run_lint_fix(&self) -> Result<LintOutcome, WorkspaceError>;

    /// Stage everything and, if the tree is dirty, commit with `message`
    /// and force-push `branch`. A clean tree is a successful no-op.
    async fn commit_and_push(&self, message: &str, branch: &str) -> Result<(), WorkspaceError>;
}

/// Errors from workspace operations.
#[derive(Debug, Error, Diagnostic)]
pub enum WorkspaceError {
    /// The subprocess could not be started at all.
    #[error("failed to spawn `{command}`: {source}")]
    #[diagnostic(code(uiforge::workspace::spawn))]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The subprocess ran and exited non-zero.
    #[error("command `{command}` failed ({status}): {output}")]
    #[diagnostic(code(uiforge::workspace::command))]
    Command {
        command: String,
        status: String,
        output: String,
    },

    /// File system access failed.
    #[error("io error at {path}: {source}")]
    #[diagnostic(code(uiforge::workspace::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration for a [`GitWorkspace`].
#[derive(Clone, Debug)]
pub struct GitWorkspaceConfig {
    /// Remote to clone from.
    pub repo_url: String,
    /// Local checkout directory.
    pub local_path: PathBuf,
    /// Branch the checkout is reset to before each run.
    pub default_branch: String,
    /// SSH key for git operations; flows into `GIT_SSH_COMMAND`.
    pub ssh_key_path: Option<PathBuf>,
    /// Commit identity.
    pub user_name: String,
    pub user_email: String,
    /// Dependency bootstrap run once after a fresh clone.
    pub bootstrap_command: Option<Vec<String>>,
    /// The fix-capable lint invocation.
    pub lint_command: Vec<String>,
}

impl GitWorkspaceConfig {
    /// Defaults for a node project: `npm install` bootstrap, `npm run
    /// lint` as the fix-capable linter, `main` as the base branch.
    pub fn new(repo_url: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_url: repo_url.into(),
            local_path: local_path.into(),
            default_branch: "main".to_string(),
            ssh_key_path: None,
            user_name: "Codegen Agent".to_string(),
            user_email: "codegen-agent@localhost".to_string(),
            bootstrap_command: Some(vec!["npm".into(), "install".into()]),
            lint_command: vec!["npm".into(), "run".into(), "lint".into()],
        }
    }

    /// Set the SSH key used for clone/fetch/push.
    #[must_use]
    pub fn with_ssh_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.ssh_key_path = Some(key_path.into());
        self
    }

    /// Override the commit identity.
    #[must_use]
    pub fn with_identity(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.user_name = name.into();
        self.user_email = email.into();
        self
    }
}

/// [`Workspace`] implementation over a git checkout and shell tooling.
pub struct GitWorkspace {
    config: GitWorkspaceConfig,
    git_ssh_command: String,
}

impl GitWorkspace {
    pub fn new(config: GitWorkspaceConfig) -> Self {
        let git_ssh_command = match &config.ssh_key_path {
            Some(key) => format!(
                "ssh -o StrictHostKeyChecking=no -i {}",
                key.to_string_lossy()
            ),
            None => "ssh -o StrictHostKeyChecking=no".to_string(),
        };
        Self {
            config,
            git_ssh_command,
        }
    }

    fn local_path(&self) -> &Path {
        &self.config.local_path
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        self.local_path().join(relative)
    }

    async fn raw_output(&self, argv: &[&str]) -> Result<Output, WorkspaceError> {
        let command_line = argv.join(" ");
        tracing::debug!(command = %command_line, cwd = %self.local_path().display(), "running workspace command");
        Command::new(argv[0])
            .args(&argv[1..])
            .current_dir(self.local_path())
            .env("GIT_SSH_COMMAND", &self.git_ssh_command)
            .output()
            .await
            .map_err(|source| WorkspaceError::Spawn {
                command: command_line,
                source,
            })
    }

    /// Run a command that must succeed; returns trimmed stdout.
    async fn run_checked(&self, argv: &[&str]) -> Result<String, WorkspaceError> {
        let output = self.raw_output(argv).await?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let diagnostic = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            tracing::error!(
                command = %argv.join(" "),
                status = %output.status,
                "workspace command failed"
            );
            Err(WorkspaceError::Command {
                command: argv.join(" "),
                status: output.status.to_string(),
                output: diagnostic,
            })
        }
    }

    async fn clone_and_bootstrap(&self) -> Result<(), WorkspaceError> {
        tracing::info!(
            repo = %self.config.repo_url,
            path = %self.local_path().display(),
            "cloning repository"
        );
        tokio::fs::create_dir_all(self.local_path())
            .await
            .map_err(|source| WorkspaceError::Io {
                path: self.local_path().display().to_string(),
                source,
            })?;
        self.run_checked(&["git", "clone", &self.config.repo_url, "."])
            .await?;
        self.run_checked(&["git", "config", "user.email", &self.config.user_email])
            .await?;
        self.run_checked(&["git", "config", "user.name", &self.config.user_name])
            .await?;

        if let Some(bootstrap) = &self.config.bootstrap_command {
            tracing::info!("installing workspace dependencies");
            let argv: Vec<&str> = bootstrap.iter().map(String::as_str).collect();
            self.run_checked(&argv).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Workspace for GitWorkspace {
    async fn prepare(&self, branch: &str) -> Result<(), WorkspaceError> {
        if !self.local_path().join(".git").exists() {
            self.clone_and_bootstrap().await?;
        }

        // Reset to a pristine default branch, then create-or-reset the
        // run's own branch (-B covers both).
        self.run_checked(&["git", "fetch", "origin"]).await?;
        let base = format!("origin/{}", self.config.default_branch);
        self.run_checked(&["git", "reset", "--hard", &base]).await?;
        self.run_checked(&["git", "clean", "-fd"]).await?;
        self.run_checked(&["git", "checkout", "-B", branch]).await?;
        Ok(())
    }

    async fn write_file(&self, path: &str, content: &str) -> Result<(), WorkspaceError> {
        let full_path = self.resolve(path);
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| WorkspaceError::Io {
                    path: parent.display().to_string(),
                    source,
                })?;
        }
        tokio::fs::write(&full_path, content)
            .await
            .map_err(|source| WorkspaceError::Io {
                path: full_path.display().to_string(),
                source,
            })
    }

    async fn read_file(&self, path: &str) -> Result<String, WorkspaceError> {
        let full_path = self.resolve(path);
        tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|source| WorkspaceError::Io {
                path: full_path.display().to_string(),
                source,
            })
    }

    async fn run_lint_fix(&self) -> Result<LintOutcome, WorkspaceError> {
        tracing::info!(path = %self.local_path().display(), "running linter");
        let argv: Vec<&str> = self.config.lint_command.iter().map(String::as_str).collect();
        let output = self.raw_output(&argv).await?;

        if output.status.success() {
            Ok(LintOutcome {
                success: true,
                output: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            })
        } else {
            // Prefer stdout: that is where eslint-style tools print the
            // diagnostics the fix prompt needs.
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let diagnostics = if stdout.is_empty() { stderr } else { stdout };
            Ok(LintOutcome {
                success: false,
                output: diagnostics,
            })
        }
    }

    async fn commit_and_push(&self, message: &str, branch: &str) -> Result<(), WorkspaceError> {
        self.run_checked(&["git", "add", "."]).await?;

        let status = self.run_checked(&["git", "status", "--porcelain"]).await?;
        if status.is_empty() {
            tracing::info!("no changes to commit");
            return Ok(());
        }

        self.run_checked(&["git", "commit", "-m", message]).await?;
        self.run_checked(&["git", "push", "origin", branch, "--force"])
            .await?;
        tracing::info!(branch, "pushed");
        Ok(())
    }
}
