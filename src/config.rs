//! Environment-backed configuration.
//!
//! The embedding service configures the agent through environment
//! variables (a `.env` file is honored in development). Construction is
//! explicit: `Settings::from_env()` is called once by the process entry
//! point and the resulting value is passed down; no lazily initialized
//! globals.

use miette::Diagnostic;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::workspace::GitWorkspaceConfig;

/// Errors from configuration loading.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("missing required environment variable: {key}")]
    #[diagnostic(
        code(uiforge::config::missing_var),
        help("Set the variable in the environment or a .env file.")
    )]
    MissingVar { key: &'static str },
}

/// Typed service configuration.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Web target repository and checkout location.
    pub web_repo_url: String,
    pub web_repo_path: PathBuf,
    /// Mobile target; optional, the mobile pipeline is skipped without it.
    pub mobile_repo_url: Option<String>,
    pub mobile_repo_path: Option<PathBuf>,
    /// SSH key used for all git operations, if any.
    pub git_ssh_key_path: Option<PathBuf>,
    /// Commit identity for agent-authored commits.
    pub git_user_name: String,
    pub git_user_email: String,
    /// Model identifier passed to the model client implementation.
    pub model_name: String,
}

impl Settings {
    /// Load settings from the environment (and `.env`, when present).
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine; real environments set vars directly.
        dotenvy::dotenv().ok();

        let require = |key: &'static str| env::var(key).map_err(|_| ConfigError::MissingVar { key });
        let optional = |key: &str| env::var(key).ok().filter(|value| !value.is_empty());

        Ok(Self {
            web_repo_url: require("WEB_REPO_URL")?,
            web_repo_path: PathBuf::from(require("WEB_REPO_PATH")?),
            mobile_repo_url: optional("MOBILE_REPO_URL"),
            mobile_repo_path: optional("MOBILE_REPO_PATH").map(PathBuf::from),
            git_ssh_key_path: optional("GIT_SSH_KEY_PATH").map(PathBuf::from),
            git_user_name: optional("GIT_USER_NAME").unwrap_or_else(|| "Codegen Agent".to_string()),
            git_user_email: optional("GIT_USER_EMAIL")
                .unwrap_or_else(|| "codegen-agent@localhost".to_string()),
            model_name: optional("MODEL_CODEGEN").unwrap_or_else(|| "gemini-2.5-pro".to_string()),
        })
    }

    /// Workspace configuration for the web checkout.
    #[must_use]
    pub fn web_workspace_config(&self) -> GitWorkspaceConfig {
        self.workspace_config(&self.web_repo_url, self.web_repo_path.clone())
    }

    /// Workspace configuration for the mobile checkout, when configured.
    #[must_use]
    pub fn mobile_workspace_config(&self) -> Option<GitWorkspaceConfig> {
        match (&self.mobile_repo_url, &self.mobile_repo_path) {
            (Some(url), Some(path)) => Some(self.workspace_config(url, path.clone())),
            _ => None,
        }
    }

    fn workspace_config(&self, repo_url: &str, local_path: PathBuf) -> GitWorkspaceConfig {
        let mut config = GitWorkspaceConfig::new(repo_url, local_path)
            .with_identity(&self.git_user_name, &self.git_user_email);
        if let Some(key) = &self.git_ssh_key_path {
            config = config.with_ssh_key(key);
        }
        config
    }
}
