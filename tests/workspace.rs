//! File-system behavior of the git workspace, exercised against a
//! temporary directory. Git and lint subprocess paths are covered by the
//! pipeline tests through the workspace trait double.

use tempfile::TempDir;
use uiforge::workspace::{GitWorkspace, GitWorkspaceConfig, Workspace};

fn workspace_in(dir: &TempDir) -> GitWorkspace {
    GitWorkspace::new(GitWorkspaceConfig::new(
        "git@example.com:acme/web.git",
        dir.path(),
    ))
}

#[tokio::test]
async fn write_creates_parent_directories_and_reads_back() {
    let dir = TempDir::new().unwrap();
    let workspace = workspace_in(&dir);

    workspace
        .write_file("src/app/preview/Card-abc/page.tsx", "export {}")
        .await
        .unwrap();

    let content = workspace
        .read_file("src/app/preview/Card-abc/page.tsx")
        .await
        .unwrap();
    assert_eq!(content, "export {}");
}

#[tokio::test]
async fn rewriting_the_same_content_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let workspace = workspace_in(&dir);

    workspace.write_file("a/b.tsx", "same bytes").await.unwrap();
    workspace.write_file("a/b.tsx", "same bytes").await.unwrap();

    let on_disk = std::fs::read(dir.path().join("a/b.tsx")).unwrap();
    assert_eq!(on_disk, b"same bytes");
}

#[tokio::test]
async fn rewrite_overwrites_previous_content() {
    let dir = TempDir::new().unwrap();
    let workspace = workspace_in(&dir);

    workspace.write_file("a/b.tsx", "first").await.unwrap();
    workspace.write_file("a/b.tsx", "second").await.unwrap();

    assert_eq!(workspace.read_file("a/b.tsx").await.unwrap(), "second");
}

#[tokio::test]
async fn missing_file_reads_as_io_error() {
    let dir = TempDir::new().unwrap();
    let workspace = workspace_in(&dir);

    let err = workspace.read_file("nope.tsx").await.err().unwrap();
    assert!(err.to_string().contains("nope.tsx"));
}

#[test]
fn ssh_key_config_is_reflected() {
    let config = GitWorkspaceConfig::new("git@example.com:acme/web.git", "/tmp/ws")
        .with_ssh_key("/secrets/deploy_key")
        .with_identity("Agent", "agent@example.com");
    assert_eq!(config.ssh_key_path.as_deref().unwrap().to_str(), Some("/secrets/deploy_key"));
    assert_eq!(config.user_email, "agent@example.com");
}
