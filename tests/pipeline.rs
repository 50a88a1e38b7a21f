//! End-to-end workflow scenarios over the full agent graph, with scripted
//! model, docs, and workspace doubles.

mod common;

use common::*;
use std::sync::Arc;
use uiforge::agent::CodegenAgent;
use uiforge::audit::{MemorySink, StatusReporter};
use uiforge::clients::ModelClient;
use uiforge::context::DOCS_ERROR_PLACEHOLDER;
use uiforge::pipeline::PlatformConfig;
use uiforge::runner::RunnerError;
use uiforge::state::ExecutionState;
use uiforge::status::{Status, StatusScope};
use uiforge::types::{NodeKind, Platform};

const WEB_FILE: &str = "src/app/preview/Button-abcd1234/page.tsx";
const WEB_BRANCH: &str = "codegen/Button-abcd1234";

fn web_agent(model: Arc<dyn ModelClient>, workspace: Arc<MockWorkspace>) -> CodegenAgent {
    CodegenAgent::builder()
        .with_model(model)
        .add_docs_source(
            Platform::Web,
            Arc::new(StaticDocs::new(&[("Button", "Press it."), ("Card", "A box.")])),
        )
        .add_pipeline(PlatformConfig::web(), workspace)
        .with_reporter(StatusReporter::new("abcd1234-efgh-5678", Arc::new(MemorySink::new())))
        .build()
        .unwrap()
}

#[tokio::test]
async fn scenario_missing_design_tree_stops_before_any_side_effect() {
    let workspace = arc(MockWorkspace::new());
    let agent = web_agent(arc(ConstModel("code".into())), workspace.clone());

    let state = ExecutionState::builder()
        .with_task_id("abcd1234-efgh-5678")
        .with_component_name("Button")
        .build();

    let final_state = agent.run(state).await.unwrap();

    let last_common = final_state
        .status_history
        .iter()
        .rev()
        .find(|event| event.scope == StatusScope::Common)
        .unwrap();
    assert_eq!(last_common.status, Status::Error);

    // No pipeline executed: no branch prepared, no file written, no
    // platform-scoped events.
    assert!(workspace.prepared_branches.lock().is_empty());
    assert!(workspace.files.lock().is_empty());
    assert!(
        final_state
            .status_history
            .iter()
            .all(|event| event.scope != StatusScope::Web)
    );
}

#[tokio::test]
async fn scenario_clean_first_pass_publishes_with_zero_retries() {
    let workspace = arc(MockWorkspace::new());
    let model = arc(ScriptedModel::new(vec![Ok(
        "```tsx\nexport default function Button() {}\n```",
    )]));
    let agent = web_agent(model.clone(), workspace.clone());

    let final_state = agent.run(base_state()).await.unwrap();
    let slot = final_state.slot(Platform::Web);

    // Fence markers were stripped before the write.
    assert_eq!(
        workspace.file(WEB_FILE).unwrap(),
        "export default function Button() {}"
    );
    assert_eq!(slot.code.as_deref(), Some("export default function Button() {}"));
    assert_eq!(slot.retry_count, 0);
    assert_eq!(slot.lint_errors, None);

    let pushes = workspace.pushes.lock();
    assert_eq!(pushes.len(), 1);
    let (message, branch) = &pushes[0];
    assert_eq!(branch, WEB_BRANCH);
    assert_eq!(message, "feat(Button-abcd1234): generate web component");

    // The generation prompt carried the retrieved docs and the tree.
    let prompts = model.prompts.lock();
    assert!(prompts[0].1.contains("### Button\nPress it."));
    assert!(prompts[0].1.contains("componentProperties"));
}

#[tokio::test]
async fn scenario_two_failing_lints_then_clean_publishes_via_the_loop() {
    let long_diagnostics = "no-unused-vars ".repeat(40); // 600 chars
    let workspace = arc(MockWorkspace::with_lint_script(vec![
        lint_fail("unexpected token"),
        lint_fail(&long_diagnostics),
        lint_pass(),
    ]));
    let model = arc(ScriptedModel::new(vec![
        Ok("let x = 1"),
        Ok("let x = 2"),
        Ok("let x = 3"),
    ]));
    let agent = web_agent(model.clone(), workspace.clone());

    let final_state = agent.run(base_state()).await.unwrap();
    let slot = final_state.slot(Platform::Web);

    // Clean exit through the loop, not the ceiling.
    assert_eq!(slot.retry_count, 2);
    assert_eq!(slot.lint_errors, None);
    assert_eq!(slot.code.as_deref(), Some("let x = 3"));

    let pushes = workspace.pushes.lock();
    assert_eq!(pushes.len(), 1);
    assert!(!pushes[0].0.contains("forced"));

    // The second fix prompt received the full, untruncated diagnostics...
    let prompts = model.prompts.lock();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[2].1.contains(long_diagnostics.trim_end()));

    // ...while the logged warning detail was bounded to 500 characters.
    let warning_details: Vec<usize> = final_state
        .status_history
        .iter()
        .filter(|event| event.status == Status::Warning)
        .filter_map(|event| event.details.as_ref())
        .filter_map(|details| details["errors"].as_str().map(str::len))
        .collect();
    assert!(warning_details.contains(&500));
}

#[tokio::test]
async fn scenario_retry_ceiling_forces_publish_with_marker() {
    let workspace = arc(MockWorkspace::with_lint_script(vec![
        lint_fail("bad"),
        lint_fail("still bad"),
        lint_fail("hopeless"),
    ]));
    let model = arc(ScriptedModel::new(vec![
        Ok("attempt 0"),
        Ok("attempt 1"),
        Ok("attempt 2"),
    ]));
    let agent = web_agent(model, workspace.clone());

    let final_state = agent.run(base_state()).await.unwrap();
    let slot = final_state.slot(Platform::Web);

    assert_eq!(slot.retry_count, 3);
    assert_eq!(slot.lint_errors.as_deref(), Some("hopeless"));

    let pushes = workspace.pushes.lock();
    assert_eq!(pushes.len(), 1);
    assert!(pushes[0].0.ends_with("(forced push with lint errors)"));

    // The forced publish is marked in the status log too.
    assert!(final_state.status_history.iter().any(|event| {
        event.status == Status::Warning && event.message.contains("despite outstanding lint errors")
    }));
}

#[tokio::test]
async fn scenario_generation_failure_degrades_without_crashing() {
    let workspace = arc(MockWorkspace::new());
    let agent = web_agent(arc(FailingModel), workspace.clone());

    let final_state = agent.run(base_state()).await.unwrap();
    let slot = final_state.slot(Platform::Web);

    // No code was ever produced; the write stage skipped instead of
    // crashing and the loop stayed bounded.
    assert_eq!(slot.code, None);
    assert!(workspace.files.lock().is_empty());
    assert!(final_state.status_history.iter().any(|event| {
        event.status == Status::Error && event.message.contains("code generation failed")
    }));
}

#[tokio::test]
async fn broken_mobile_docs_leave_web_branch_untouched() {
    let web_workspace = arc(MockWorkspace::new());
    let mobile_workspace = arc(MockWorkspace::new());
    let web_docs = arc(StaticDocs::new(&[("Button", "Press it.")]));

    let agent = CodegenAgent::builder()
        .with_model(arc(ConstModel("generated".into())))
        .add_docs_source(Platform::Web, web_docs.clone())
        .add_docs_source(Platform::Mobile, Arc::new(BrokenDocs))
        .add_pipeline(PlatformConfig::web(), web_workspace.clone())
        .add_pipeline(PlatformConfig::mobile(), mobile_workspace.clone())
        .build()
        .unwrap();

    let final_state = agent.run(base_state()).await.unwrap();

    assert_eq!(
        final_state.slot(Platform::Web).code.as_deref(),
        Some("generated")
    );
    assert_eq!(
        final_state.slot(Platform::Mobile).docs.as_deref(),
        Some(DOCS_ERROR_PLACEHOLDER)
    );
    // Both branches published; the docs sources were released afterwards.
    assert_eq!(web_workspace.pushes.lock().len(), 1);
    assert_eq!(mobile_workspace.pushes.lock().len(), 1);
    assert!(web_docs.was_closed());
}

#[tokio::test]
async fn failed_web_setup_does_not_abort_the_mobile_branch() {
    let web_workspace = arc(MockWorkspace::failing_prepare());
    let mobile_workspace = arc(MockWorkspace::new());

    let agent = CodegenAgent::builder()
        .with_model(arc(ConstModel("generated".into())))
        .add_pipeline(PlatformConfig::web(), web_workspace.clone())
        .add_pipeline(PlatformConfig::mobile(), mobile_workspace.clone())
        .build()
        .unwrap();

    let err = agent.run(base_state()).await.err().unwrap();
    match err {
        RunnerError::NodeFailures { failures, state } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].node, NodeKind::custom("prepare_web"));

            // The mobile branch ran to publish regardless.
            assert_eq!(mobile_workspace.pushes.lock().len(), 1);
            assert!(web_workspace.pushes.lock().is_empty());
            assert!(state.status_history.iter().any(|event| {
                event.scope == StatusScope::Mobile && event.message.contains("pushed")
            }));
        }
        other => panic!("expected NodeFailures, got: {other:?}"),
    }
}

#[tokio::test]
async fn push_failure_is_recorded_and_propagated() {
    let workspace = arc(MockWorkspace {
        fail_push: true,
        ..MockWorkspace::default()
    });
    let agent = web_agent(arc(ConstModel("generated".into())), workspace);

    let err = agent.run(base_state()).await.err().unwrap();
    match err {
        RunnerError::NodeFailures { failures, state } => {
            assert_eq!(failures[0].node, NodeKind::custom("push_web"));
            // The rest of the branch completed first: code survived lint.
            assert!(state.slot(Platform::Web).code.is_some());
        }
        other => panic!("expected NodeFailures, got: {other:?}"),
    }
}
