mod common;

use common::*;
use std::sync::Arc;
use uiforge::graphs::{CompileError, EdgeRouter, GraphBuilder};
use uiforge::types::NodeKind;

#[test]
fn empty_graph_fails_to_compile() {
    let err = GraphBuilder::new().compile().err().unwrap();
    assert!(matches!(err, CompileError::MissingEntry));
}

#[test]
fn entry_via_unconditional_edge_compiles() {
    let app = GraphBuilder::new()
        .add_node(NodeKind::custom("work"), NoopNode)
        .add_edge(NodeKind::Start, NodeKind::custom("work"))
        .add_edge(NodeKind::custom("work"), NodeKind::End)
        .compile()
        .unwrap();
    assert_eq!(app.nodes().len(), 1);
    assert!(app.edges().contains_key(&NodeKind::Start));
}

#[test]
fn entry_via_conditional_edge_compiles() {
    let router: EdgeRouter = Arc::new(|_| NodeKind::custom("work"));
    let app = GraphBuilder::new()
        .add_node(NodeKind::custom("work"), NoopNode)
        .add_conditional_edge(NodeKind::Start, router)
        .compile()
        .unwrap();
    assert_eq!(app.conditional_edges().len(), 1);
    assert!(app.router_for(&NodeKind::Start).is_some());
}

#[test]
fn unknown_edge_target_is_rejected() {
    let err = GraphBuilder::new()
        .add_node(NodeKind::custom("work"), NoopNode)
        .add_edge(NodeKind::Start, NodeKind::custom("work"))
        .add_edge(NodeKind::custom("work"), NodeKind::custom("ghost"))
        .compile()
        .err()
        .unwrap();
    match err {
        CompileError::UnknownNode { node } => assert_eq!(node, "ghost"),
        other => panic!("expected UnknownNode, got: {other:?}"),
    }
}

#[test]
fn unknown_edge_source_is_rejected() {
    let err = GraphBuilder::new()
        .add_node(NodeKind::custom("work"), NoopNode)
        .add_edge(NodeKind::Start, NodeKind::custom("work"))
        .add_edge(NodeKind::custom("ghost"), NodeKind::End)
        .compile()
        .err()
        .unwrap();
    assert!(matches!(err, CompileError::UnknownNode { .. }));
}

#[test]
fn duplicate_conditional_edge_is_rejected() {
    let router: EdgeRouter = Arc::new(|_| NodeKind::End);
    let err = GraphBuilder::new()
        .add_node(NodeKind::custom("work"), NoopNode)
        .add_edge(NodeKind::Start, NodeKind::custom("work"))
        .add_conditional_edge(NodeKind::custom("work"), router.clone())
        .add_conditional_edge(NodeKind::custom("work"), router)
        .compile()
        .err()
        .unwrap();
    match err {
        CompileError::DuplicateRouter { node } => assert_eq!(node, "work"),
        other => panic!("expected DuplicateRouter, got: {other:?}"),
    }
}

#[test]
fn virtual_node_registration_is_ignored() {
    let app = GraphBuilder::new()
        .add_node(NodeKind::Start, NoopNode)
        .add_node(NodeKind::End, NoopNode)
        .add_node(NodeKind::custom("work"), NoopNode)
        .add_edge(NodeKind::Start, NodeKind::custom("work"))
        .compile()
        .unwrap();
    // Only the custom node made it into the registry.
    assert_eq!(app.nodes().len(), 1);
}

#[test]
fn fan_out_edges_accumulate() {
    let app = GraphBuilder::new()
        .add_node(NodeKind::custom("a"), NoopNode)
        .add_node(NodeKind::custom("b"), NoopNode)
        .add_edge(NodeKind::Start, NodeKind::custom("a"))
        .add_edge(NodeKind::Start, NodeKind::custom("b"))
        .compile()
        .unwrap();
    let targets = app.edges().get(&NodeKind::Start).unwrap();
    assert_eq!(targets.len(), 2);
    assert!(targets.contains(&NodeKind::custom("a")));
    assert!(targets.contains(&NodeKind::custom("b")));
}

#[test]
fn conditional_router_is_evaluated_against_state() {
    let router: EdgeRouter = Arc::new(|state| {
        if state.design_tree.is_some() {
            NodeKind::custom("work")
        } else {
            NodeKind::End
        }
    });
    let app = GraphBuilder::new()
        .add_node(NodeKind::custom("work"), NoopNode)
        .add_conditional_edge(NodeKind::Start, router)
        .compile()
        .unwrap();

    let edge = app.router_for(&NodeKind::Start).unwrap();
    assert_eq!((edge.router())(&base_state()), NodeKind::custom("work"));
    let empty = uiforge::state::ExecutionState::builder().build();
    assert_eq!((edge.router())(&empty), NodeKind::End);
}
