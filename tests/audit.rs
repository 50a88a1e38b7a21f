use std::sync::Arc;
use uiforge::audit::{AuditSink, ChannelSink, LogSink, MemorySink, StatusReporter};
use uiforge::status::{Status, StatusEvent, StatusScope};

#[tokio::test]
async fn reporter_forwards_events_in_order_with_task_id() {
    let sink = Arc::new(MemorySink::new());
    let reporter = StatusReporter::new("task-42", sink.clone());

    for i in 0..5 {
        reporter
            .report(&StatusEvent::info(StatusScope::Common, format!("event {i}")))
            .await;
    }

    let captured = sink.snapshot();
    assert_eq!(captured.len(), 5);
    for (i, (task_id, event)) in captured.iter().enumerate() {
        assert_eq!(task_id, "task-42");
        assert_eq!(event.message, format!("event {i}"));
    }
}

#[tokio::test]
async fn channel_sink_streams_events() {
    let (tx, rx) = flume::unbounded();
    let reporter = StatusReporter::new("task-7", Arc::new(ChannelSink::new(tx)));

    reporter
        .report(&StatusEvent::pending(StatusScope::Web, "starting"))
        .await;
    reporter
        .report(&StatusEvent::success(StatusScope::Web, "done"))
        .await;

    let first = rx.recv().unwrap();
    let second = rx.recv().unwrap();
    assert_eq!(first.status, Status::Pending);
    assert_eq!(second.status, Status::Success);
}

#[tokio::test]
async fn dropped_channel_receiver_never_propagates() {
    let (tx, rx) = flume::unbounded();
    drop(rx);
    let reporter = StatusReporter::new("task-7", Arc::new(ChannelSink::new(tx)));

    // The sink errors internally; report swallows it.
    reporter
        .report(&StatusEvent::error(StatusScope::System, "lost"))
        .await;
}

#[tokio::test]
async fn disabled_reporter_is_a_noop() {
    let reporter = StatusReporter::disabled();
    reporter
        .report(&StatusEvent::info(StatusScope::Common, "nowhere"))
        .await;
    assert_eq!(reporter.task_id(), "");
}

#[tokio::test]
async fn log_sink_accepts_events() {
    let result = LogSink
        .append(
            "task-9",
            &StatusEvent::info(StatusScope::Common, "rendered via tracing"),
        )
        .await;
    assert!(result.is_ok());
}

#[test]
fn events_serialize_with_snake_case_tags() {
    let event = StatusEvent::warning(StatusScope::Mobile, "linter found errors")
        .with_details(serde_json::json!({"errors": "x"}));
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["scope"], "mobile");
    assert_eq!(value["status"], "warning");
    assert_eq!(value["details"]["errors"], "x");
}
