use methodcall::{
    AsyncLogEvent, LogEventInfo, ParameterValue, TargetBuilder,
    testing::{RecordingContinuation, RecordingInvoker},
};
use std::sync::Arc;

mod common;
use common::{bracketed_messages, message_parameter};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_share_one_target() {
    let recorder = RecordingInvoker::new();
    let target = Arc::new(
        TargetBuilder::new(recorder.clone())
            .parameter(message_parameter())
            .optimize_buffer_reuse(true)
            .build()
            .unwrap(),
    );
    let outcomes = RecordingContinuation::new();

    let mut handles = Vec::new();
    for worker in 0..8 {
        let target = target.clone();
        let outcomes = outcomes.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            for i in 0..50 {
                let event = LogEventInfo::message(format!("{worker}-{i}"));
                target
                    .write(AsyncLogEvent::new(event, outcomes.continuation()))
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(recorder.count(), 400);
    assert_eq!(outcomes.count(), 400);
    assert!(outcomes.all_succeeded());

    let mut seen: Vec<String> = recorder
        .calls()
        .into_iter()
        .map(|args| args[0].to_string())
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 400, "every event rendered independently");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_groups_do_not_mix() {
    let recorder = RecordingInvoker::new();
    let target = Arc::new(
        TargetBuilder::new(recorder.clone())
            .parameter(bracketed_messages())
            .optimize_buffer_reuse(true)
            .build()
            .unwrap(),
    );

    let mut handles = Vec::new();
    for worker in ["a", "b", "c", "d"] {
        let target = target.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let batch = (0..3)
                .map(|_| AsyncLogEvent::detached(LogEventInfo::message(worker)))
                .collect();
            target.write_group(batch).unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let mut calls = recorder.calls();
    calls.sort_by_key(|args| args[0].to_string());
    assert_eq!(
        calls,
        vec![
            vec![ParameterValue::from("[a,a,a]")],
            vec![ParameterValue::from("[b,b,b]")],
            vec![ParameterValue::from("[c,c,c]")],
            vec![ParameterValue::from("[d,d,d]")],
        ]
    );
}
