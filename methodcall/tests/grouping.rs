use methodcall::{
    AsyncLogEvent, FatalError, FatalKind, Level, LogEventInfo, Parameter, ParameterRenderer,
    ParameterType, ParameterValue, TargetBuilder,
    testing::{FailingInvoker, RecordingContinuation, RecordingInvoker},
};

mod common;
use common::{bracketed_messages, events, message_parameter, recording_target, template};

fn batch(messages: &[&str], outcomes: &RecordingContinuation) -> Vec<AsyncLogEvent<LogEventInfo>> {
    events(messages)
        .into_iter()
        .map(|event| AsyncLogEvent::new(event, outcomes.continuation()))
        .collect()
}

#[test]
fn test_grouped_brackets() {
    let (target, recorder) = recording_target(vec![bracketed_messages()]);
    let outcomes = RecordingContinuation::new();

    target
        .write_group(batch(&["a", "b", "c"], &outcomes))
        .unwrap();

    assert_eq!(recorder.calls(), vec![vec![ParameterValue::from("[a,b,c]")]]);
    assert_eq!(outcomes.count(), 3);
    assert!(outcomes.all_succeeded());
}

#[test]
fn test_single_write_renders_group_around_one_event() {
    let (target, recorder) = recording_target(vec![bracketed_messages()]);
    target
        .write(AsyncLogEvent::detached(LogEventInfo::message("solo")))
        .unwrap();
    assert_eq!(recorder.calls(), vec![vec![ParameterValue::from("[solo]")]]);
}

#[test]
fn test_group_layouts_seeded_with_neighbouring_events() {
    let parameter = Parameter::new(template("${message}"))
        .grouped()
        .header(template("h(${message})"))
        .separator(template("s(${message})"))
        .footer(template("f(${message})"));
    let (target, recorder) = recording_target(vec![parameter]);

    target
        .write_group(batch(&["1", "2", "3"], &RecordingContinuation::new()))
        .unwrap();

    assert_eq!(
        recorder.calls(),
        vec![vec![ParameterValue::from("h(1)1s(2)2s(3)3f(3)")]]
    );
}

#[test]
fn test_without_grouped_parameters_each_event_is_invoked() {
    let (target, recorder) = recording_target(vec![message_parameter()]);
    let outcomes = RecordingContinuation::new();

    target
        .write_group(batch(&["a", "b", "c"], &outcomes))
        .unwrap();

    assert_eq!(
        recorder.calls(),
        vec![
            vec![ParameterValue::from("a")],
            vec![ParameterValue::from("b")],
            vec![ParameterValue::from("c")],
        ]
    );
    assert_eq!(outcomes.count(), 3);
}

#[test]
fn test_non_grouped_values_split_runs() {
    let (target, recorder) = recording_target(vec![
        Parameter::new(template("${logger}")),
        bracketed_messages(),
    ]);
    let outcomes = RecordingContinuation::new();

    let events = vec![
        LogEventInfo::new(methodcall::Level::Info, "web", "a"),
        LogEventInfo::new(methodcall::Level::Info, "web", "b"),
        LogEventInfo::new(methodcall::Level::Info, "db", "c"),
    ];
    target
        .write_group(
            events
                .into_iter()
                .map(|e| AsyncLogEvent::new(e, outcomes.continuation()))
                .collect(),
        )
        .unwrap();

    assert_eq!(
        recorder.calls(),
        vec![
            vec![ParameterValue::from("web"), ParameterValue::from("[a,b]")],
            vec![ParameterValue::from("db"), ParameterValue::from("[c]")],
        ]
    );
    assert_eq!(outcomes.count(), 3);
}

#[test]
fn test_group_failure_fans_out_to_every_event() {
    let target = TargetBuilder::new(methodcall::testing::FailingInvoker::recoverable("busy"))
        .parameter(bracketed_messages())
        .build()
        .unwrap();
    let outcomes = RecordingContinuation::new();

    target
        .write_group(batch(&["a", "b"], &outcomes))
        .unwrap();

    assert_eq!(
        outcomes.errors(),
        vec![
            "invocation failed: busy".to_string(),
            "invocation failed: busy".to_string()
        ]
    );
}

#[test]
fn test_fatal_group_failure_stops_batch() {
    let backend = FailingInvoker::fatal(FatalKind::OutOfMemory);
    let target = TargetBuilder::new(backend.clone())
        .parameter(Parameter::new(template("${logger}")))
        .parameter(bracketed_messages())
        .build()
        .unwrap();
    let outcomes = RecordingContinuation::new();

    let result = target.write_group(
        [("web", "a"), ("web", "b"), ("db", "c")]
            .into_iter()
            .map(|(logger, message)| {
                AsyncLogEvent::new(
                    LogEventInfo::new(Level::Info, logger, message),
                    outcomes.continuation(),
                )
            })
            .collect(),
    );

    let err = result.unwrap_err();
    let fatal = err.inner().downcast_ref::<FatalError>().unwrap();
    assert_eq!(fatal.kind(), FatalKind::OutOfMemory);
    assert_eq!(backend.attempts(), 1, "the later run is never invoked");
    assert_eq!(outcomes.count(), 0);
}

#[test]
fn test_fatal_failure_without_grouped_parameters_stops_batch() {
    let backend = FailingInvoker::fatal(FatalKind::Aborted);
    let target = TargetBuilder::new(backend.clone())
        .parameter(message_parameter())
        .build()
        .unwrap();
    let outcomes = RecordingContinuation::new();

    let result = target.write_group(batch(&["a", "b", "c"], &outcomes));

    assert!(result.is_err());
    assert_eq!(backend.attempts(), 1);
    assert_eq!(outcomes.count(), 0);
}

#[test]
fn test_threshold_switch_does_not_change_output() {
    let messages: Vec<String> = (0..200).map(|i| format!("message-{i}")).collect();
    let refs: Vec<&str> = messages.iter().map(String::as_str).collect();

    let render = |threshold: usize| {
        let recorder = RecordingInvoker::new();
        let target = TargetBuilder::new(recorder.clone())
            .parameter(bracketed_messages())
            .group_buffer_threshold(threshold)
            .build()
            .unwrap();
        target
            .write_group(batch(&refs, &RecordingContinuation::new()))
            .unwrap();
        recorder.calls()
    };

    let unbounded = render(usize::MAX);
    assert_eq!(render(0), unbounded);
    assert_eq!(render(1), unbounded);
    assert_eq!(render(100), unbounded);
}

#[test]
fn test_large_group_crosses_default_threshold() {
    let line = "x".repeat(1024);
    let events: Vec<LogEventInfo> = (0..200).map(|_| LogEventInfo::message(line.clone())).collect();
    let parameter = bracketed_messages();

    let rendered = ParameterRenderer::new().render_group(events.iter(), &parameter);
    let expected = format!("[{}]", vec![line.as_str(); 200].join(","));
    assert!(rendered.len() > methodcall::GROUP_BUFFER_THRESHOLD);
    assert_eq!(rendered, expected);
}

#[test]
fn test_rendering_is_idempotent() {
    let parameter = Parameter::new(template("${sequence}")).with_type(ParameterType::U64);
    let event = LogEventInfo::message("m").with_sequence(42);
    let renderer = ParameterRenderer::new();

    let first = renderer.render_single(&event, &parameter, true).unwrap();
    let second = renderer.render_single(&event, &parameter, true).unwrap();
    assert_eq!(first, Some(ParameterValue::U64(42)));
    assert_eq!(first, second);
}
