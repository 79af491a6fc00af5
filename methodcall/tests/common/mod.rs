#![allow(dead_code)]

use methodcall::{
    LogEventInfo, MethodCallTarget, Parameter, TargetBuilder, layouts::{Literal, TemplateLayout},
    testing::RecordingInvoker,
};

// ============================================================================
// Layout Helpers
// ============================================================================

pub fn template(text: &str) -> TemplateLayout {
    TemplateLayout::parse(text).expect("valid template")
}

pub fn message_parameter() -> Parameter<LogEventInfo> {
    Parameter::new(template("${message}"))
}

/// A grouped `${message}` parameter rendered as `[m1,m2,...]`.
pub fn bracketed_messages() -> Parameter<LogEventInfo> {
    Parameter::new(template("${message}"))
        .grouped()
        .header(Literal::new("["))
        .separator(Literal::new(","))
        .footer(Literal::new("]"))
}

// ============================================================================
// Targets
// ============================================================================

pub fn recording_target(
    parameters: Vec<Parameter<LogEventInfo>>,
) -> (MethodCallTarget<LogEventInfo, RecordingInvoker>, RecordingInvoker) {
    let recorder = RecordingInvoker::new();
    let target = TargetBuilder::new(recorder.clone())
        .parameters(parameters)
        .build()
        .expect("valid target");
    (target, recorder)
}

pub fn events(messages: &[&str]) -> Vec<LogEventInfo> {
    messages.iter().map(|m| LogEventInfo::message(*m)).collect()
}
