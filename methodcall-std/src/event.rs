//! A general-purpose log event.

use methodcall_core::LogEvent;
use std::{
    borrow::Cow,
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Very fine-grained diagnostics.
    Trace,
    /// Debugging information.
    Debug,
    /// Normal operation.
    Info,
    /// Something unexpected, but handled.
    Warn,
    /// A failed operation.
    Error,
    /// The application cannot continue.
    Fatal,
}

impl Level {
    /// Name as rendered by the `level` property.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "Trace",
            Level::Debug => "Debug",
            Level::Info => "Info",
            Level::Warn => "Warn",
            Level::Error => "Error",
            Level::Fatal => "Fatal",
        }
    }

    /// Numeric severity, `0` for trace up to `5` for fatal.
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A log event with a level, logger name, message and free-form properties.
///
/// # Properties
///
/// | name            | value                          |
/// |-----------------|--------------------------------|
/// | `level`         | `Trace` .. `Fatal`             |
/// | `level_ordinal` | `0` .. `5`                     |
/// | `logger`        | the logger name                |
/// | `message`       | the formatted message          |
/// | `sequence`      | process-wide increasing number |
///
/// Any other name is looked up among the custom properties.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEventInfo {
    level: Level,
    logger: String,
    message: String,
    sequence: u64,
    properties: Vec<(String, String)>,
}

impl LogEventInfo {
    /// Create an event, assigning the next sequence number.
    pub fn new(level: Level, logger: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            logger: logger.into(),
            message: message.into(),
            sequence: NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed),
            properties: Vec::new(),
        }
    }

    /// An `Info` event with an empty logger name.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(Level::Info, "", message)
    }

    /// Attach a custom property. A later value for the same name wins.
    pub fn with_property(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        let name = name.into();
        let value = value.to_string();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((name, value)),
        }
        self
    }

    /// Override the sequence number.
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Severity.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Logger name.
    pub fn logger(&self) -> &str {
        &self.logger
    }

    /// Formatted message.
    pub fn text(&self) -> &str {
        &self.message
    }

    /// Sequence number.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl LogEvent for LogEventInfo {
    fn property(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "level" => Some(Cow::Borrowed(self.level.as_str())),
            "level_ordinal" => Some(Cow::Owned(self.level.ordinal().to_string())),
            "logger" => Some(Cow::Borrowed(&self.logger)),
            "message" => Some(Cow::Borrowed(&self.message)),
            "sequence" => Some(Cow::Owned(self.sequence.to_string())),
            _ => self
                .properties
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| Cow::Borrowed(v.as_str())),
        }
    }
}
