//! Template layout: literal text with `${property}` placeholders.

use methodcall_core::{ConfigError, Layout, LogEvent};
use std::{fmt, str::FromStr};

/// A layout parsed from a template such as `"[${level}] ${message}"`.
///
/// # Syntax
///
/// - `${name}` renders the event property `name`, or nothing if absent
/// - `${name:uppercase}` / `${name:lowercase}` apply a case transform
/// - `$$` renders a single `$`
/// - an unterminated `${` is kept as literal text
///
/// The template is parsed once, when the layout is built.
///
/// # Example
///
/// ```rust,ignore
/// let layout = TemplateLayout::parse("${level:uppercase}: ${message}")?;
/// assert_eq!(layout.render(&event), "WARN: disk almost full");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct TemplateLayout {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Property { name: String, case: Case },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Keep,
    Upper,
    Lower,
}

impl TemplateLayout {
    /// Parse a template.
    pub fn parse(template: &str) -> Result<Self, ConfigError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(pos) = rest.find('$') {
            literal.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('$') {
                literal.push('$');
                rest = tail;
                continue;
            }

            let Some(body) = after.strip_prefix('{') else {
                literal.push('$');
                rest = after;
                continue;
            };

            let Some(end) = body.find('}') else {
                // Unterminated placeholder, keep the remainder verbatim.
                literal.push('$');
                rest = after;
                break;
            };

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(parse_placeholder(&body[..end], template)?);
            rest = &body[end + 1..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: template.to_owned(),
            segments,
        })
    }

    /// The template this layout was parsed from.
    pub fn template(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the template has no placeholders.
    pub fn is_fixed(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }
}

fn parse_placeholder(body: &str, template: &str) -> Result<Segment, ConfigError> {
    let (name, option) = match body.split_once(':') {
        Some((name, option)) => (name.trim(), Some(option.trim())),
        None => (body.trim(), None),
    };

    if name.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "empty placeholder in layout `{template}`"
        )));
    }

    let case = match option {
        None => Case::Keep,
        Some(option) if option.eq_ignore_ascii_case("uppercase") => Case::Upper,
        Some(option) if option.eq_ignore_ascii_case("lowercase") => Case::Lower,
        Some(option) => {
            return Err(ConfigError::Invalid(format!(
                "unknown option `{option}` for `{name}` in layout `{template}`"
            )));
        }
    };

    Ok(Segment::Property {
        name: name.to_owned(),
        case,
    })
}

impl<E: LogEvent + ?Sized> Layout<E> for TemplateLayout {
    fn render_append(&self, event: &E, buffer: &mut String) {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => buffer.push_str(text),
                Segment::Property { name, case } => {
                    let Some(value) = event.property(name) else {
                        continue;
                    };
                    match case {
                        Case::Keep => buffer.push_str(&value),
                        Case::Upper => buffer.extend(value.chars().flat_map(char::to_uppercase)),
                        Case::Lower => buffer.extend(value.chars().flat_map(char::to_lowercase)),
                    }
                }
            }
        }
    }
}

impl FromStr for TemplateLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for TemplateLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TemplateLayout").field(&self.source).finish()
    }
}

impl fmt::Display for TemplateLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
