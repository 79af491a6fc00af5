//! # Parameter Renderer
//!
//! Turns events into argument values.
//!
//! - [`ParameterRenderer::render_single`] produces one parameter's value for
//!   one event.
//! - [`ParameterRenderer::render_group`] produces a grouped parameter's text
//!   for a whole batch: `header + v0 + sep(e1) + v1 + ... + footer`.
//!
//! # Buffer bounding
//!
//! A group render appends every item into one shared buffer. Once that buffer
//! reaches the configured threshold, every remaining item is rendered into a
//! small local buffer first and then copied over. The switch happens at most
//! once per render and never changes the resulting text.

use crate::{
    buffer::{
        BufferPool, GROUP_BUFFER_THRESHOLD, LOCAL_BUFFER_CAPACITY, POOLED_BATCH_LIMIT,
    },
    error::CoercionError,
    layout::Layout,
    parameter::{GroupLayouts, Parameter},
    value::{ParameterType, ParameterValue},
};
use std::sync::Arc;

/// Renders parameters, optionally reusing buffers from a pool.
#[derive(Debug, Clone)]
pub struct ParameterRenderer {
    pool: Option<Arc<BufferPool>>,
    group_buffer_threshold: usize,
    pooled_batch_limit: usize,
}

impl ParameterRenderer {
    /// A renderer that allocates fresh buffers.
    pub fn new() -> Self {
        Self {
            pool: None,
            group_buffer_threshold: GROUP_BUFFER_THRESHOLD,
            pooled_batch_limit: POOLED_BATCH_LIMIT,
        }
    }

    /// Reuse buffers from `pool` where the batch size allows.
    pub fn with_pool(mut self, pool: Arc<BufferPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Override the length at which group rendering switches to local buffers.
    pub fn with_group_buffer_threshold(mut self, threshold: usize) -> Self {
        self.group_buffer_threshold = threshold;
        self
    }

    /// Override the largest batch rendered into a pooled buffer.
    pub fn with_pooled_batch_limit(mut self, limit: usize) -> Self {
        self.pooled_batch_limit = limit;
        self
    }

    /// The buffer pool, if buffer reuse is enabled.
    pub fn pool(&self) -> Option<&Arc<BufferPool>> {
        self.pool.as_ref()
    }

    /// The group buffer threshold.
    pub fn group_buffer_threshold(&self) -> usize {
        self.group_buffer_threshold
    }

    /// Render one parameter for one event.
    ///
    /// Grouped parameters render as `header + value + footer` text when
    /// `include_grouped` is set and leave the slot unset (`None`) otherwise.
    /// Other parameters are coerced to their declared type.
    pub fn render_single<E: ?Sized>(
        &self,
        event: &E,
        parameter: &Parameter<E>,
        include_grouped: bool,
    ) -> Result<Option<ParameterValue>, CoercionError> {
        if let Some(group) = parameter.group() {
            if !include_grouped {
                return Ok(None);
            }
            let text = self.with_buffer(true, |buffer| {
                append_optional(group.header, event, buffer);
                append_value(parameter, event, buffer);
                append_optional(group.footer, event, buffer);
            });
            return Ok(Some(ParameterValue::String(text)));
        }

        if parameter.parameter_type() == ParameterType::String {
            let text = self.with_buffer(true, |buffer| append_value(parameter, event, buffer));
            return Ok(Some(ParameterValue::String(text)));
        }

        match &self.pool {
            Some(pool) => {
                let mut buffer = pool.acquire();
                append_value(parameter, event, &mut *buffer);
                parameter.parameter_type().coerce(buffer.as_str()).map(Some)
            }
            None => {
                let mut buffer = String::new();
                append_value(parameter, event, &mut buffer);
                parameter.parameter_type().coerce(&buffer).map(Some)
            }
        }
    }

    /// Render a grouped parameter over a batch.
    ///
    /// The header is seeded with the first event, each separator with the
    /// event that follows it, and the footer with the last event. An empty
    /// batch renders as empty text.
    pub fn render_group<'e, E, I>(&self, events: I, parameter: &Parameter<E>) -> String
    where
        E: ?Sized + 'e,
        I: IntoIterator<Item = &'e E>,
        I::IntoIter: ExactSizeIterator,
    {
        let events = events.into_iter();
        let pooled = events.len() <= self.pooled_batch_limit;
        self.with_buffer(pooled, |buffer| {
            self.render_group_into(events, parameter, buffer)
        })
    }

    /// Render a grouped parameter over a batch, appending into `buffer`.
    pub fn render_group_into<'e, E, I>(
        &self,
        events: I,
        parameter: &Parameter<E>,
        buffer: &mut String,
    ) where
        E: ?Sized + 'e,
        I: IntoIterator<Item = &'e E>,
    {
        let group = parameter.group().unwrap_or(GroupLayouts {
            header: None,
            separator: None,
            footer: None,
        });

        let mut events = events.into_iter();
        let Some(first) = events.next() else {
            return;
        };

        append_optional(group.header, first, buffer);
        append_value(parameter, first, buffer);

        let mut last = first;
        let mut local_mode = false;
        for event in events {
            if !local_mode && buffer.len() >= self.group_buffer_threshold {
                local_mode = true;
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    len = buffer.len(),
                    threshold = self.group_buffer_threshold,
                    "group buffer threshold reached, rendering through local buffers"
                );
            }

            if local_mode {
                let mut local = String::with_capacity(LOCAL_BUFFER_CAPACITY);
                append_optional(group.separator, event, &mut local);
                append_value(parameter, event, &mut local);
                buffer.push_str(&local);
            } else {
                append_optional(group.separator, event, buffer);
                append_value(parameter, event, buffer);
            }
            last = event;
        }

        append_optional(group.footer, last, buffer);
    }

    fn with_buffer<F>(&self, allow_pool: bool, fill: F) -> String
    where
        F: FnOnce(&mut String),
    {
        match &self.pool {
            Some(pool) if allow_pool => {
                let mut buffer = pool.acquire();
                fill(&mut *buffer);
                buffer.as_str().to_owned()
            }
            _ => {
                let mut buffer = String::new();
                fill(&mut buffer);
                buffer
            }
        }
    }
}

impl Default for ParameterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn append_value<E: ?Sized>(parameter: &Parameter<E>, event: &E, buffer: &mut String) {
    if let Some(layout) = parameter.layout() {
        layout.render_append(event, buffer);
    }
}

fn append_optional<E: ?Sized>(layout: Option<&dyn Layout<E>>, event: &E, buffer: &mut String) {
    if let Some(layout) = layout {
        layout.render_append(event, buffer);
    }
}
