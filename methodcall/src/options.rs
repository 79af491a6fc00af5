//! Target tuning knobs.

use methodcall_core::{
    BufferPool, DEFAULT_MAX_POOLED_CAPACITY, DEFAULT_POOL_SIZE, GROUP_BUFFER_THRESHOLD,
    POOLED_BATCH_LIMIT, ParameterRenderer,
};
use std::sync::Arc;

/// Rendering options for a [`MethodCallTarget`](crate::MethodCallTarget).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOptions {
    /// Reuse render buffers from a pool instead of allocating per call.
    pub optimize_buffer_reuse: bool,
    /// Output length at which group rendering switches to local buffers.
    pub group_buffer_threshold: usize,
    /// Largest batch whose group output is rendered into a pooled buffer.
    pub pooled_batch_limit: usize,
    /// Number of idle buffers kept by the pool.
    pub pool_size: usize,
    /// Buffers that grew beyond this capacity are not returned to the pool.
    pub max_pooled_capacity: usize,
}

impl Default for TargetOptions {
    fn default() -> Self {
        Self {
            optimize_buffer_reuse: false,
            group_buffer_threshold: GROUP_BUFFER_THRESHOLD,
            pooled_batch_limit: POOLED_BATCH_LIMIT,
            pool_size: DEFAULT_POOL_SIZE,
            max_pooled_capacity: DEFAULT_MAX_POOLED_CAPACITY,
        }
    }
}

impl TargetOptions {
    pub(crate) fn renderer(&self) -> ParameterRenderer {
        let renderer = ParameterRenderer::new()
            .with_group_buffer_threshold(self.group_buffer_threshold)
            .with_pooled_batch_limit(self.pooled_batch_limit);
        if self.optimize_buffer_reuse {
            let pool = BufferPool::with_limits(self.pool_size, self.max_pooled_capacity);
            renderer.with_pool(Arc::new(pool))
        } else {
            renderer
        }
    }
}
