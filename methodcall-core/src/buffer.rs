//! Rendering buffers and the optional buffer pool.
//!
//! A [`BufferPool`] hands out [`PooledBuffer`] guards. A guard owns its
//! buffer exclusively and returns it to the pool when dropped, on every exit
//! path including early returns and panics. Buffers that grew beyond the
//! pool's capacity ceiling are discarded instead of retained.

use parking_lot::Mutex;
use std::{
    fmt,
    ops::{Deref, DerefMut},
};

/// Length of accumulated group text after which each further item is
/// rendered through a small local buffer.
pub const GROUP_BUFFER_THRESHOLD: usize = 128 * 1024;

/// Initial capacity of the local buffer used past the threshold.
pub const LOCAL_BUFFER_CAPACITY: usize = 16;

/// Largest batch for which a pooled buffer is used in a group render.
pub const POOLED_BATCH_LIMIT: usize = 1000;

/// Default number of idle buffers a pool keeps.
pub const DEFAULT_POOL_SIZE: usize = 8;

/// Default largest capacity a buffer may have to be returned to a pool.
pub const DEFAULT_MAX_POOLED_CAPACITY: usize = 2 * GROUP_BUFFER_THRESHOLD;

/// A pool of reusable `String` buffers.
pub struct BufferPool {
    free: Mutex<Vec<String>>,
    max_idle: usize,
    max_capacity: usize,
}

impl BufferPool {
    /// Create a pool with the default limits.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_POOL_SIZE, DEFAULT_MAX_POOLED_CAPACITY)
    }

    /// Create a pool retaining at most `max_idle` buffers, each with a
    /// capacity of at most `max_capacity`.
    pub fn with_limits(max_idle: usize, max_capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(max_idle)),
            max_idle,
            max_capacity,
        }
    }

    /// Take an empty buffer out of the pool, allocating one if none is idle.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buffer = self.free.lock().pop().unwrap_or_default();
        PooledBuffer {
            pool: self,
            buffer,
        }
    }

    /// Number of idle buffers currently held.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }

    fn release(&self, mut buffer: String) {
        if buffer.capacity() > self.max_capacity {
            return;
        }
        buffer.clear();
        let mut free = self.free.lock();
        if free.len() < self.max_idle {
            free.push(buffer);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("idle", &self.idle())
            .field("max_idle", &self.max_idle)
            .field("max_capacity", &self.max_capacity)
            .finish()
    }
}

/// A buffer borrowed from a [`BufferPool`], returned on drop.
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buffer: String,
}

impl Deref for PooledBuffer<'_> {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buffer));
    }
}
