//! Segment buffer pool
//!
//! Dispatch splits every request path into a `Vec<Span>`. The pool keeps
//! a bounded number of those buffers around so a busy router stops
//! allocating them. Spans only index into the request's own path, so a
//! recycled buffer never aliases a value a handler can still see.

use parking_lot::Mutex;
use sprig_trie::Span;
use std::ops::{Deref, DerefMut};

/// Bounded pool of span buffers
#[derive(Debug)]
pub struct SegmentPool {
    buffers: Mutex<Vec<Vec<Span>>>,
    capacity: usize,
}

impl SegmentPool {
    /// Create a pool retaining at most `capacity` idle buffers
    ///
    /// A capacity of 0 disables pooling; every acquire allocates.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Take an empty buffer, reusing an idle one when available
    pub fn acquire(&self) -> PooledSpans<'_> {
        let buf = if self.capacity == 0 {
            Vec::new()
        } else {
            self.buffers.lock().pop().unwrap_or_default()
        };
        PooledSpans { pool: self, buf }
    }

    fn release(&self, mut buf: Vec<Span>) {
        if self.capacity == 0 {
            return;
        }
        buf.clear();
        let mut buffers = self.buffers.lock();
        if buffers.len() < self.capacity {
            buffers.push(buf);
        }
    }

    /// Number of idle buffers
    pub fn idle(&self) -> usize {
        self.buffers.lock().len()
    }

    /// Maximum number of idle buffers
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Span buffer borrowed from a [`SegmentPool`], returned on drop
#[derive(Debug)]
pub struct PooledSpans<'a> {
    pool: &'a SegmentPool,
    buf: Vec<Span>,
}

impl Deref for PooledSpans<'_> {
    type Target = Vec<Span>;

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl DerefMut for PooledSpans<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl Drop for PooledSpans<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}
