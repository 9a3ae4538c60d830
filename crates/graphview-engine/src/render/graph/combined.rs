use std::time::{Duration, Instant};

use crate::render::pool::{BufferAllocator, BufferPool, PoolStats, PooledBuffer};
use crate::render::RenderError;

pub(super) const COMBINED_USAGE: wgpu::BufferUsages =
    wgpu::BufferUsages::VERTEX.union(wgpu::BufferUsages::COPY_DST);

/// The single instance buffer both pipelines read, backed by a [`BufferPool`].
///
/// Capacity only grows. A stream that no longer fits swaps in a larger pooled
/// buffer and hands the old one back to the pool; nothing is copied forward.
pub(super) struct CombinedBuffer<A: BufferAllocator> {
    pool: BufferPool<A>,
    current: Option<PooledBuffer<A::Buffer>>,
}

impl<A: BufferAllocator> CombinedBuffer<A> {
    pub(super) fn new(allocator: A) -> Self {
        Self {
            pool: BufferPool::new(allocator),
            current: None,
        }
    }

    /// Bytes the current buffer can hold; 0 before the first upload.
    #[inline]
    pub(super) fn capacity(&self) -> u64 {
        self.current.as_ref().map_or(0, |b| b.size())
    }

    #[inline]
    pub(super) fn buffer(&self) -> Option<&A::Buffer> {
        self.current.as_ref().map(|b| b.buffer())
    }

    #[cfg(test)]
    pub(super) fn pool(&self) -> &BufferPool<A> {
        &self.pool
    }

    #[inline]
    pub(super) fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Makes room for `byte_len` bytes.
    ///
    /// Returns `true` when a different buffer is now current.
    pub(super) fn reserve(&mut self, byte_len: u64) -> Result<bool, RenderError> {
        if self.current.is_some() && byte_len <= self.capacity() {
            return Ok(false);
        }

        let next = self.pool.acquire(byte_len, COMBINED_USAGE)?;
        log::debug!(
            "combined instance buffer: {} -> {} bytes",
            self.capacity(),
            next.size()
        );
        if let Some(old) = self.current.replace(next) {
            self.pool.release(old);
        }
        Ok(true)
    }

    /// Destroys parked buffers older than `max_age`; the current one is never
    /// in the pool.
    pub(super) fn reclaim(&mut self, max_age: Duration) -> usize {
        self.reclaim_at(Instant::now(), max_age)
    }

    pub(super) fn reclaim_at(&mut self, now: Instant, max_age: Duration) -> usize {
        self.pool.reclaim_at(now, max_age)
    }

    /// Returns the current buffer to the pool, then destroys everything pooled.
    pub(super) fn dispose(&mut self) {
        if let Some(current) = self.current.take() {
            self.pool.release(current);
        }
        self.pool.dispose();
    }
}
