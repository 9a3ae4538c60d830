//! Power-of-two bucketed free-list for GPU buffers.
//!
//! Buffers are keyed by their rounded size. Acquiring pops an idle buffer from
//! the matching bucket (if its usage covers the request) or allocates a new
//! one; releasing pushes it back untouched. Idle buffers are destroyed by
//! `reclaim` once they are older than a given age.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use super::error::RenderError;

/// Smallest bucket; matches `wgpu::COPY_BUFFER_ALIGNMENT`.
pub const MIN_BUCKET: u64 = wgpu::COPY_BUFFER_ALIGNMENT;

/// Rounds a request up to its bucket size.
///
/// Returns `None` when no power of two can hold the request.
#[inline]
pub fn bucket_size(requested: u64) -> Option<u64> {
    requested.max(MIN_BUCKET).checked_next_power_of_two()
}

/// Backend that actually creates and destroys buffers.
pub trait BufferAllocator {
    type Buffer;

    fn allocate(&self, size: u64, usage: wgpu::BufferUsages)
    -> Result<Self::Buffer, RenderError>;

    fn destroy(&self, buffer: Self::Buffer);
}

impl BufferAllocator for wgpu::Device {
    type Buffer = wgpu::Buffer;

    fn allocate(
        &self,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> Result<wgpu::Buffer, RenderError> {
        let max = self.limits().max_buffer_size;
        if size > max {
            return Err(RenderError::BufferTooLarge {
                requested: size,
                max,
            });
        }

        let scope = self.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let buffer = self.create_buffer(&wgpu::BufferDescriptor {
            label: Some("graphview pooled buffer"),
            size,
            usage,
            mapped_at_creation: false,
        });
        // Resolves immediately on native backends.
        if let Some(err) = pollster::block_on(scope.pop()) {
            log::error!("pool: {size} byte allocation failed: {err}");
            buffer.destroy();
            return Err(RenderError::OutOfMemory { requested: size });
        }

        Ok(buffer)
    }

    fn destroy(&self, buffer: wgpu::Buffer) {
        buffer.destroy();
    }
}

/// A buffer handed out by [`BufferPool`].
///
/// Whoever holds it owns it until it is passed back to `release`.
#[derive(Debug)]
pub struct PooledBuffer<B> {
    handle: B,
    size: u64,
    usage: wgpu::BufferUsages,
    created_at: Instant,
    reuse_count: u32,
}

impl<B> PooledBuffer<B> {
    #[inline]
    pub fn buffer(&self) -> &B {
        &self.handle
    }

    /// Bucket size in bytes (always a power of two).
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn usage(&self) -> wgpu::BufferUsages {
        self.usage
    }

    #[inline]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    #[inline]
    pub fn reuse_count(&self) -> u32 {
        self.reuse_count
    }
}

/// Idle buffers in one bucket.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BucketStats {
    pub size: u64,
    pub idle: usize,
    pub bytes: u64,
}

/// Snapshot of pool bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Non-empty buckets, ascending by size.
    pub buckets: Vec<BucketStats>,
    pub allocations: u64,
    pub reuses: u64,
    pub reclaimed: u64,
}

impl PoolStats {
    pub fn idle_buffers(&self) -> usize {
        self.buckets.iter().map(|b| b.idle).sum()
    }

    pub fn idle_bytes(&self) -> u64 {
        self.buckets.iter().map(|b| b.bytes).sum()
    }
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} idle buffer(s), {} bytes; {} allocated, {} reused, {} reclaimed",
            self.idle_buffers(),
            self.idle_bytes(),
            self.allocations,
            self.reuses,
            self.reclaimed
        )
    }
}

pub struct BufferPool<A: BufferAllocator> {
    allocator: A,
    buckets: HashMap<u64, Vec<PooledBuffer<A::Buffer>>>,

    allocations: u64,
    reuses: u64,
    reclaimed: u64,
}

impl<A: BufferAllocator> BufferPool<A> {
    pub fn new(allocator: A) -> Self {
        Self {
            allocator,
            buckets: HashMap::new(),
            allocations: 0,
            reuses: 0,
            reclaimed: 0,
        }
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Hands out a buffer of at least `requested` bytes.
    ///
    /// An idle buffer is only reused if its bucket matches exactly and its
    /// usage flags cover `usage`.
    pub fn acquire(
        &mut self,
        requested: u64,
        usage: wgpu::BufferUsages,
    ) -> Result<PooledBuffer<A::Buffer>, RenderError> {
        let size = bucket_size(requested).ok_or(RenderError::BufferTooLarge {
            requested,
            max: 1 << 63,
        })?;

        if let Some(bucket) = self.buckets.get_mut(&size)
            && let Some(i) = bucket.iter().rposition(|b| b.usage.contains(usage))
        {
            let mut buf = bucket.swap_remove(i);
            if bucket.is_empty() {
                self.buckets.remove(&size);
            }
            buf.reuse_count += 1;
            self.reuses += 1;
            return Ok(buf);
        }

        let handle = self.allocator.allocate(size, usage)?;
        self.allocations += 1;
        log::debug!("pool: allocated {size} byte buffer ({usage:?})");

        Ok(PooledBuffer {
            handle,
            size,
            usage,
            created_at: Instant::now(),
            reuse_count: 0,
        })
    }

    /// Returns a buffer to its bucket. Contents are left as they are.
    pub fn release(&mut self, buffer: PooledBuffer<A::Buffer>) {
        self.buckets.entry(buffer.size).or_default().push(buffer);
    }

    /// Destroys idle buffers created more than `max_age` ago.
    pub fn reclaim(&mut self, max_age: Duration) -> usize {
        self.reclaim_at(Instant::now(), max_age)
    }

    /// Like [`reclaim`](Self::reclaim) with an explicit clock.
    pub fn reclaim_at(&mut self, now: Instant, max_age: Duration) -> usize {
        let mut destroyed = 0usize;

        for bucket in self.buckets.values_mut() {
            let mut i = 0;
            while i < bucket.len() {
                if now.saturating_duration_since(bucket[i].created_at) > max_age {
                    let buf = bucket.swap_remove(i);
                    self.allocator.destroy(buf.handle);
                    destroyed += 1;
                } else {
                    i += 1;
                }
            }
        }
        self.buckets.retain(|_, bucket| !bucket.is_empty());

        if destroyed > 0 {
            self.reclaimed += destroyed as u64;
            log::debug!("pool: reclaimed {destroyed} idle buffer(s)");
        }
        destroyed
    }

    pub fn stats(&self) -> PoolStats {
        let mut buckets: Vec<BucketStats> = self
            .buckets
            .iter()
            .map(|(&size, bufs)| BucketStats {
                size,
                idle: bufs.len(),
                bytes: size * bufs.len() as u64,
            })
            .collect();
        buckets.sort_by_key(|b| b.size);

        PoolStats {
            buckets,
            allocations: self.allocations,
            reuses: self.reuses,
            reclaimed: self.reclaimed,
        }
    }

    /// Destroys every idle buffer and resets all counters.
    pub fn dispose(&mut self) {
        for (_, bucket) in self.buckets.drain() {
            for buf in bucket {
                self.allocator.destroy(buf.handle);
            }
        }
        self.allocations = 0;
        self.reuses = 0;
        self.reclaimed = 0;
    }
}


#[cfg(test)]
mod tests {
    use super::recording::Recording;
    use super::*;

    const VERTEX: wgpu::BufferUsages = wgpu::BufferUsages::VERTEX;

    fn pool() -> BufferPool<Recording> {
        BufferPool::new(Recording::default())
    }

    #[test]
    fn bucket_rounding() {
        assert_eq!(bucket_size(0), Some(4));
        assert_eq!(bucket_size(1), Some(4));
        assert_eq!(bucket_size(5), Some(8));
        assert_eq!(bucket_size(8), Some(8));
        assert_eq!(bucket_size(1000), Some(1024));
        assert_eq!(bucket_size(u64::MAX), None);
    }

    #[test]
    fn release_then_acquire_reuses_buffer() {
        let mut p = pool();
        let a = p.acquire(100, VERTEX).unwrap();
        let id = *a.buffer();
        assert_eq!(a.size(), 128);
        assert_eq!(a.reuse_count(), 0);

        p.release(a);
        let b = p.acquire(100, VERTEX).unwrap();
        assert_eq!(*b.buffer(), id);
        assert_eq!(b.reuse_count(), 1);

        let s = p.stats();
        assert_eq!(s.allocations, 1);
        assert_eq!(s.reuses, 1);
        assert!(s.buckets.is_empty());
    }

    #[test]
    fn five_and_eight_share_a_bucket() {
        let mut p = pool();
        let a = p.acquire(5, VERTEX).unwrap();
        assert_eq!(a.size(), 8);
        let id = *a.buffer();
        p.release(a);

        let b = p.acquire(8, VERTEX).unwrap();
        assert_eq!(*b.buffer(), id);
        assert_eq!(p.allocator().allocated.borrow().as_slice(), &[(0, 8)]);
    }

    #[test]
    fn other_buckets_are_not_reused() {
        let mut p = pool();
        let a = p.acquire(16, VERTEX).unwrap();
        p.release(a);

        let b = p.acquire(17, VERTEX).unwrap();
        assert_eq!(b.size(), 32);
        assert_eq!(p.stats().allocations, 2);
        assert_eq!(p.stats().idle_buffers(), 1);
    }

    #[test]
    fn usage_must_cover_request() {
        let mut p = pool();
        let a = p.acquire(64, wgpu::BufferUsages::UNIFORM).unwrap();
        p.release(a);

        let b = p.acquire(64, VERTEX | wgpu::BufferUsages::COPY_DST).unwrap();
        assert_eq!(b.reuse_count(), 0);
        assert_eq!(p.stats().allocations, 2);
    }

    #[test]
    fn reclaim_destroys_only_old_idle_buffers() {
        let mut p = pool();
        let a = p.acquire(64, VERTEX).unwrap();
        let held = p.acquire(64, VERTEX).unwrap();
        let created = a.created_at();
        let old_id = *a.buffer();
        p.release(a);

        let max_age = Duration::from_secs(10);
        assert_eq!(p.reclaim_at(created + Duration::from_secs(5), max_age), 0);
        assert_eq!(p.stats().idle_buffers(), 1);

        assert_eq!(p.reclaim_at(created + Duration::from_secs(11), max_age), 1);
        assert_eq!(p.allocator().destroyed.borrow().as_slice(), &[old_id]);

        let s = p.stats();
        assert_eq!(s.reclaimed, 1);
        assert!(s.buckets.is_empty());

        // Buffers out on loan are never touched.
        assert_eq!(held.size(), 64);
    }

    #[test]
    fn stats_report_buckets_in_order() {
        let mut p = pool();
        let bufs: Vec<_> = [300, 10, 12, 70]
            .into_iter()
            .map(|n| p.acquire(n, VERTEX).unwrap())
            .collect();
        for b in bufs {
            p.release(b);
        }

        let s = p.stats();
        let sizes: Vec<_> = s.buckets.iter().map(|b| (b.size, b.idle)).collect();
        assert_eq!(sizes, vec![(16, 2), (128, 1), (512, 1)]);
        assert_eq!(s.idle_bytes(), 16 * 2 + 128 + 512);
    }

    #[test]
    fn dispose_destroys_everything_and_resets() {
        let mut p = pool();
        let a = p.acquire(8, VERTEX).unwrap();
        let b = p.acquire(1024, VERTEX).unwrap();
        p.release(a);
        p.release(b);

        p.dispose();
        let mut destroyed = p.allocator().destroyed.borrow().clone();
        destroyed.sort();
        assert_eq!(destroyed, vec![0, 1]);
        assert_eq!(p.stats(), PoolStats::default());
    }

    #[test]
    fn allocation_failure_propagates() {
        let mut p = BufferPool::new(Recording {
            limit: Some(256),
            ..Default::default()
        });
        let err = p.acquire(300, VERTEX).unwrap_err();
        assert_eq!(
            err,
            RenderError::BufferTooLarge {
                requested: 512,
                max: 256
            }
        );
        assert_eq!(p.stats().allocations, 0);
    }

    #[test]
    fn device_exhaustion_propagates() {
        let mut p = BufferPool::new(Recording {
            exhausted: true,
            ..Default::default()
        });
        let err = p.acquire(100, VERTEX).unwrap_err();
        assert_eq!(err, RenderError::OutOfMemory { requested: 128 });
        assert_eq!(err.to_string(), "out of GPU memory allocating 128 bytes");
        assert_eq!(p.stats().allocations, 0);
    }
}
