//! Reusable scratch buffers for update decoding.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Buffers kept on the free list; returns beyond this are dropped.
const MAX_POOLED: usize = 32;
/// Starting capacity for a fresh scratch buffer.
const INITIAL_CAPACITY: usize = 8;

/// A shared free-list of changed-index scratch buffers.
///
/// [`Entity::apply_update`](crate::Entity::apply_update) borrows one buffer
/// per record and hands it back cleared, so steady-state decoding does not
/// allocate. The pool may be shared by entities decoded on different
/// threads; any single entity is still updated by one thread at a time.
#[derive(Debug, Default)]
pub struct IndexPool {
    free: Mutex<Vec<Vec<usize>>>,
}

impl IndexPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn checkout(&self) -> Vec<usize> {
        self.lock()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(INITIAL_CAPACITY))
    }

    pub(crate) fn give_back(&self, mut buffer: Vec<usize>) {
        buffer.clear();
        let mut free = self.lock();
        if free.len() < MAX_POOLED {
            free.push(buffer);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Vec<usize>>> {
        self.free.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn pooled(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_from_empty_pool_allocates() {
        let pool = IndexPool::new();
        let buffer = pool.checkout();
        assert!(buffer.is_empty());
        assert!(buffer.capacity() >= INITIAL_CAPACITY);
    }

    #[test]
    fn returned_buffers_are_reused() {
        let pool = IndexPool::new();
        let mut buffer = pool.checkout();
        buffer.extend_from_slice(&[1, 2, 3]);
        buffer.reserve(100);
        let capacity = buffer.capacity();
        pool.give_back(buffer);

        let reused = pool.checkout();
        assert!(reused.is_empty(), "buffer must come back cleared");
        assert_eq!(reused.capacity(), capacity, "capacity must be kept");
        assert_eq!(pool.pooled(), 0);
    }

    #[test]
    fn free_list_is_bounded() {
        let pool = IndexPool::new();
        let buffers: Vec<_> = (0..MAX_POOLED + 8).map(|_| pool.checkout()).collect();
        for buffer in buffers {
            pool.give_back(buffer);
        }
        assert_eq!(pool.pooled(), MAX_POOLED);
    }

    #[test]
    fn pool_is_shareable_across_threads() {
        let pool = std::sync::Arc::new(IndexPool::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = std::sync::Arc::clone(&pool);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let mut buffer = pool.checkout();
                        buffer.push(1);
                        pool.give_back(buffer);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(pool.pooled() <= MAX_POOLED);
    }
}
