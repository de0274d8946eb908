//! Thread-safe pool of reusable values.
//!
//! Taking a value from the pool hands out one that has been returned before, or a freshly
//! defaulted value if none are waiting. The free list is guarded by a mutex so that any number
//! of threads may take and return values concurrently; a value is owned exclusively by whoever
//! took it until it is given back.

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;

/// Manages a pool of reusable values.
pub struct ResourcePool<T> {
    available: CachePadded<Mutex<Vec<T>>>,
    /// Maximum number of idle values retained; values returned beyond this are dropped.
    max_retained: usize,
}

impl<T> ResourcePool<T> {
    /// Default number of idle values a pool keeps around.
    pub const DEFAULT_MAX_RETAINED: usize = 64;

    /// Creates an empty pool.
    #[inline(always)]
    pub const fn new() -> Self {
        Self::with_max_retained(Self::DEFAULT_MAX_RETAINED)
    }

    /// Creates an empty pool which keeps at most `max_retained` idle values.
    #[inline(always)]
    pub const fn with_max_retained(max_retained: usize) -> Self {
        Self {
            available: CachePadded::new(Mutex::new(Vec::new())),
            max_retained,
        }
    }

    /// Returns a value to the pool for reuse.
    ///
    /// Returns false if the pool was already holding its maximum number of idle values and the
    /// value was dropped instead.
    #[inline]
    pub fn give_back(&self, value: T) -> bool {
        let mut available = self.available.lock();
        if available.len() < self.max_retained {
            available.push(value);
            true
        } else {
            false
        }
    }

    /// Gets the number of previously returned values waiting in the pool.
    #[inline]
    pub fn available_count(&self) -> usize {
        self.available.lock().len()
    }

    /// Gets the maximum number of idle values the pool retains.
    #[inline(always)]
    pub fn max_retained(&self) -> usize {
        self.max_retained
    }

    /// Drops every idle value held by the pool.
    #[inline]
    pub fn clear(&self) {
        self.available.lock().clear();
    }
}

impl<T: Default> ResourcePool<T> {
    /// Takes a value from the pool.
    ///
    /// Returns a recycled value if available, otherwise creates a new one. Recycled values are
    /// handed out as they were given back; callers are responsible for resetting them.
    #[inline]
    pub fn take(&self) -> T {
        let recycled = self.available.lock().pop();
        match recycled {
            Some(value) => value,
            None => {
                tracing::trace!("resource pool empty, creating a new value");
                T::default()
            }
        }
    }

    /// Ensures that at least `count` idle values are waiting in the pool, up to its retention limit.
    pub fn prewarm(&self, count: usize) {
        let mut available = self.available.lock();
        let target = count.min(self.max_retained);
        while available.len() < target {
            available.push(T::default());
        }
    }
}

impl<T> Default for ResourcePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ResourcePool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePool")
            .field("available", &self.available_count())
            .field("max_retained", &self.max_retained)
            .finish()
    }
}
