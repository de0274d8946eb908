//! Pooled simplex solvers for the GJK queries.

use std::ops::{Deref, DerefMut};

use super::simplex_solver::VoronoiSimplexSolver;
use crate::utilities::memory::resource_pool::ResourcePool;

/// Process-wide pool used by the free-function queries.
static SHARED_POOL: SimplexPool = SimplexPool::new();

/// Thread-safe pool of [`VoronoiSimplexSolver`] instances.
///
/// Any number of threads may acquire solvers concurrently. Each acquisition hands out a solver that
/// is exclusively owned by the returned guard until it is dropped.
#[derive(Debug, Default)]
pub struct SimplexPool {
    solvers: ResourcePool<VoronoiSimplexSolver>,
}

impl SimplexPool {
    /// Creates an empty pool.
    pub const fn new() -> Self {
        Self {
            solvers: ResourcePool::new(),
        }
    }

    /// Creates an empty pool which keeps at most `max_retained` idle solvers.
    pub const fn with_max_retained(max_retained: usize) -> Self {
        Self {
            solvers: ResourcePool::with_max_retained(max_retained),
        }
    }

    /// Gets the pool shared by the free-function queries.
    #[inline(always)]
    pub fn shared() -> &'static SimplexPool {
        &SHARED_POOL
    }

    /// Takes a solver from the pool, reset and ready for a new query.
    #[inline]
    pub fn acquire(&self) -> PooledSimplex<'_> {
        let mut solver = self.solvers.take();
        solver.reset();
        PooledSimplex { solver, pool: self }
    }

    /// Gets the number of idle solvers waiting in the pool.
    #[inline]
    pub fn available_count(&self) -> usize {
        self.solvers.available_count()
    }

    /// Ensures at least `count` idle solvers are available, up to the pool's retention limit.
    pub fn prewarm(&self, count: usize) {
        self.solvers.prewarm(count);
    }
}

/// A solver borrowed from a [`SimplexPool`]; returned to the pool when dropped.
pub struct PooledSimplex<'a> {
    solver: VoronoiSimplexSolver,
    pool: &'a SimplexPool,
}

impl Deref for PooledSimplex<'_> {
    type Target = VoronoiSimplexSolver;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.solver
    }
}

impl DerefMut for PooledSimplex<'_> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.solver
    }
}

impl Drop for PooledSimplex<'_> {
    fn drop(&mut self) {
        let solver = std::mem::take(&mut self.solver);
        if !self.pool.solvers.give_back(solver) {
            tracing::trace!("simplex pool full, dropping solver");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_acquire_returns_solver_on_drop() {
        let pool = SimplexPool::new();
        {
            let _solver = pool.acquire();
            assert_eq!(pool.available_count(), 0);
        }
        assert_eq!(pool.available_count(), 1);
    }

    #[test]
    fn test_acquired_solver_is_reset() {
        let pool = SimplexPool::new();
        {
            let mut solver = pool.acquire();
            solver.add_vertex(DVec3::X, DVec3::X, DVec3::ZERO);
            assert_eq!(solver.num_vertices(), 1);
        }
        let solver = pool.acquire();
        assert!(solver.is_empty());
        assert!(!solver.in_simplex(DVec3::X));
    }

    #[test]
    fn test_retention_limit() {
        let pool = SimplexPool::with_max_retained(1);
        let a = pool.acquire();
        let b = pool.acquire();
        drop(a);
        drop(b);
        assert_eq!(pool.available_count(), 1);
    }

    #[test]
    fn test_concurrent_acquire() {
        let pool = SimplexPool::new();
        pool.prewarm(2);
        crossbeam_utils::thread::scope(|s| {
            for i in 0..8 {
                let pool = &pool;
                s.spawn(move |_| {
                    for _ in 0..50 {
                        let mut solver = pool.acquire();
                        assert!(solver.is_empty());
                        let w = DVec3::splat(i as f64 + 1.0);
                        solver.add_vertex(w, w, DVec3::ZERO);
                        assert_eq!(solver.closest(), Some(w));
                    }
                });
            }
        })
        .unwrap();
        assert!(pool.available_count() >= 2);
    }
}
