//! Narrow-phase queries built on the Gilbert-Johnson-Keerthi algorithm.
//!
//! Shapes only need to provide a support mapping; the queries never look at their geometry
//! otherwise.

pub mod gjk_collide;
pub mod gjk_settings;
pub mod simplex_pool;
pub mod simplex_solver;
pub mod support_finder;

pub use gjk_collide::{closest_points, pointcast, raycast, ClosestPoints, GjkCollide};
pub use gjk_settings::GjkSettings;
pub use simplex_pool::{PooledSimplex, SimplexPool};
pub use simplex_solver::{UsedVertices, VoronoiSimplexSolver};
