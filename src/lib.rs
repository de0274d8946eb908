//! Convex collision queries for support-mapped shapes.
//!
//! Any convex shape that can answer "which point of yours lies farthest along this direction" can
//! be tested with the queries in [`physics::collision_detection`]:
//!
//! - [`pointcast`]: is a point inside a posed shape?
//! - [`closest_points`]: nearest points and separating normal between two posed shapes.
//! - [`raycast`]: where does a ray first touch a posed shape?
//!
//! ```
//! use convex_gjk::{raycast, Ray, RigidPose, Sphere};
//! use glam::DVec3;
//!
//! let sphere = Sphere::new(1.0);
//! let ray = Ray::new(DVec3::new(-10.0, 0.0, 0.0), DVec3::X);
//! let hit = raycast(&sphere, &RigidPose::IDENTITY, &ray).unwrap();
//! assert!((hit.fraction - 9.0).abs() < 1e-3);
//! ```

pub mod error;
pub mod physics;
pub mod utilities;

pub use error::{Error, Result};
pub use physics::body_properties::RigidPose;
pub use physics::collidables::box_shape::Cuboid;
pub use physics::collidables::capsule::Capsule;
pub use physics::collidables::convex_hull::ConvexHull;
pub use physics::collidables::cylinder::Cylinder;
pub use physics::collidables::ellipsoid::Ellipsoid;
pub use physics::collidables::ray::{Ray, RayHit};
pub use physics::collidables::shape::SupportMappable;
pub use physics::collidables::sphere::Sphere;
pub use physics::collision_detection::{
    closest_points, pointcast, raycast, ClosestPoints, GjkCollide, GjkSettings, SimplexPool,
};
