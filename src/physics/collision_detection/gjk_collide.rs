//! GJK based point, distance and ray queries against support-mapped convex shapes.
//!
//! All three queries iterate a [`VoronoiSimplexSolver`] borrowed from a [`SimplexPool`] and stop at
//! a hard iteration ceiling. Running out of iterations is not a failure: the point query then
//! reports the point as inside and the ray cast reports the best hit found so far, favoring a
//! bounded cost over exactness.

use glam::DVec3;

use super::gjk_settings::GjkSettings;
use super::simplex_pool::SimplexPool;
use super::support_finder::{support_center_transformed, support_map_transformed};
use crate::error::Result;
use crate::physics::body_properties::RigidPose;
use crate::physics::collidables::ray::{Ray, RayHit};
use crate::physics::collidables::shape::SupportMappable;
use crate::utilities::math_helper;

/// Search direction used when the natural seed direction is zero.
const FALLBACK_DIRECTION: DVec3 = DVec3::X;

/// Witness points and separating normal produced by [`GjkCollide::closest_points`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoints {
    /// Point on the first shape.
    pub point_a: DVec3,
    /// Point on the second shape.
    pub point_b: DVec3,
    /// Unit vector pointing from the second shape toward the first. When the shapes touch or
    /// overlap it is left unnormalized and is zero or nearly so.
    pub normal: DVec3,
}

impl ClosestPoints {
    /// Gets the distance between the witness points.
    #[inline(always)]
    pub fn distance(&self) -> f64 {
        (self.point_a - self.point_b).length()
    }

    /// Returns true if no separating axis was found, meaning the shapes touch or overlap.
    ///
    /// Separated results always carry a unit normal, so anything shorter than the shared epsilon
    /// counts as contact.
    #[inline(always)]
    pub fn is_touching(&self) -> bool {
        self.normal.length_squared() <= math_helper::EPSILON_SQUARED
    }
}

/// Runs GJK queries with a fixed set of [`GjkSettings`] and a simplex pool.
///
/// Queries take `&self` and can run concurrently from any number of threads; each call borrows its
/// own solver from the pool.
#[derive(Debug, Clone, Copy)]
pub struct GjkCollide<'p> {
    settings: GjkSettings,
    pool: &'p SimplexPool,
}

impl Default for GjkCollide<'static> {
    fn default() -> Self {
        Self {
            settings: GjkSettings::default(),
            pool: SimplexPool::shared(),
        }
    }
}

impl GjkCollide<'static> {
    /// Creates a query runner using the shared simplex pool.
    pub fn new(settings: GjkSettings) -> Result<Self> {
        Self::with_pool(settings, SimplexPool::shared())
    }
}

impl<'p> GjkCollide<'p> {
    /// Creates a query runner drawing solvers from `pool`.
    pub fn with_pool(settings: GjkSettings, pool: &'p SimplexPool) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings, pool })
    }

    /// Gets the settings used by this runner.
    #[inline(always)]
    pub fn settings(&self) -> &GjkSettings {
        &self.settings
    }

    /// Checks whether `point` lies within a posed shape.
    ///
    /// Points on the surface, within the point tolerance, count as inside. If the iteration budget
    /// runs out before a separating direction is found the point is also reported as inside.
    #[cfg_attr(
        feature = "profiling",
        tracing::instrument(level = "trace", skip_all)
    )]
    pub fn pointcast<S: SupportMappable + ?Sized>(
        &self,
        support: &S,
        pose: &RigidPose,
        point: DVec3,
    ) -> bool {
        let epsilon_squared = self.settings.pointcast_epsilon * self.settings.pointcast_epsilon;
        let separation_epsilon_squared =
            self.settings.separation_epsilon * self.settings.separation_epsilon;

        let probe = math_helper::direction_or(point, FALLBACK_DIRECTION);
        let arbitrary_point = support_map_transformed(support, pose, probe);
        let r = point - support_center_transformed(support, pose);

        let x = point;
        let mut v = x - arbitrary_point;
        let mut dist_squared = v.length_squared();

        let mut simplex = self.pool.acquire();
        let mut iterations = 0;

        while dist_squared > epsilon_squared && iterations < self.settings.max_iterations {
            iterations += 1;

            let p = support_map_transformed(support, pose, v);
            let w = x - p;

            if v.dot(w) > 0.0 {
                if v.dot(r) >= -separation_epsilon_squared {
                    return false;
                }
                // The separating plane does not face away from the center; start over from here.
                simplex.reset();
            }
            if !simplex.in_simplex(w) {
                simplex.add_vertex(w, x, p);
            }

            dist_squared = simplex.closest().map_or(0.0, |closest| {
                v = closest;
                closest.length_squared()
            });
        }

        if dist_squared > epsilon_squared {
            tracing::trace!(dist_squared, "pointcast ran out of iterations, assuming inside");
        }
        true
    }

    /// Finds the closest points between two posed shapes.
    ///
    /// The returned normal is zero when the shapes touch or overlap; otherwise it is a unit vector
    /// from `point_b` toward `point_a`. This query always produces witness points; whether the
    /// shapes are separated has to be read from the normal or the distance.
    #[cfg_attr(
        feature = "profiling",
        tracing::instrument(level = "trace", skip_all)
    )]
    pub fn closest_points<A: SupportMappable + ?Sized, B: SupportMappable + ?Sized>(
        &self,
        support_a: &A,
        pose_a: &RigidPose,
        support_b: &B,
        pose_b: &RigidPose,
    ) -> ClosestPoints {
        let epsilon_squared =
            self.settings.closest_points_epsilon * self.settings.closest_points_epsilon;

        let r = math_helper::direction_or(pose_a.position - pose_b.position, FALLBACK_DIRECTION);
        let support_vertex_a = support_map_transformed(support_a, pose_a, -r);
        let support_vertex_b = support_map_transformed(support_b, pose_b, r);

        let mut v = support_vertex_a - support_vertex_b;
        let mut normal = DVec3::ZERO;
        let mut dist_squared = v.length_squared();

        let mut simplex = self.pool.acquire();
        let mut iterations = 0;

        while dist_squared > epsilon_squared && iterations < self.settings.max_iterations {
            iterations += 1;

            let support_vertex_a = support_map_transformed(support_a, pose_a, -v);
            let support_vertex_b = support_map_transformed(support_b, pose_b, v);
            let w = support_vertex_a - support_vertex_b;

            if !simplex.in_simplex(w) {
                simplex.add_vertex(w, support_vertex_a, support_vertex_b);
            }
            match simplex.closest() {
                Some(closest) => {
                    v = closest;
                    normal = closest;
                    dist_squared = closest.length_squared();
                }
                None => {
                    // A collapsed simplex means the shapes touch or overlap; the last separating
                    // vector no longer describes them.
                    normal = DVec3::ZERO;
                    dist_squared = 0.0;
                }
            }
        }

        let (point_a, point_b) = simplex.compute_points();
        ClosestPoints {
            point_a,
            point_b,
            normal: math_helper::normalize_if_significant(normal, self.normal_threshold_squared()),
        }
    }

    /// Casts a ray against a posed shape.
    ///
    /// Returns the hit if the ray touches the shape, with `fraction` such that the impact point is
    /// `origin + fraction * direction`. A ray starting inside the shape hits at fraction zero. A ray
    /// with a zero direction never hits.
    ///
    /// The cast advances conservatively along the ray. If it runs out of iterations before
    /// converging, the best hit found so far is still reported; for very large shapes the fraction
    /// may then be imprecise.
    #[cfg_attr(
        feature = "profiling",
        tracing::instrument(level = "trace", skip_all)
    )]
    pub fn raycast<S: SupportMappable + ?Sized>(
        &self,
        support: &S,
        pose: &RigidPose,
        ray: &Ray,
    ) -> Option<RayHit> {
        let direction_length = ray.direction.length();
        if direction_length <= 0.0 || !direction_length.is_finite() {
            return None;
        }

        let epsilon_squared = self.settings.raycast_epsilon * self.settings.raycast_epsilon;
        let separation_epsilon = self.settings.separation_epsilon;

        let r = ray.direction;
        let mut x = ray.origin;
        let mut lambda = 0.0;
        let mut normal = DVec3::ZERO;

        let arbitrary_point = support_map_transformed(support, pose, r);
        let mut v = x - arbitrary_point;
        let mut dist_squared = v.length_squared();

        let mut simplex = self.pool.acquire();
        let mut iterations = 0;
        let mut collapsed = false;

        while dist_squared > epsilon_squared && iterations < self.settings.max_iterations {
            iterations += 1;

            let p = support_map_transformed(support, pose, v);
            let mut w = x - p;

            let v_dot_w = v.dot(w);
            if v_dot_w > 0.0 {
                let v_dot_r = v.dot(r);
                if v_dot_r >= -separation_epsilon {
                    return None;
                }
                lambda -= v_dot_w / v_dot_r;
                x = ray.point_at(lambda);
                w = x - p;
                normal = v;
            }
            if !simplex.in_simplex(w) {
                simplex.add_vertex(w, x, p);
            }

            match simplex.closest() {
                Some(closest) => {
                    v = closest;
                    dist_squared = closest.length_squared();
                }
                None => {
                    collapsed = true;
                    dist_squared = 0.0;
                }
            }
        }

        if dist_squared > epsilon_squared {
            tracing::trace!(
                dist_squared,
                lambda,
                "raycast ran out of iterations, reporting best hit"
            );
        }

        // Reading the fraction straight from lambda is inaccurate against large shapes, so measure
        // the distance to the witness point on the shape instead. An enclosing or collapsed simplex
        // leaves the witness points from an earlier configuration; lambda is the only usable answer
        // there, and it is zero for rays starting inside the shape.
        let fraction = if collapsed || simplex.encloses_origin() {
            lambda
        } else {
            let (_, hit_point) = simplex.compute_points();
            (hit_point - ray.origin).length() / direction_length
        };

        Some(RayHit {
            fraction,
            normal: math_helper::normalize_if_significant(normal, self.normal_threshold_squared()),
        })
    }

    #[inline(always)]
    fn normal_threshold_squared(&self) -> f64 {
        self.settings.separation_epsilon * self.settings.separation_epsilon
    }
}

/// Checks whether `point` lies within a posed shape, using the default settings and shared pool.
///
/// See [`GjkCollide::pointcast`].
pub fn pointcast<S: SupportMappable + ?Sized>(support: &S, pose: &RigidPose, point: DVec3) -> bool {
    GjkCollide::default().pointcast(support, pose, point)
}

/// Finds the closest points between two posed shapes, using the default settings and shared pool.
///
/// See [`GjkCollide::closest_points`].
pub fn closest_points<A: SupportMappable + ?Sized, B: SupportMappable + ?Sized>(
    support_a: &A,
    pose_a: &RigidPose,
    support_b: &B,
    pose_b: &RigidPose,
) -> ClosestPoints {
    GjkCollide::default().closest_points(support_a, pose_a, support_b, pose_b)
}

/// Casts a ray against a posed shape, using the default settings and shared pool.
///
/// See [`GjkCollide::raycast`].
pub fn raycast<S: SupportMappable + ?Sized>(
    support: &S,
    pose: &RigidPose,
    ray: &Ray,
) -> Option<RayHit> {
    GjkCollide::default().raycast(support, pose, ray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collidables::box_shape::Cuboid;
    use crate::physics::collidables::sphere::Sphere;
    use approx::assert_relative_eq;

    #[test]
    fn test_pointcast_sphere() {
        let sphere = Sphere::new(1.0);
        let pose = RigidPose::IDENTITY;
        assert!(pointcast(&sphere, &pose, DVec3::ZERO));
        assert!(pointcast(&sphere, &pose, DVec3::new(0.5, 0.2, -0.3)));
        assert!(!pointcast(&sphere, &pose, DVec3::new(10.0, 0.0, 0.0)));
        assert!(!pointcast(&sphere, &pose, DVec3::new(0.8, 0.8, 0.0)));
    }

    #[test]
    fn test_pointcast_surface_point_is_inside() {
        let sphere = Sphere::new(1.0);
        assert!(pointcast(&sphere, &RigidPose::IDENTITY, DVec3::X));
    }

    #[test]
    fn test_pointcast_translated_cuboid() {
        let cuboid = Cuboid::new(2.0, 2.0, 2.0);
        let pose = RigidPose::from_position(DVec3::new(5.0, 0.0, 0.0));
        assert!(pointcast(&cuboid, &pose, DVec3::new(5.5, 0.5, -0.5)));
        assert!(!pointcast(&cuboid, &pose, DVec3::new(0.0, 0.0, 0.0)));
        assert!(!pointcast(&cuboid, &pose, DVec3::new(6.5, 0.0, 0.0)));
    }

    #[test]
    fn test_closest_points_separated_spheres() {
        let sphere = Sphere::new(1.0);
        let pose_a = RigidPose::IDENTITY;
        let pose_b = RigidPose::from_position(DVec3::new(5.0, 0.0, 0.0));
        let result = closest_points(&sphere, &pose_a, &sphere, &pose_b);

        assert!(result.point_a.abs_diff_eq(DVec3::new(1.0, 0.0, 0.0), 1e-9));
        assert!(result.point_b.abs_diff_eq(DVec3::new(4.0, 0.0, 0.0), 1e-9));
        assert!(result.normal.abs_diff_eq(DVec3::NEG_X, 1e-9));
        assert_relative_eq!(result.distance(), 3.0, epsilon = 1e-9);
        assert!(!result.is_touching());
    }

    #[test]
    fn test_closest_points_overlapping_shapes() {
        let sphere = Sphere::new(1.0);
        let pose = RigidPose::from_position(DVec3::new(2.0, 3.0, 4.0));
        let result = closest_points(&sphere, &pose, &sphere, &pose);
        assert!(result.normal.length_squared() < 1e-12);
        assert!(result.is_touching());
    }

    #[test]
    fn test_raycast_sphere() {
        let sphere = Sphere::new(1.0);
        let ray = Ray::new(DVec3::new(-10.0, 0.0, 0.0), DVec3::X);
        let hit = raycast(&sphere, &RigidPose::IDENTITY, &ray).unwrap();
        assert_relative_eq!(hit.fraction, 9.0, epsilon = 1e-6);
        assert!(hit.normal.abs_diff_eq(DVec3::NEG_X, 1e-9));
    }

    #[test]
    fn test_raycast_fraction_scales_with_direction() {
        let sphere = Sphere::new(1.0);
        let ray = Ray::new(DVec3::new(-10.0, 0.0, 0.0), DVec3::new(2.0, 0.0, 0.0));
        let hit = raycast(&sphere, &RigidPose::IDENTITY, &ray).unwrap();
        assert_relative_eq!(hit.fraction, 4.5, epsilon = 1e-6);
    }

    #[test]
    fn test_raycast_pointing_away_misses() {
        let sphere = Sphere::new(1.0);
        let ray = Ray::new(DVec3::new(-10.0, 0.0, 0.0), DVec3::NEG_X);
        assert!(raycast(&sphere, &RigidPose::IDENTITY, &ray).is_none());
    }

    #[test]
    fn test_raycast_zero_direction_misses() {
        let sphere = Sphere::new(1.0);
        let ray = Ray::new(DVec3::new(-10.0, 0.0, 0.0), DVec3::ZERO);
        assert!(raycast(&sphere, &RigidPose::IDENTITY, &ray).is_none());
    }

    #[test]
    fn test_raycast_from_inside_hits_at_origin() {
        let sphere = Sphere::new(1.0);
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        let hit = raycast(&sphere, &RigidPose::IDENTITY, &ray).unwrap();
        assert!(hit.fraction.abs() < 1e-9);
        assert_eq!(hit.normal, DVec3::ZERO);
    }

    #[test]
    fn test_raycast_from_inside_off_center_hits_at_origin() {
        let cuboid = Cuboid::new(2.0, 2.0, 2.0);
        let ray = Ray::new(DVec3::new(0.5, 0.2, 0.1), DVec3::Y);
        let hit = raycast(&cuboid, &RigidPose::IDENTITY, &ray).unwrap();
        assert!(hit.fraction.abs() < 1e-6, "fraction was {}", hit.fraction);
        assert_eq!(hit.normal, DVec3::ZERO);
    }

    #[test]
    fn test_raycast_single_iteration_budget_reports_hit() {
        let collide = GjkCollide::new(GjkSettings::default().with_max_iterations(1)).unwrap();
        let ray = Ray::new(DVec3::new(-10.0, 0.3, 0.0), DVec3::X);
        let hit = collide
            .raycast(&Sphere::new(1.0), &RigidPose::IDENTITY, &ray)
            .unwrap();
        assert!(hit.fraction.is_finite());
        // One advancement lands near the sphere without converging on the exact entry point.
        assert!(hit.fraction > 8.0 && hit.fraction < 10.0);
    }

    #[test]
    fn test_closest_points_tiny_overlap_is_touching() {
        // Tetrahedra at this scale fall under the degenerate volume threshold, which ends the
        // search through a collapsed simplex rather than an enclosing one.
        let sphere = Sphere::new(0.01);
        let cuboid = Cuboid::new(0.02, 0.02, 0.02);
        let result = closest_points(
            &sphere,
            &RigidPose::IDENTITY,
            &cuboid,
            &RigidPose::from_position(DVec3::new(0.005, 0.003, 0.002)),
        );
        assert!(result.normal.length_squared() < 1e-12);
        assert!(result.is_touching());
    }

    #[test]
    fn test_with_pool_validates_settings() {
        let pool = SimplexPool::new();
        assert!(GjkCollide::with_pool(GjkSettings::default().with_max_iterations(0), &pool).is_err());

        let collide = GjkCollide::with_pool(GjkSettings::default(), &pool).unwrap();
        assert!(collide.pointcast(&Sphere::new(1.0), &RigidPose::IDENTITY, DVec3::ZERO));
        // The solver went back to the private pool, not the shared one.
        assert_eq!(pool.available_count(), 1);
    }

    #[test]
    fn test_single_iteration_budget_still_answers() {
        let collide = GjkCollide::new(GjkSettings::default().with_max_iterations(1)).unwrap();
        let cuboid = Cuboid::new(2.0, 2.0, 2.0);
        // A point deep inside needs several iterations to enclose; with one it defaults to inside.
        assert!(collide.pointcast(&cuboid, &RigidPose::IDENTITY, DVec3::new(0.1, 0.2, 0.3)));
    }
}
