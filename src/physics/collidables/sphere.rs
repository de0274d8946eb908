use glam::DVec3;

use super::ray::RayHit;
use super::shape::{validate_dimension, SupportMappable};
use crate::error::Result;
use crate::physics::body_properties::RigidPose;

/// Convex shape representing a sphere centered on its local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Radius of the sphere.
    pub radius: f64,
}

impl Sphere {
    /// Creates a sphere shape.
    #[inline(always)]
    pub fn new(radius: f64) -> Self {
        debug_assert!(radius >= 0.0, "Sphere radius must be non-negative.");
        Self { radius }
    }

    /// Creates a sphere shape, rejecting negative or non-finite radii.
    pub fn try_new(radius: f64) -> Result<Self> {
        Ok(Self {
            radius: validate_dimension("radius", radius)?,
        })
    }

    /// Analytically intersects a ray with the sphere.
    ///
    /// Returns the hit with `fraction` measured in units of `direction`, so the impact point is
    /// `origin + fraction * direction`. Rays starting inside the sphere hit at fraction zero.
    pub fn ray_test(&self, pose: &RigidPose, origin: DVec3, direction: DVec3) -> Option<RayHit> {
        let direction_length = direction.length();
        if direction_length <= 0.0 {
            return None;
        }
        // Work with a normalized direction; it simplifies the quadratic and avoids numerical trouble.
        let inverse_d_length = 1.0 / direction_length;
        let d = direction * inverse_d_length;

        // Move the origin up to the earliest possible impact time.
        let mut o = origin - pose.position;
        let t_offset = (-o.dot(d) - self.radius).max(0.0);
        o += d * t_offset;
        let b = o.dot(d);
        let c = o.dot(o) - self.radius * self.radius;

        if b > 0.0 && c > 0.0 {
            // Outside and pointing away.
            return None;
        }

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let t = (-b - discriminant.sqrt()).max(-t_offset);
        let normal = if self.radius > 0.0 {
            (o + d * t) / self.radius
        } else {
            -d
        };
        Some(RayHit {
            fraction: (t + t_offset) * inverse_d_length,
            normal,
        })
    }
}

impl SupportMappable for Sphere {
    #[inline(always)]
    fn support_mapping(&self, direction: DVec3) -> DVec3 {
        direction.normalize_or_zero() * self.radius
    }

    #[inline(always)]
    fn support_center(&self) -> DVec3 {
        DVec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_support_mapping() {
        let sphere = Sphere::new(2.0);
        let support = sphere.support_mapping(DVec3::new(0.0, 3.0, 4.0));
        assert!(support.abs_diff_eq(DVec3::new(0.0, 1.2, 1.6), 1e-12));
        assert_eq!(sphere.support_mapping(DVec3::ZERO), DVec3::ZERO);
    }

    #[test]
    fn test_try_new_rejects_negative_radius() {
        assert!(Sphere::try_new(-1.0).is_err());
        assert!(Sphere::try_new(f64::NAN).is_err());
        assert_eq!(Sphere::try_new(1.5).unwrap().radius, 1.5);
    }

    #[test]
    fn test_ray_test() {
        let sphere = Sphere::new(1.0);
        let pose = RigidPose::from_position(DVec3::new(0.0, 0.0, 5.0));
        let hit = sphere
            .ray_test(&pose, DVec3::ZERO, DVec3::new(0.0, 0.0, 2.0))
            .unwrap();
        assert_relative_eq!(hit.fraction, 2.0, epsilon = 1e-12);
        assert!(hit.normal.abs_diff_eq(DVec3::new(0.0, 0.0, -1.0), 1e-12));

        assert!(sphere
            .ray_test(&pose, DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0))
            .is_none());
        assert!(sphere
            .ray_test(&pose, DVec3::new(3.0, 0.0, 0.0), DVec3::Z)
            .is_none());
    }
}
