use glam::DVec3;

use super::shape::{validate_dimension, SupportMappable};
use crate::error::Result;

/// Convex shape representing an axis-aligned ellipsoid centered on its local origin.
///
/// Shield volumes wrapped around grids are ellipsoids sized from the grid's half extents, which
/// makes this the shape most callers test points and rays against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-axis lengths along the local X, Y and Z axes.
    pub radii: DVec3,
}

impl Ellipsoid {
    /// Creates an ellipsoid from its semi-axis lengths.
    #[inline(always)]
    pub fn new(radii: DVec3) -> Self {
        Self { radii }
    }

    /// Creates an ellipsoid, rejecting negative or non-finite semi-axes.
    pub fn try_new(radii: DVec3) -> Result<Self> {
        Ok(Self::new(DVec3::new(
            validate_dimension("radii.x", radii.x)?,
            validate_dimension("radii.y", radii.y)?,
            validate_dimension("radii.z", radii.z)?,
        )))
    }

    /// Creates an ellipsoid enclosing a box with the given half extents.
    ///
    /// Scaling the half extents by sqrt(3) guarantees the box corners lie on or inside the surface.
    #[inline(always)]
    pub fn enclosing_half_extents(half_extents: DVec3) -> Self {
        Self::new(half_extents * 3f64.sqrt())
    }
}

impl SupportMappable for Ellipsoid {
    #[inline(always)]
    fn support_mapping(&self, direction: DVec3) -> DVec3 {
        // The ellipsoid is a unit sphere scaled by the radii, so map the direction into sphere space,
        // take the sphere's support and scale it back out.
        let scaled = direction * self.radii;
        let length = scaled.length();
        if length > 0.0 {
            scaled * self.radii / length
        } else {
            DVec3::ZERO
        }
    }

    #[inline(always)]
    fn support_center(&self) -> DVec3 {
        DVec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_along_axes() {
        let ellipsoid = Ellipsoid::new(DVec3::new(3.0, 2.0, 1.0));
        assert!(ellipsoid
            .support_mapping(DVec3::X)
            .abs_diff_eq(DVec3::new(3.0, 0.0, 0.0), 1e-12));
        assert!(ellipsoid
            .support_mapping(DVec3::NEG_Y)
            .abs_diff_eq(DVec3::new(0.0, -2.0, 0.0), 1e-12));
        assert_eq!(ellipsoid.support_mapping(DVec3::ZERO), DVec3::ZERO);
    }

    #[test]
    fn test_support_lies_on_surface() {
        let ellipsoid = Ellipsoid::new(DVec3::new(3.0, 2.0, 1.0));
        let support = ellipsoid.support_mapping(DVec3::new(0.4, -1.3, 2.2));
        let implicit = (support / ellipsoid.radii).length_squared();
        assert!((implicit - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_enclosing_half_extents() {
        let half_extents = DVec3::new(2.0, 1.0, 0.5);
        let ellipsoid = Ellipsoid::enclosing_half_extents(half_extents);
        let corner = (half_extents / ellipsoid.radii).length_squared();
        assert!(corner <= 1.0 + 1e-12);
    }
}
