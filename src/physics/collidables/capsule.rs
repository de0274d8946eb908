use glam::DVec3;

use super::shape::{validate_dimension, SupportMappable};
use crate::error::Result;

/// Convex shape representing a swept sphere: a line segment along the local Y axis expanded by a radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    /// Spherical expansion applied to the internal line segment.
    pub radius: f64,
    /// Half of the length of the internal line segment. Oriented along the local Y axis.
    pub half_length: f64,
}

impl Capsule {
    /// Creates a capsule shape.
    #[inline(always)]
    pub fn new(radius: f64, length: f64) -> Self {
        debug_assert!(
            radius >= 0.0 && length >= 0.0,
            "Capsule dimensions must be non-negative."
        );
        Self {
            radius,
            half_length: length * 0.5,
        }
    }

    /// Creates a capsule, rejecting negative or non-finite dimensions.
    pub fn try_new(radius: f64, length: f64) -> Result<Self> {
        Ok(Self::new(
            validate_dimension("radius", radius)?,
            validate_dimension("length", length)?,
        ))
    }

    /// Gets the length of the capsule's internal line segment along the local Y axis.
    pub fn length(&self) -> f64 {
        self.half_length * 2.0
    }
}

impl SupportMappable for Capsule {
    #[inline(always)]
    fn support_mapping(&self, direction: DVec3) -> DVec3 {
        let segment_end = DVec3::new(
            0.0,
            if direction.y < 0.0 { -self.half_length } else { self.half_length },
            0.0,
        );
        segment_end + direction.normalize_or_zero() * self.radius
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
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Capsule dimensions must be non-negative.")]
    fn test_new_rejects_negative_length() {
        let _ = Capsule::new(0.5, -1.0);
    }

    #[test]
    fn test_support_mapping() {
        let capsule = Capsule::new(0.5, 2.0);
        assert!(capsule
            .support_mapping(DVec3::Y)
            .abs_diff_eq(DVec3::new(0.0, 1.5, 0.0), 1e-12));
        assert!(capsule
            .support_mapping(DVec3::new(1.0, -1e-3, 0.0))
            .abs_diff_eq(DVec3::new(0.5, -1.0005, 0.0), 1e-6));
    }
}
