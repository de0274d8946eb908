use glam::DVec3;

use super::shape::{validate_dimension, SupportMappable};
use crate::error::Result;

/// Convex shape representing a cylinder whose axis runs along the local Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// Radius of the cylinder.
    pub radius: f64,
    /// Half length of the cylinder along its local Y axis.
    pub half_length: f64,
}

impl Cylinder {
    /// Creates a cylinder shape.
    #[inline(always)]
    pub fn new(radius: f64, length: f64) -> Self {
        debug_assert!(
            radius >= 0.0 && length >= 0.0,
            "Cylinder dimensions must be non-negative."
        );
        Self {
            radius,
            half_length: length * 0.5,
        }
    }

    /// Creates a cylinder, rejecting negative or non-finite dimensions.
    pub fn try_new(radius: f64, length: f64) -> Result<Self> {
        Ok(Self::new(
            validate_dimension("radius", radius)?,
            validate_dimension("length", length)?,
        ))
    }

    /// Gets the length of the cylinder along its local Y axis.
    pub fn length(&self) -> f64 {
        self.half_length * 2.0
    }
}

impl SupportMappable for Cylinder {
    #[inline(always)]
    fn support_mapping(&self, direction: DVec3) -> DVec3 {
        let y = if direction.y > 0.0 {
            self.half_length
        } else {
            -self.half_length
        };
        let horizontal_length = (direction.x * direction.x + direction.z * direction.z).sqrt();
        if horizontal_length > 1e-8 {
            let normalize_scale = self.radius / horizontal_length;
            DVec3::new(direction.x * normalize_scale, y, direction.z * normalize_scale)
        } else {
            DVec3::new(0.0, y, 0.0)
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
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Cylinder dimensions must be non-negative.")]
    fn test_new_rejects_negative_length() {
        let _ = Cylinder::new(0.5, -1.0);
    }

    #[test]
    fn test_support_mapping() {
        let cylinder = Cylinder::new(1.0, 4.0);
        assert!(cylinder
            .support_mapping(DVec3::new(3.0, 1.0, 4.0))
            .abs_diff_eq(DVec3::new(0.6, 2.0, 0.8), 1e-12));
        // Straight down the axis picks the cap center.
        assert_eq!(
            cylinder.support_mapping(DVec3::NEG_Y),
            DVec3::new(0.0, -2.0, 0.0)
        );
    }
}
