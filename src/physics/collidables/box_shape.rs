use glam::DVec3;

use super::shape::{validate_dimension, SupportMappable};
use crate::error::Result;

/// Convex shape representing a solid cuboid centered on its local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    /// Half of the cuboid's width along its local X axis.
    pub half_width: f64,
    /// Half of the cuboid's height along its local Y axis.
    pub half_height: f64,
    /// Half of the cuboid's length along its local Z axis.
    pub half_length: f64,
}

impl Cuboid {
    /// Creates a cuboid from its full width, height and length.
    #[inline(always)]
    pub fn new(width: f64, height: f64, length: f64) -> Self {
        debug_assert!(
            width >= 0.0 && height >= 0.0 && length >= 0.0,
            "Cuboid dimensions must be non-negative."
        );
        Self {
            half_width: width * 0.5,
            half_height: height * 0.5,
            half_length: length * 0.5,
        }
    }

    /// Creates a cuboid from its half extents.
    #[inline(always)]
    pub fn from_half_extents(half_extents: DVec3) -> Self {
        Self {
            half_width: half_extents.x,
            half_height: half_extents.y,
            half_length: half_extents.z,
        }
    }

    /// Creates a cuboid, rejecting negative or non-finite dimensions.
    pub fn try_new(width: f64, height: f64, length: f64) -> Result<Self> {
        Ok(Self::new(
            validate_dimension("width", width)?,
            validate_dimension("height", height)?,
            validate_dimension("length", length)?,
        ))
    }

    /// Gets the full width of the cuboid along its local X axis.
    #[inline(always)]
    pub fn width(&self) -> f64 {
        self.half_width * 2.0
    }

    /// Gets the full height of the cuboid along its local Y axis.
    #[inline(always)]
    pub fn height(&self) -> f64 {
        self.half_height * 2.0
    }

    /// Gets the full length of the cuboid along its local Z axis.
    #[inline(always)]
    pub fn length(&self) -> f64 {
        self.half_length * 2.0
    }

    /// Gets the half extents as a vector.
    #[inline(always)]
    pub fn half_extents(&self) -> DVec3 {
        DVec3::new(self.half_width, self.half_height, self.half_length)
    }
}

impl SupportMappable for Cuboid {
    #[inline(always)]
    fn support_mapping(&self, direction: DVec3) -> DVec3 {
        DVec3::new(
            if direction.x < 0.0 { -self.half_width } else { self.half_width },
            if direction.y < 0.0 { -self.half_height } else { self.half_height },
            if direction.z < 0.0 { -self.half_length } else { self.half_length },
        )
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
    fn test_full_dimensions() {
        let cuboid = Cuboid::new(2.0, 4.0, 6.0);
        assert_eq!(cuboid.width(), 2.0);
        assert_eq!(cuboid.height(), 4.0);
        assert_eq!(cuboid.length(), 6.0);
    }

    #[test]
    fn test_support_picks_corner() {
        let cuboid = Cuboid::new(2.0, 4.0, 6.0);
        assert_eq!(
            cuboid.support_mapping(DVec3::new(1.0, -1.0, 0.5)),
            DVec3::new(1.0, -2.0, 3.0)
        );
        assert_eq!(cuboid.length(), 6.0);
    }

    #[test]
    fn test_try_new() {
        assert!(Cuboid::try_new(1.0, -1.0, 1.0).is_err());
        assert_eq!(
            Cuboid::try_new(1.0, 2.0, 3.0).unwrap().half_extents(),
            DVec3::new(0.5, 1.0, 1.5)
        );
    }
}
