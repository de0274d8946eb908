use glam::DVec3;

use crate::error::{Error, Result};

/// Defines a convex shape through its support mapping.
///
/// This is the only capability the GJK queries need: any shape that can report its farthest point
/// along a direction, plus some point inside it, can be tested against points, rays and other
/// shapes. Both operations work in the shape's local space; placement in the world is supplied
/// separately as a [`RigidPose`](crate::physics::body_properties::RigidPose).
pub trait SupportMappable {
    /// Finds the point of the shape farthest along `direction`.
    ///
    /// Imagine a plane with a normal in the search direction. Move the plane along its normal
    /// until it no longer intersects the shape; the last point touched is the result. The
    /// direction does not need to be normalized. Queries never pass a zero direction on purpose,
    /// but implementations should still return a finite point for one.
    fn support_mapping(&self, direction: DVec3) -> DVec3;

    /// Gets a point strictly inside the shape, in local space.
    fn support_center(&self) -> DVec3;
}

impl<T: SupportMappable + ?Sized> SupportMappable for &T {
    #[inline(always)]
    fn support_mapping(&self, direction: DVec3) -> DVec3 {
        (**self).support_mapping(direction)
    }

    #[inline(always)]
    fn support_center(&self) -> DVec3 {
        (**self).support_center()
    }
}

impl<T: SupportMappable + ?Sized> SupportMappable for Box<T> {
    #[inline(always)]
    fn support_mapping(&self, direction: DVec3) -> DVec3 {
        (**self).support_mapping(direction)
    }

    #[inline(always)]
    fn support_center(&self) -> DVec3 {
        (**self).support_center()
    }
}

/// Checks that a shape dimension is finite and non-negative.
#[inline]
pub(crate) fn validate_dimension(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidDimension { name, value })
    }
}
