//! World-space support queries for posed shapes.

use glam::DVec3;

use crate::physics::body_properties::RigidPose;
use crate::physics::collidables::shape::SupportMappable;

/// Computes the support point of a posed shape in world space.
///
/// The world direction is rotated into the shape's local frame with the transpose of the
/// orientation, the shape's local support mapping is evaluated, and the resulting point is rotated
/// back and translated by the pose position. `direction` must not be zero; what a shape returns
/// for a zero direction is up to the shape.
#[inline(always)]
pub fn support_map_transformed<S: SupportMappable + ?Sized>(
    support: &S,
    pose: &RigidPose,
    direction: DVec3,
) -> DVec3 {
    let local_direction = pose.inverse_rotate(direction);
    let local_support = support.support_mapping(local_direction);
    pose.transform_point(local_support)
}

/// Computes the support center of a posed shape in world space.
#[inline(always)]
pub fn support_center_transformed<S: SupportMappable + ?Sized>(
    support: &S,
    pose: &RigidPose,
) -> DVec3 {
    pose.transform_point(support.support_center())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collidables::box_shape::Cuboid;
    use glam::DQuat;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity_pose_matches_local_support() {
        let cuboid = Cuboid::new(2.0, 2.0, 2.0);
        let direction = DVec3::new(1.0, -2.0, 0.5);
        assert_eq!(
            support_map_transformed(&cuboid, &RigidPose::IDENTITY, direction),
            cuboid.support_mapping(direction)
        );
    }

    #[test]
    fn test_rotated_and_translated_support() {
        // A long box along local X, rotated a quarter turn about Z so it lies along world Y.
        let cuboid = Cuboid::new(4.0, 1.0, 1.0);
        let pose = RigidPose::from_rotation(
            DVec3::new(10.0, 0.0, 0.0),
            DQuat::from_rotation_z(FRAC_PI_2),
        );
        let support = support_map_transformed(&cuboid, &pose, DVec3::new(0.1, 1.0, 0.1));
        assert!(support.abs_diff_eq(DVec3::new(10.5, 2.0, 0.5), 1e-9));

        let center = support_center_transformed(&cuboid, &pose);
        assert!(center.abs_diff_eq(DVec3::new(10.0, 0.0, 0.0), 1e-12));
    }
}
