use glam::{DAffine3, DMat3, DQuat, DVec3};

/// Placement of a shape in world space.
///
/// `orientation` maps local directions to world directions (`world = orientation * local`).
/// It is usually a pure rotation, but may carry scale; support queries always rotate world
/// directions into the local frame with the transpose, so non-orthonormal orientations are
/// only approximated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidPose {
    /// Orientation of the pose.
    pub orientation: DMat3,
    /// Position of the pose.
    pub position: DVec3,
}

impl Default for RigidPose {
    #[inline(always)]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RigidPose {
    /// Returns a pose with a position at (0,0,0) and identity orientation.
    pub const IDENTITY: Self = Self {
        orientation: DMat3::IDENTITY,
        position: DVec3::ZERO,
    };

    /// Creates a rigid pose with the given position and orientation.
    #[inline(always)]
    pub fn new(position: DVec3, orientation: DMat3) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Creates a rigid pose with the given position and identity orientation.
    #[inline(always)]
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            orientation: DMat3::IDENTITY,
        }
    }

    /// Creates a rigid pose from a rotation quaternion and a position.
    #[inline(always)]
    pub fn from_rotation(position: DVec3, rotation: DQuat) -> Self {
        Self {
            position,
            orientation: DMat3::from_quat(rotation),
        }
    }

    /// Transforms a local point into world space.
    #[inline(always)]
    pub fn transform_point(&self, local: DVec3) -> DVec3 {
        self.orientation * local + self.position
    }

    /// Rotates a world direction into the local frame.
    #[inline(always)]
    pub fn inverse_rotate(&self, direction: DVec3) -> DVec3 {
        self.orientation.transpose() * direction
    }
}

impl From<DAffine3> for RigidPose {
    #[inline(always)]
    fn from(affine: DAffine3) -> Self {
        Self {
            orientation: affine.matrix3,
            position: affine.translation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_point() {
        let pose = RigidPose::from_rotation(
            DVec3::new(1.0, 2.0, 3.0),
            DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2),
        );
        let world = pose.transform_point(DVec3::X);
        assert!(world.abs_diff_eq(DVec3::new(1.0, 3.0, 3.0), 1e-12));
    }

    #[test]
    fn test_inverse_rotate_undoes_rotation() {
        let pose = RigidPose::from_rotation(DVec3::ZERO, DQuat::from_rotation_y(0.7));
        let direction = DVec3::new(0.3, -1.2, 2.5);
        let local = pose.inverse_rotate(pose.orientation * direction);
        assert!(local.abs_diff_eq(direction, 1e-12));
    }

    #[test]
    fn test_from_affine() {
        let affine = DAffine3::from_translation(DVec3::new(4.0, 5.0, 6.0));
        let pose = RigidPose::from(affine);
        assert_eq!(pose.position, DVec3::new(4.0, 5.0, 6.0));
        assert_eq!(pose.orientation, DMat3::IDENTITY);
    }
}
