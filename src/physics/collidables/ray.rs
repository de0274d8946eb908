use glam::DVec3;

/// Data for a single ray.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: DVec3,
    /// Direction of the ray. Not required to be unit length; fractions are measured in its units.
    pub direction: DVec3,
}

impl Ray {
    /// Creates a ray from an origin and a direction.
    #[inline(always)]
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Gets the point at `fraction` along the ray: `origin + fraction * direction`.
    #[inline(always)]
    pub fn point_at(&self, fraction: f64) -> DVec3 {
        self.origin + self.direction * fraction
    }
}

/// Result of a ray intersecting a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Position of the impact along the ray, in units of the ray direction.
    pub fraction: f64,
    /// Surface normal at the impact. Unit length when meaningful, zero otherwise.
    pub normal: DVec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_at() {
        let ray = Ray::new(DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 2.0, 0.0));
        assert_eq!(ray.point_at(0.5), DVec3::new(1.0, 1.0, 0.0));
    }
}
