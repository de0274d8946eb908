use crate::error::{Error, Result};
use crate::utilities::math_helper;

/// Iteration ceilings and tolerances used by the GJK queries.
///
/// The defaults are empirically chosen; callers rely on the precision and cost they produce, so
/// change them deliberately. Every query stops after `max_iterations` refinements no matter how far
/// it has converged, which bounds the worst-case cost of a call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GjkSettings {
    /// Maximum number of refinement iterations per query.
    pub max_iterations: u32,
    /// Distance tolerance below which a point query reports the point as inside.
    pub pointcast_epsilon: f64,
    /// Distance tolerance below which the closest point query stops refining.
    pub closest_points_epsilon: f64,
    /// Distance tolerance below which a ray cast reports convergence.
    pub raycast_epsilon: f64,
    /// General tolerance for progress tests and for deciding whether a normal is meaningful.
    pub separation_epsilon: f64,
}

impl GjkSettings {
    pub const MAX_ITERATIONS_DEFAULT: u32 = 15;
    pub const POINTCAST_EPSILON_DEFAULT: f64 = 1e-4;
    pub const CLOSEST_POINTS_EPSILON_DEFAULT: f64 = 1e-5;
    pub const RAYCAST_EPSILON_DEFAULT: f64 = 1e-6;
    pub const SEPARATION_EPSILON_DEFAULT: f64 = math_helper::EPSILON;

    /// Creates settings with the default constants.
    pub const fn new() -> Self {
        Self {
            max_iterations: Self::MAX_ITERATIONS_DEFAULT,
            pointcast_epsilon: Self::POINTCAST_EPSILON_DEFAULT,
            closest_points_epsilon: Self::CLOSEST_POINTS_EPSILON_DEFAULT,
            raycast_epsilon: Self::RAYCAST_EPSILON_DEFAULT,
            separation_epsilon: Self::SEPARATION_EPSILON_DEFAULT,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_pointcast_epsilon(mut self, epsilon: f64) -> Self {
        self.pointcast_epsilon = epsilon;
        self
    }

    pub fn with_closest_points_epsilon(mut self, epsilon: f64) -> Self {
        self.closest_points_epsilon = epsilon;
        self
    }

    pub fn with_raycast_epsilon(mut self, epsilon: f64) -> Self {
        self.raycast_epsilon = epsilon;
        self
    }

    pub fn with_separation_epsilon(mut self, epsilon: f64) -> Self {
        self.separation_epsilon = epsilon;
        self
    }

    /// Checks that the iteration ceiling is non-zero and every tolerance is finite and positive.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidSettings {
                name: "max_iterations",
                reason: "must be at least one",
            });
        }
        let tolerances = [
            ("pointcast_epsilon", self.pointcast_epsilon),
            ("closest_points_epsilon", self.closest_points_epsilon),
            ("raycast_epsilon", self.raycast_epsilon),
            ("separation_epsilon", self.separation_epsilon),
        ];
        for (name, value) in tolerances {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidSettings {
                    name,
                    reason: "must be finite and positive",
                });
            }
        }
        Ok(())
    }
}

impl Default for GjkSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GjkSettings::default();
        assert_eq!(settings.max_iterations, 15);
        assert_eq!(settings.pointcast_epsilon, 1e-4);
        assert_eq!(settings.closest_points_epsilon, 1e-5);
        assert_eq!(settings.raycast_epsilon, 1e-6);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let settings = GjkSettings::default().with_max_iterations(0);
        assert_eq!(
            settings.validate(),
            Err(Error::InvalidSettings {
                name: "max_iterations",
                reason: "must be at least one",
            })
        );
    }

    #[test]
    fn test_validate_rejects_bad_tolerances() {
        assert!(GjkSettings::default()
            .with_raycast_epsilon(-1.0)
            .validate()
            .is_err());
        assert!(GjkSettings::default()
            .with_pointcast_epsilon(f64::NAN)
            .validate()
            .is_err());
        assert!(GjkSettings::default()
            .with_separation_epsilon(0.0)
            .validate()
            .is_err());
        assert!(GjkSettings::default()
            .with_closest_points_epsilon(1e-3)
            .validate()
            .is_ok());
    }
}
