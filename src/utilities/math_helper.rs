use glam::DVec3;

/// General purpose tolerance shared by the collision queries.
pub const EPSILON: f64 = 1e-6;

/// Squared form of [`EPSILON`].
pub const EPSILON_SQUARED: f64 = EPSILON * EPSILON;

/// Normalizes `v` if its squared length exceeds `threshold_squared`; otherwise returns it unchanged.
///
/// Queries use this to report a unit normal only when the underlying vector carries a meaningful
/// direction. Short vectors are passed through as is so that callers can still detect contact.
#[inline(always)]
pub fn normalize_if_significant(v: DVec3, threshold_squared: f64) -> DVec3 {
    let length_squared = v.length_squared();
    if length_squared > threshold_squared {
        v / length_squared.sqrt()
    } else {
        v
    }
}

/// Returns `direction` unless it is too short to define a direction, in which case `fallback` is used.
#[inline(always)]
pub fn direction_or(direction: DVec3, fallback: DVec3) -> DVec3 {
    if direction.length_squared() > EPSILON_SQUARED {
        direction
    } else {
        fallback
    }
}

/// Returns true if every component of the vector is finite.
#[inline(always)]
pub fn is_finite(v: DVec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_if_significant() {
        let n = normalize_if_significant(DVec3::new(3.0, 0.0, 4.0), EPSILON_SQUARED);
        assert!((n.length() - 1.0).abs() < 1e-12);

        let tiny = DVec3::new(1e-9, 0.0, 0.0);
        assert_eq!(normalize_if_significant(tiny, EPSILON_SQUARED), tiny);
    }

    #[test]
    fn test_direction_or() {
        assert_eq!(direction_or(DVec3::ZERO, DVec3::X), DVec3::X);
        assert_eq!(direction_or(DVec3::Y, DVec3::X), DVec3::Y);
    }
}
