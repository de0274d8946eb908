use glam::DVec3;

use super::shape::SupportMappable;
use crate::error::{Error, Result};
use crate::utilities::math_helper;

/// Convex shape defined by the convex hull of a point cloud.
///
/// Points are kept as given; interior points are harmless since the support mapping only ever
/// selects extreme points. The support center is the centroid of the points.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHull {
    points: Vec<DVec3>,
    center: DVec3,
}

impl ConvexHull {
    /// Creates a hull from a point cloud in local space.
    pub fn new(points: Vec<DVec3>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyHull);
        }
        if !points.iter().all(|p| math_helper::is_finite(*p)) {
            return Err(Error::NonFiniteInput("convex hull point"));
        }
        let center = points.iter().copied().sum::<DVec3>() / points.len() as f64;
        Ok(Self { points, center })
    }

    /// Gets the points the hull was built from.
    #[inline(always)]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }
}

impl SupportMappable for ConvexHull {
    fn support_mapping(&self, direction: DVec3) -> DVec3 {
        let mut best = self.points[0];
        let mut best_dot = best.dot(direction);
        for &point in &self.points[1..] {
            let dot = point.dot(direction);
            if dot > best_dot {
                best_dot = dot;
                best = point;
            }
        }
        best
    }

    #[inline(always)]
    fn support_center(&self) -> DVec3 {
        self.center
    }
}
