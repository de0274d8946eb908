pub mod ray;
pub mod shape;

// Convex shape primitives
pub mod box_shape;
pub mod capsule;
pub mod convex_hull;
pub mod cylinder;
pub mod ellipsoid;
pub mod sphere;
