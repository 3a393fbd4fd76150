pub mod angle;
pub mod intersect_2d;
pub mod polygon_2d;
pub mod vector;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for point-coincidence checks.
pub const TOLERANCE: f64 = 1e-9;

/// Node-merging tolerance for the planar arrangement.
///
/// Larger than [`TOLERANCE`] to absorb trig round-trip noise, but far
/// below the smallest bridge gap so offset geometry never collapses.
pub const MERGE_TOLERANCE: f64 = 1e-7;
