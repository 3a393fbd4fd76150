use nalgebra::{Rotation3, Unit};

use super::{Point3, Vector3, TOLERANCE};
use crate::error::{GeometryError, Result};

/// A cardinal rotation axis through the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn unit(self) -> Unit<Vector3> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

/// Returns the vector from `p2` to `p1`, componentwise `p1 - p2`.
#[must_use]
pub fn vector_between(p1: &Point3, p2: &Point3) -> Vector3 {
    p1 - p2
}

/// Rotates a vector about a cardinal axis through the origin.
///
/// The angle is given in degrees; positive angles follow the right-hand
/// rule around the axis.
#[must_use]
pub fn rotate(v: &Vector3, axis: Axis, degrees: f64) -> Vector3 {
    Rotation3::from_axis_angle(&axis.unit(), degrees.to_radians()) * v
}

/// Flips a vector by 180 degrees.
///
/// Equivalent to `scale(v, -1.0)`; named because it generates the second
/// of a symmetric pair of offset lines from the first.
#[must_use]
pub fn rotate180(v: &Vector3) -> Vector3 {
    -v
}

/// Returns the unit vector with the same direction as `v`.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateVector`] if the magnitude is ~0.
pub fn normalize(v: &Vector3) -> Result<Vector3> {
    let len = v.norm();
    if len < TOLERANCE {
        return Err(GeometryError::DegenerateVector.into());
    }
    Ok(v / len)
}

/// Scales a vector by a factor.
#[must_use]
pub fn scale(v: &Vector3, factor: f64) -> Vector3 {
    v * factor
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    #[test]
    fn vector_between_is_componentwise_difference() {
        let d = vector_between(&Point3::new(3.0, 5.0, 1.0), &Point3::new(1.0, 2.0, 1.0));
        assert!((d - v(2.0, 3.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn rotate_90_about_z() {
        let r = rotate(&v(1.0, 0.0, 0.0), Axis::Z, 90.0);
        assert!((r - v(0.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn rotate_round_trip_all_axes() {
        let original = v(0.3, -1.2, 2.5);
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            for theta in [17.0, 90.0, 123.456, 300.0] {
                let back = rotate(&rotate(&original, axis, theta), axis, -theta);
                assert!(
                    (back - original).norm() < TOLERANCE,
                    "round trip failed for {axis:?} at {theta} degrees"
                );
            }
        }
    }

    #[test]
    fn rotate180_negates() {
        let original = v(2.0, -3.0, 0.5);
        assert!((rotate180(&original) - scale(&original, -1.0)).norm() < TOLERANCE);
    }

    #[test]
    fn rotate180_is_involution() {
        let original = v(1.0, 4.0, -2.0);
        assert!((rotate180(&rotate180(&original)) - original).norm() < TOLERANCE);
    }

    #[test]
    fn rotate180_matches_axis_rotation() {
        // A 180-degree turn about Z equals negation for in-plane vectors.
        let original = v(1.5, -0.5, 0.0);
        let turned = rotate(&original, Axis::Z, 180.0);
        assert!((turned - rotate180(&original)).norm() < 1e-12);
    }

    #[test]
    fn normalize_unit_length() {
        let n = normalize(&v(3.0, 4.0, 0.0)).unwrap();
        approx::assert_relative_eq!(n.norm(), 1.0, epsilon = TOLERANCE);
        assert!((n - v(0.6, 0.8, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn normalize_zero_vector_fails() {
        assert!(normalize(&v(0.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn scale_by_factor() {
        assert!((scale(&v(1.0, -2.0, 3.0), 2.5) - v(2.5, -5.0, 7.5)).norm() < TOLERANCE);
    }
}
