use super::Point3;

/// Absolute direction from `p1` to `p2` in degrees, normalized to [0, 360).
///
/// Computed as `atan2(p2.y - p1.y, p2.x - p1.x)` converted to degrees.
#[must_use]
pub fn angle_between_deg(p1: &Point3, p2: &Point3) -> f64 {
    let deg = (p2.y - p1.y).atan2(p2.x - p1.x).to_degrees();
    (deg + 360.0) % 360.0
}

/// Normalizes an angle in degrees to [0, 360).
#[must_use]
pub fn normalize_deg(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Composes the next pass angle from the previous guide angle and a step.
///
/// The very first pass has no previous guide; callers use the start angle
/// directly instead of composing.
#[must_use]
pub fn compose_deg(previous_deg: f64, step_deg: f64) -> f64 {
    normalize_deg(previous_deg + step_deg)
}

/// Arithmetic mean of two points, z included, for sketches embedded at a
/// depth.
#[must_use]
pub fn midpoint(start: &Point3, end: &Point3) -> Point3 {
    Point3::new(
        (start.x + end.x) / 2.0,
        (start.y + end.y) / 2.0,
        (start.z + end.z) / 2.0,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn cardinal_directions() {
        let origin = p(0.0, 0.0);
        assert!((angle_between_deg(&origin, &p(1.0, 0.0))).abs() < TOLERANCE);
        assert!((angle_between_deg(&origin, &p(0.0, 1.0)) - 90.0).abs() < TOLERANCE);
        assert!((angle_between_deg(&origin, &p(-1.0, 0.0)) - 180.0).abs() < TOLERANCE);
        assert!((angle_between_deg(&origin, &p(0.0, -1.0)) - 270.0).abs() < TOLERANCE);
    }

    #[test]
    fn always_in_range() {
        let origin = p(0.3, -0.7);
        for i in 0..36 {
            let theta = f64::from(i) * 10.0_f64.to_radians();
            let target = p(origin.x + theta.cos(), origin.y + theta.sin());
            let a = angle_between_deg(&origin, &target);
            assert!((0.0..360.0).contains(&a), "angle {a} out of range");
        }
    }

    #[test]
    fn reversed_points_differ_by_180() {
        let a = p(1.0, 2.0);
        let b = p(-3.0, 0.5);
        let forward = angle_between_deg(&a, &b);
        let backward = angle_between_deg(&b, &a);
        approx::assert_relative_eq!((forward + 180.0) % 360.0, backward, epsilon = 1e-9);
    }

    #[test]
    fn compose_wraps_past_360() {
        assert!((compose_deg(270.0, 180.0) - 90.0).abs() < TOLERANCE);
        assert!((compose_deg(0.0, 90.0) - 90.0).abs() < TOLERANCE);
    }

    #[test]
    fn normalize_negative_angles() {
        assert!((normalize_deg(-90.0) - 270.0).abs() < TOLERANCE);
        assert!((normalize_deg(720.0)).abs() < TOLERANCE);
    }

    #[test]
    fn midpoint_averages_z() {
        let m = midpoint(&Point3::new(0.0, 0.0, 1.0), &Point3::new(2.0, 4.0, 3.0));
        assert!((m - Point3::new(1.0, 2.0, 2.0)).norm() < TOLERANCE);
    }
}
