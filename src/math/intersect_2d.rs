use std::f64::consts::PI;

use super::{Point3, Vector3, TOLERANCE};

/// Intersection of an infinite line `origin + t * dir` with the bounded
/// segment `b0..b1`, projected onto the XY plane.
///
/// Returns `(point, t)` with `t` unbounded; the segment parameter is
/// clamped to `[0, 1]` with an endpoint-inclusive epsilon.
#[must_use]
pub fn infinite_line_segment(
    origin: &Point3,
    dir: &Vector3,
    b0: &Point3,
    b1: &Point3,
) -> Option<(Point3, f64)> {
    let db = Vector3::new(b1.x - b0.x, b1.y - b0.y, 0.0);
    let cross = dir.x * db.y - dir.y * db.x;
    if cross.abs() < TOLERANCE {
        return None;
    }

    let dx = b0.x - origin.x;
    let dy = b0.y - origin.y;
    let t = (dx * db.y - dy * db.x) / cross;
    let u = (dx * dir.y - dy * dir.x) / cross;

    let eps = TOLERANCE;
    if u >= -eps && u <= 1.0 + eps {
        let pt = Point3::new(origin.x + dir.x * t, origin.y + dir.y * t, origin.z);
        Some((pt, t))
    } else {
        None
    }
}

/// Intersections of an infinite line with a full circle.
///
/// Returns `(point, t)` pairs with `t` unbounded along `dir`.
#[must_use]
pub fn infinite_line_circle(
    origin: &Point3,
    dir: &Vector3,
    center: &Point3,
    radius: f64,
) -> Vec<(Point3, f64)> {
    let mut results = Vec::new();
    if radius < TOLERANCE {
        return results;
    }

    let dir_len_sq = dir.x * dir.x + dir.y * dir.y;
    if dir_len_sq < TOLERANCE * TOLERANCE {
        return results;
    }

    // Substitute the parametric line into the circle equation:
    // (ox + t*dx - cx)² + (oy + t*dy - cy)² = r²
    let fx = origin.x - center.x;
    let fy = origin.y - center.y;
    let a = dir_len_sq;
    let b = 2.0 * (fx * dir.x + fy * dir.y);
    let c = fx * fx + fy * fy - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < -TOLERANCE {
        return results;
    }
    let disc_sqrt = discriminant.max(0.0).sqrt();

    let t_roots = if disc_sqrt < TOLERANCE * 100.0 {
        // Tangent case: single root.
        vec![-b / (2.0 * a)]
    } else {
        vec![(-b - disc_sqrt) / (2.0 * a), (-b + disc_sqrt) / (2.0 * a)]
    };

    for t in t_roots {
        let pt = Point3::new(origin.x + t * dir.x, origin.y + t * dir.y, origin.z);
        results.push((pt, t));
    }

    results
}

/// Intersections of an infinite line with a circular arc.
///
/// The arc has `center`, `radius`, `start_angle`, and signed `sweep` in
/// radians. Circle hits outside the arc's angular range are discarded.
#[must_use]
pub fn infinite_line_arc(
    origin: &Point3,
    dir: &Vector3,
    center: &Point3,
    radius: f64,
    start_angle: f64,
    sweep: f64,
) -> Vec<(Point3, f64)> {
    if sweep.abs() < TOLERANCE {
        return Vec::new();
    }
    infinite_line_circle(origin, dir, center, radius)
        .into_iter()
        .filter(|(pt, _)| {
            let angle = (pt.y - center.y).atan2(pt.x - center.x);
            angle_to_arc_param(angle, start_angle, sweep).is_some()
        })
        .collect()
}

/// Intersections of an infinite line with an ellipse.
///
/// The ellipse has `center`, semi-axes `major_radius`/`minor_radius`, and
/// its major axis rotated by `rotation` radians from +X. The line is
/// transformed into the ellipse frame and the quadratic solved there.
#[must_use]
pub fn infinite_line_ellipse(
    origin: &Point3,
    dir: &Vector3,
    center: &Point3,
    major_radius: f64,
    minor_radius: f64,
    rotation: f64,
) -> Vec<(Point3, f64)> {
    let mut results = Vec::new();
    if major_radius < TOLERANCE || minor_radius < TOLERANCE {
        return results;
    }

    let (sin_r, cos_r) = rotation.sin_cos();

    // Line origin and direction in the ellipse's local frame.
    let rx = origin.x - center.x;
    let ry = origin.y - center.y;
    let ox = rx * cos_r + ry * sin_r;
    let oy = -rx * sin_r + ry * cos_r;
    let dx = dir.x * cos_r + dir.y * sin_r;
    let dy = -dir.x * sin_r + dir.y * cos_r;

    // (ox + t*dx)²/a² + (oy + t*dy)²/b² = 1
    let inv_a_sq = 1.0 / (major_radius * major_radius);
    let inv_b_sq = 1.0 / (minor_radius * minor_radius);
    let qa = dx * dx * inv_a_sq + dy * dy * inv_b_sq;
    let qb = 2.0 * (ox * dx * inv_a_sq + oy * dy * inv_b_sq);
    let qc = ox * ox * inv_a_sq + oy * oy * inv_b_sq - 1.0;

    if qa < TOLERANCE * TOLERANCE {
        return results;
    }
    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant < -TOLERANCE {
        return results;
    }
    let disc_sqrt = discriminant.max(0.0).sqrt();

    let t_roots = if disc_sqrt < TOLERANCE * 100.0 {
        vec![-qb / (2.0 * qa)]
    } else {
        vec![(-qb - disc_sqrt) / (2.0 * qa), (-qb + disc_sqrt) / (2.0 * qa)]
    };

    for t in t_roots {
        let pt = Point3::new(origin.x + t * dir.x, origin.y + t * dir.y, origin.z);
        results.push((pt, t));
    }

    results
}

/// Intersections of an infinite line with an open polyline.
///
/// Used for spline curves, which intersect through their fitted points.
#[must_use]
pub fn infinite_line_polyline(
    origin: &Point3,
    dir: &Vector3,
    points: &[Point3],
) -> Vec<(Point3, f64)> {
    let mut results = Vec::new();
    for pair in points.windows(2) {
        if let Some(hit) = infinite_line_segment(origin, dir, &pair[0], &pair[1]) {
            // Shared polyline vertices produce duplicate hits.
            let duplicate = results
                .iter()
                .any(|(p, _): &(Point3, f64)| (p - hit.0).norm() < TOLERANCE * 100.0);
            if !duplicate {
                results.push(hit);
            }
        }
    }
    results
}

/// Converts an absolute angle to an arc parameter `t` in `[0, 1]`.
///
/// Returns `None` if the angle is not within the arc's angular range.
pub(crate) fn angle_to_arc_param(angle: f64, start_angle: f64, sweep: f64) -> Option<f64> {
    let eps = TOLERANCE * 100.0;

    // Compute the angular offset from start_angle in the sweep direction.
    let mut delta = angle - start_angle;

    if sweep > 0.0 {
        while delta < -eps {
            delta += 2.0 * PI;
        }
        while delta > 2.0 * PI + eps {
            delta -= 2.0 * PI;
        }
    } else {
        while delta > eps {
            delta -= 2.0 * PI;
        }
        while delta < -2.0 * PI - eps {
            delta += 2.0 * PI;
        }
    }

    let t = delta / sweep;
    if t >= -eps && t <= 1.0 + eps {
        Some(t.clamp(0.0, 1.0))
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn east() -> Vector3 {
        Vector3::new(1.0, 0.0, 0.0)
    }

    #[test]
    fn line_hits_segment_behind_origin() {
        // The infinite extension reaches the segment at t = -2.
        let hit = infinite_line_segment(&p(0.0, 0.0), &east(), &p(-2.0, -1.0), &p(-2.0, 1.0));
        let (pt, t) = hit.unwrap();
        assert!((pt - p(-2.0, 0.0)).norm() < TOLERANCE);
        assert!((t + 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn line_misses_short_segment() {
        let hit = infinite_line_segment(&p(0.0, 0.0), &east(), &p(3.0, 1.0), &p(3.0, 2.0));
        assert!(hit.is_none());
    }

    #[test]
    fn parallel_segment_returns_none() {
        let hit = infinite_line_segment(&p(0.0, 0.0), &east(), &p(0.0, 1.0), &p(5.0, 1.0));
        assert!(hit.is_none());
    }

    #[test]
    fn line_circle_two_hits() {
        let hits = infinite_line_circle(&p(0.0, 0.0), &east(), &p(0.0, 0.0), 2.0);
        assert_eq!(hits.len(), 2);
        let mut ts: Vec<f64> = hits.iter().map(|(_, t)| *t).collect();
        ts.sort_by(f64::total_cmp);
        assert!((ts[0] + 2.0).abs() < TOLERANCE);
        assert!((ts[1] - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn line_circle_tangent_single_hit() {
        let hits = infinite_line_circle(&p(0.0, 1.0), &east(), &p(0.0, 0.0), 1.0);
        assert_eq!(hits.len(), 1, "hits={hits:?}");
        assert!((hits[0].0 - p(0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn line_circle_miss() {
        let hits = infinite_line_circle(&p(0.0, 5.0), &east(), &p(0.0, 0.0), 1.0);
        assert!(hits.is_empty());
    }

    #[test]
    fn line_arc_respects_angular_range() {
        // Horizontal line through the circle center; arc covers only the
        // right half, so only the x = +1 crossing survives.
        let hits = infinite_line_arc(
            &p(0.0, 0.0),
            &east(),
            &p(0.0, 0.0),
            1.0,
            -PI / 2.0,
            PI,
        );
        assert_eq!(hits.len(), 1, "hits={hits:?}");
        assert!((hits[0].0 - p(1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn line_ellipse_axis_aligned() {
        let hits = infinite_line_ellipse(&p(0.0, 0.0), &east(), &p(0.0, 0.0), 3.0, 1.0, 0.0);
        assert_eq!(hits.len(), 2);
        let mut xs: Vec<f64> = hits.iter().map(|(pt, _)| pt.x).collect();
        xs.sort_by(f64::total_cmp);
        assert!((xs[0] + 3.0).abs() < 1e-9);
        assert!((xs[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn line_ellipse_rotated_90() {
        // Major axis along Y after rotation: the horizontal line now exits
        // at the minor radius.
        let hits =
            infinite_line_ellipse(&p(0.0, 0.0), &east(), &p(0.0, 0.0), 3.0, 1.0, PI / 2.0);
        assert_eq!(hits.len(), 2);
        let mut xs: Vec<f64> = hits.iter().map(|(pt, _)| pt.x).collect();
        xs.sort_by(f64::total_cmp);
        assert!((xs[0] + 1.0).abs() < 1e-9);
        assert!((xs[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn line_polyline_crossings() {
        // Zig-zag polyline crossing y=0 twice.
        let pts = [p(-1.0, -1.0), p(0.0, 1.0), p(1.0, -1.0)];
        let hits = infinite_line_polyline(&p(0.0, 0.0), &east(), &pts);
        assert_eq!(hits.len(), 2, "hits={hits:?}");
    }
}
