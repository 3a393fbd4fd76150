use super::{Point3, TOLERANCE};

/// Computes the signed area of a polygon in the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Tests whether a point lies inside a closed polygon using ray crossing.
///
/// Points on the boundary (within tolerance) count as inside.
#[must_use]
pub fn point_in_polygon_2d(point: &Point3, polygon: &[Point3]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &polygon[i];
        let pj = &polygon[j];

        // On-edge check.
        let ex = pj.x - pi.x;
        let ey = pj.y - pi.y;
        let len_sq = ex * ex + ey * ey;
        if len_sq > TOLERANCE * TOLERANCE {
            let t = ((point.x - pi.x) * ex + (point.y - pi.y) * ey) / len_sq;
            let t = t.clamp(0.0, 1.0);
            let dx = point.x - (pi.x + t * ex);
            let dy = point.y - (pi.y + t * ey);
            if dx * dx + dy * dy < TOLERANCE * TOLERANCE {
                return true;
            }
        }

        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pi.x + (point.y - pi.y) / (pj.y - pi.y) * (pj.x - pi.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
