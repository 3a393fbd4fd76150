use crate::error::Result;
use crate::math::{angle, intersect_2d, Point3};
use crate::sketch::{Line, SketchCurve, SketchCurveId};

/// Result of extending a line to the surrounding boundary.
///
/// One trim point per side of the original segment's midpoint, each with
/// the boundary curve it landed on. A side with no intersection keeps
/// the original endpoint and reports no curve.
#[derive(Debug, Clone)]
pub struct TrimResult {
    pub start: Point3,
    pub end: Point3,
    pub start_curve: Option<SketchCurveId>,
    pub end_curve: Option<SketchCurveId>,
}

/// Extends a finite line to an infinite one and trims it against a
/// collection of boundary curves.
///
/// Side classification works by angular comparison from the segment
/// midpoint: each intersection's direction toward the midpoint is
/// rounded to a whole degree and matched against the segment's own
/// start/end directions. The integer-degree rounding absorbs float noise
/// from the trigonometric round trip; directions within half a degree of
/// exactly opposite can still misclassify, which is accepted behavior.
pub struct ExtendToBoundary {
    line: Line,
}

impl ExtendToBoundary {
    /// Creates a new `ExtendToBoundary` operation.
    #[must_use]
    pub fn new(line: Line) -> Self {
        Self { line }
    }

    /// Executes the trim against a boundary snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the line to extend is degenerate.
    pub fn execute(&self, boundary: &[(SketchCurveId, SketchCurve)]) -> Result<TrimResult> {
        // Validates the segment before any angular work.
        let _ = self.line.direction()?;

        let origin = self.line.start;
        let dir = self.line.end - self.line.start;
        let middle = self.line.midpoint();

        let start_code = round_deg(angle::angle_between_deg(&self.line.start, &self.line.end));
        let end_code = (start_code + 180).rem_euclid(360);

        let mut hits: Vec<(Point3, SketchCurveId)> = Vec::new();
        for (id, curve) in boundary {
            let points: Vec<Point3> = match curve {
                SketchCurve::Line(l) => {
                    intersect_2d::infinite_line_segment(&origin, &dir, &l.start, &l.end)
                        .map(|(pt, _)| pt)
                        .into_iter()
                        .collect()
                }
                SketchCurve::Circle(c) => {
                    intersect_2d::infinite_line_circle(&origin, &dir, &c.center, c.radius)
                        .into_iter()
                        .map(|(pt, _)| pt)
                        .collect()
                }
                SketchCurve::Arc(a) => intersect_2d::infinite_line_arc(
                    &origin,
                    &dir,
                    &a.center,
                    a.radius,
                    a.start_angle,
                    a.sweep,
                )
                .into_iter()
                .map(|(pt, _)| pt)
                .collect(),
                SketchCurve::Ellipse(e) => intersect_2d::infinite_line_ellipse(
                    &origin,
                    &dir,
                    &e.center,
                    e.major_radius,
                    e.minor_radius,
                    e.rotation,
                )
                .into_iter()
                .map(|(pt, _)| pt)
                .collect(),
                SketchCurve::Spline(s) => {
                    intersect_2d::infinite_line_polyline(&origin, &dir, &s.points)
                        .into_iter()
                        .map(|(pt, _)| pt)
                        .collect()
                }
            };
            hits.extend(points.into_iter().map(|pt| (pt, *id)));
        }

        // Split hits into start-side and end-side candidates.
        let mut start_candidates: Vec<(Point3, SketchCurveId)> = Vec::new();
        let mut end_candidates: Vec<(Point3, SketchCurveId)> = Vec::new();
        for (pt, id) in hits {
            let code = round_deg(angle::angle_between_deg(&pt, &middle));
            if code == start_code {
                start_candidates.push((pt, id));
            } else if code == end_code {
                end_candidates.push((pt, id));
            }
        }

        let nearest = |candidates: &[(Point3, SketchCurveId)]| {
            candidates
                .iter()
                .min_by(|(a, _), (b, _)| {
                    let da = (a - middle).norm();
                    let db = (b - middle).norm();
                    da.total_cmp(&db)
                })
                .copied()
        };

        let (start, start_curve) = match nearest(&start_candidates) {
            Some((pt, id)) => (pt, Some(id)),
            None => (self.line.start, None),
        };
        let (end, end_curve) = match nearest(&end_candidates) {
            Some((pt, id)) => (pt, Some(id)),
            None => (self.line.end, None),
        };

        Ok(TrimResult {
            start,
            end,
            start_curve,
            end_curve,
        })
    }
}

/// Rounds an angle in degrees to the nearest whole degree, mod 360.
#[allow(clippy::cast_possible_truncation)]
fn round_deg(deg: f64) -> i64 {
    (deg.round() as i64).rem_euclid(360)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;
    use crate::sketch::{Circle, Sketch, Spline};

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    /// Unit square centered at the origin, as sketch boundary curves.
    fn unit_square_boundary() -> (Sketch, Vec<SketchCurveId>) {
        let mut sketch = Sketch::new(0.0);
        let h = 0.5;
        let corners = [p(-h, -h), p(h, -h), p(h, h), p(-h, h)];
        let ids = (0..4)
            .map(|i| {
                sketch.add_curve(SketchCurve::Line(Line::new(
                    corners[i],
                    corners[(i + 1) % 4],
                )))
            })
            .collect();
        (sketch, ids)
    }

    #[test]
    fn trims_to_square_sides() {
        let (sketch, ids) = unit_square_boundary();
        let boundary = sketch.boundary_curves();

        // Short horizontal segment through the center at 0 degrees.
        let segment = Line::new(p(-0.1, 0.0), p(0.1, 0.0));
        let trim = ExtendToBoundary::new(segment).execute(&boundary).unwrap();

        assert!((trim.start - p(-0.5, 0.0)).norm() < TOLERANCE);
        assert!((trim.end - p(0.5, 0.0)).norm() < TOLERANCE);
        // Left edge is the fourth boundary line, right edge the second.
        assert_eq!(trim.start_curve, Some(ids[3]));
        assert_eq!(trim.end_curve, Some(ids[1]));
    }

    #[test]
    fn nearest_candidate_wins_per_side() {
        let (mut sketch, _) = unit_square_boundary();
        // A second, larger square: its edges are farther from the middle.
        let h = 2.0;
        let corners = [p(-h, -h), p(h, -h), p(h, h), p(-h, h)];
        for i in 0..4 {
            sketch.add_curve(SketchCurve::Line(Line::new(
                corners[i],
                corners[(i + 1) % 4],
            )));
        }
        let boundary = sketch.boundary_curves();

        let segment = Line::new(p(-0.1, 0.0), p(0.1, 0.0));
        let trim = ExtendToBoundary::new(segment).execute(&boundary).unwrap();
        assert!((trim.start - p(-0.5, 0.0)).norm() < TOLERANCE);
        assert!((trim.end - p(0.5, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn side_without_candidates_keeps_endpoint() {
        let mut sketch = Sketch::new(0.0);
        // Only a vertical wall on the end side of the segment.
        let wall = sketch.add_curve(SketchCurve::Line(Line::new(p(1.0, -1.0), p(1.0, 1.0))));
        let boundary = sketch.boundary_curves();

        let segment = Line::new(p(-0.2, 0.0), p(0.2, 0.0));
        let trim = ExtendToBoundary::new(segment).execute(&boundary).unwrap();

        assert!((trim.start - p(-0.2, 0.0)).norm() < TOLERANCE);
        assert_eq!(trim.start_curve, None);
        assert!((trim.end - p(1.0, 0.0)).norm() < TOLERANCE);
        assert_eq!(trim.end_curve, Some(wall));
    }

    #[test]
    fn trims_against_circle_boundary() {
        let mut sketch = Sketch::new(0.0);
        let circle =
            sketch.add_curve(SketchCurve::Circle(Circle::new(p(0.0, 0.0), 2.0).unwrap()));
        let boundary = sketch.boundary_curves();

        // Diagonal segment at 45 degrees.
        let segment = Line::new(p(-0.1, -0.1), p(0.1, 0.1));
        let trim = ExtendToBoundary::new(segment).execute(&boundary).unwrap();

        let r = 2.0 / 2.0_f64.sqrt();
        assert!((trim.start - p(-r, -r)).norm() < 1e-9);
        assert!((trim.end - p(r, r)).norm() < 1e-9);
        assert_eq!(trim.start_curve, Some(circle));
        assert_eq!(trim.end_curve, Some(circle));
    }

    #[test]
    fn spline_boundary_participates() {
        let mut sketch = Sketch::new(0.0);
        let spline = sketch.add_curve(SketchCurve::Spline(
            Spline::new(vec![p(1.0, -1.0), p(1.5, 0.5), p(1.0, 1.5)]).unwrap(),
        ));
        let boundary = sketch.boundary_curves();

        let segment = Line::new(p(-0.1, 0.0), p(0.1, 0.0));
        let trim = ExtendToBoundary::new(segment).execute(&boundary).unwrap();
        assert_eq!(trim.end_curve, Some(spline));
        assert!(trim.end.x > 1.0);
        assert_eq!(trim.start_curve, None);
    }

    #[test]
    fn degenerate_segment_fails() {
        let (sketch, _) = unit_square_boundary();
        let boundary = sketch.boundary_curves();
        let segment = Line::new(p(0.0, 0.0), p(0.0, 0.0));
        assert!(ExtendToBoundary::new(segment).execute(&boundary).is_err());
    }
}
