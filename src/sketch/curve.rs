use crate::error::{GeometryError, Result};
use crate::math::{angle, vector, Point3, Vector3, TOLERANCE};

/// A finite line segment between two sketch points.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Point3,
    pub end: Point3,
}

impl Line {
    /// Creates a line between two points.
    #[must_use]
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Returns the unit direction from start to end.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment has ~0 length.
    pub fn direction(&self) -> Result<Vector3> {
        vector::normalize(&vector::vector_between(&self.end, &self.start))
    }

    /// Midpoint of the segment.
    #[must_use]
    pub fn midpoint(&self) -> Point3 {
        angle::midpoint(&self.start, &self.end)
    }

    /// Segment length.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Re-embeds the line on a plane at depth `z`.
    #[must_use]
    pub fn at_depth(&self, z: f64) -> Line {
        Line::new(
            Point3::new(self.start.x, self.start.y, z),
            Point3::new(self.end.x, self.end.y, z),
        )
    }

    /// Tests endpoint coincidence with another line in either order,
    /// so boundary traversal direction does not matter.
    #[must_use]
    pub fn endpoints_match(&self, other: &Line, tolerance: f64) -> bool {
        let same = (self.start - other.start).norm() < tolerance
            && (self.end - other.end).norm() < tolerance;
        let flipped = (self.start - other.end).norm() < tolerance
            && (self.end - other.start).norm() < tolerance;
        same || flipped
    }
}

/// A full circle on the sketch plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Point3,
    pub radius: f64,
}

impl Circle {
    /// Creates a circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive.
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("circle radius must be positive".into()).into());
        }
        Ok(Self { center, radius })
    }

    /// Point on the circle at an absolute angle in radians.
    #[must_use]
    pub fn point_at_angle(&self, angle: f64) -> Point3 {
        Point3::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
            self.center.z,
        )
    }
}

/// A circular arc with a signed sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub center: Point3,
    pub radius: f64,
    /// Absolute start angle in radians.
    pub start_angle: f64,
    /// Signed sweep in radians; positive is counter-clockwise.
    pub sweep: f64,
}

impl Arc {
    /// Creates an arc.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive or the sweep is ~0.
    pub fn new(center: Point3, radius: f64, start_angle: f64, sweep: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        if sweep.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("arc sweep must be non-zero".into()).into());
        }
        Ok(Self {
            center,
            radius,
            start_angle,
            sweep,
        })
    }

    /// Point on the arc at an absolute angle in radians.
    #[must_use]
    pub fn point_at_angle(&self, angle: f64) -> Point3 {
        Point3::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
            self.center.z,
        )
    }

    /// Start point of the arc.
    #[must_use]
    pub fn start_point(&self) -> Point3 {
        self.point_at_angle(self.start_angle)
    }

    /// End point of the arc.
    #[must_use]
    pub fn end_point(&self) -> Point3 {
        self.point_at_angle(self.start_angle + self.sweep)
    }
}

/// An ellipse, treated as opaque passthrough geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub center: Point3,
    pub major_radius: f64,
    pub minor_radius: f64,
    /// Rotation of the major axis from +X, in radians.
    pub rotation: f64,
}

impl Ellipse {
    /// Creates an ellipse.
    ///
    /// # Errors
    ///
    /// Returns an error if either radius is not positive.
    pub fn new(center: Point3, major_radius: f64, minor_radius: f64, rotation: f64) -> Result<Self> {
        if major_radius < TOLERANCE || minor_radius < TOLERANCE {
            return Err(GeometryError::Degenerate("ellipse radii must be positive".into()).into());
        }
        Ok(Self {
            center,
            major_radius,
            minor_radius,
            rotation,
        })
    }
}

/// A fitted spline, represented through its fit points and treated as
/// opaque passthrough geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    pub points: Vec<Point3>,
}

impl Spline {
    /// Creates a spline through fit points.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two points are supplied.
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        if points.len() < 2 {
            return Err(
                GeometryError::Degenerate("spline needs at least two fit points".into()).into(),
            );
        }
        Ok(Self { points })
    }
}

/// Geometry of a sketch curve.
///
/// Lines, circles, and arcs carry full intersection and profile
/// semantics; ellipses and splines only participate in intersection
/// queries.
#[derive(Debug, Clone, PartialEq)]
pub enum SketchCurve {
    Line(Line),
    Circle(Circle),
    Arc(Arc),
    Ellipse(Ellipse),
    Spline(Spline),
}

impl SketchCurve {
    /// Returns the line geometry if this curve is a line.
    #[must_use]
    pub fn as_line(&self) -> Option<&Line> {
        match self {
            SketchCurve::Line(line) => Some(line),
            _ => None,
        }
    }

    /// Returns the same curve re-embedded on a plane at depth `z`.
    #[must_use]
    pub fn at_depth(&self, z: f64) -> SketchCurve {
        let reset = |p: &Point3| Point3::new(p.x, p.y, z);
        match self {
            SketchCurve::Line(l) => SketchCurve::Line(Line {
                start: reset(&l.start),
                end: reset(&l.end),
            }),
            SketchCurve::Circle(c) => SketchCurve::Circle(Circle {
                center: reset(&c.center),
                radius: c.radius,
            }),
            SketchCurve::Arc(a) => SketchCurve::Arc(Arc {
                center: reset(&a.center),
                ..a.clone()
            }),
            SketchCurve::Ellipse(e) => SketchCurve::Ellipse(Ellipse {
                center: reset(&e.center),
                ..e.clone()
            }),
            SketchCurve::Spline(s) => SketchCurve::Spline(Spline {
                points: s.points.iter().map(|p| reset(p)).collect(),
            }),
        }
    }
}
