use super::SketchCurveId;

/// Which endpoint of a line a constraint refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnd {
    Start,
    End,
}

/// An advisory geometric constraint.
///
/// Constraints are metadata recorded for downstream edits; they never
/// move geometry in this engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Two curves are parallel.
    Parallel(SketchCurveId, SketchCurveId),
    /// Two curves are perpendicular.
    Perpendicular(SketchCurveId, SketchCurveId),
    /// A curve is tangent to another.
    Tangent(SketchCurveId, SketchCurveId),
    /// A line endpoint lies on a target curve.
    CoincidentEndpoint {
        line: SketchCurveId,
        end: LineEnd,
        target: SketchCurveId,
    },
}

/// An advisory dimensional constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension {
    /// Angle between two curves, in degrees.
    Angle {
        from: SketchCurveId,
        to: SketchCurveId,
        degrees: f64,
    },
    /// Distance between two curves.
    Distance {
        from: SketchCurveId,
        to: SketchCurveId,
        value: f64,
    },
}
