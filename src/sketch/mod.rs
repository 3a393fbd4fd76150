pub mod arrange;
pub mod constraint;
pub mod curve;
pub mod profile;

pub use constraint::{Constraint, Dimension, LineEnd};
pub use curve::{Arc, Circle, Ellipse, Line, SketchCurve, Spline};
pub use profile::{Profile, ProfileLoop};

use slotmap::SlotMap;

use crate::error::SketchError;
use crate::face::FaceData;

slotmap::new_key_type! {
    /// Unique identifier for a curve in a sketch.
    pub struct SketchCurveId;
}

/// A curve entity in a sketch: geometry plus sketch-level flags.
#[derive(Debug, Clone)]
pub struct SketchCurveData {
    pub geometry: SketchCurve,
    /// Construction curves are reference-only: excluded from boundary
    /// snapshots and profile derivation.
    pub is_construction: bool,
    /// Fixed curves are anchored so later passes can re-derive them.
    pub is_fixed: bool,
}

/// A 2D sketch embedded on a plane at a fixed depth.
///
/// Owns its curves through a slotmap arena; constraints and dimensions
/// are advisory records that never move geometry. Every geometric query
/// takes a fresh snapshot of the curve set, since pass steps mutate it.
#[derive(Debug, Default)]
pub struct Sketch {
    plane_depth: f64,
    curves: SlotMap<SketchCurveId, SketchCurveData>,
    constraints: Vec<Constraint>,
    dimensions: Vec<Dimension>,
}

impl Sketch {
    /// Creates an empty sketch on a plane at the given depth.
    #[must_use]
    pub fn new(plane_depth: f64) -> Self {
        Self {
            plane_depth,
            ..Self::default()
        }
    }

    /// Creates a sketch on a face, populating it with the face's
    /// boundary and hole loops re-embedded at the face depth.
    ///
    /// Returns the sketch together with the ids of the curves that came
    /// from each hole loop, so callers can locate the inner circle.
    #[must_use]
    pub fn on_face(face: &FaceData) -> FaceSketch {
        let mut sketch = Sketch::new(face.depth);
        let outer = face
            .outer
            .iter()
            .map(|c| sketch.add_curve(c.at_depth(face.depth)))
            .collect();
        let holes = face
            .holes
            .iter()
            .map(|hole| {
                hole.iter()
                    .map(|c| sketch.add_curve(c.at_depth(face.depth)))
                    .collect()
            })
            .collect();
        FaceSketch {
            sketch,
            outer,
            holes,
        }
    }

    /// Depth of the sketch plane.
    #[must_use]
    pub fn plane_depth(&self) -> f64 {
        self.plane_depth
    }

    /// Inserts a regular curve and returns its id.
    pub fn add_curve(&mut self, geometry: SketchCurve) -> SketchCurveId {
        self.curves.insert(SketchCurveData {
            geometry,
            is_construction: false,
            is_fixed: false,
        })
    }

    /// Inserts a construction curve, optionally fixed, and returns its id.
    pub fn add_construction_curve(
        &mut self,
        geometry: SketchCurve,
        is_fixed: bool,
    ) -> SketchCurveId {
        self.curves.insert(SketchCurveData {
            geometry,
            is_construction: true,
            is_fixed,
        })
    }

    /// Returns a reference to a curve, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not in this sketch.
    pub fn curve(&self, id: SketchCurveId) -> Result<&SketchCurveData, SketchError> {
        self.curves
            .get(id)
            .ok_or(SketchError::EntityNotFound("sketch curve"))
    }

    /// Returns a mutable reference to a curve, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not in this sketch.
    pub fn curve_mut(&mut self, id: SketchCurveId) -> Result<&mut SketchCurveData, SketchError> {
        self.curves
            .get_mut(id)
            .ok_or(SketchError::EntityNotFound("sketch curve"))
    }

    /// Flags a curve as construction geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not in this sketch.
    pub fn set_construction(&mut self, id: SketchCurveId) -> Result<(), SketchError> {
        self.curve_mut(id)?.is_construction = true;
        Ok(())
    }

    /// Fresh snapshot of all non-construction curves, in insertion order.
    #[must_use]
    pub fn boundary_curves(&self) -> Vec<(SketchCurveId, SketchCurve)> {
        self.curves
            .iter()
            .filter(|(_, data)| !data.is_construction)
            .map(|(id, data)| (id, data.geometry.clone()))
            .collect()
    }

    /// Number of curves in the sketch, construction included.
    #[must_use]
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Records an advisory constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Records an advisory dimension.
    pub fn add_dimension(&mut self, dimension: Dimension) {
        self.dimensions.push(dimension);
    }

    /// Recorded constraints.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Recorded dimensions.
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }
}

/// A sketch created on a face, with the curve ids contributed by the
/// face's outer boundary and by each hole loop.
#[derive(Debug)]
pub struct FaceSketch {
    pub sketch: Sketch,
    pub outer: Vec<SketchCurveId>,
    pub holes: Vec<Vec<SketchCurveId>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn boundary_snapshot_skips_construction() {
        let mut sketch = Sketch::new(0.0);
        let solid = sketch.add_curve(SketchCurve::Line(Line::new(p(0.0, 0.0), p(1.0, 0.0))));
        sketch.add_construction_curve(
            SketchCurve::Line(Line::new(p(0.0, 0.0), p(0.0, 1.0))),
            true,
        );
        let snapshot = sketch.boundary_curves();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].0, solid);
    }

    #[test]
    fn set_construction_removes_from_snapshot() {
        let mut sketch = Sketch::new(0.0);
        let id = sketch.add_curve(SketchCurve::Circle(
            Circle::new(p(0.0, 0.0), 1.0).unwrap(),
        ));
        assert_eq!(sketch.boundary_curves().len(), 1);
        sketch.set_construction(id).unwrap();
        assert!(sketch.boundary_curves().is_empty());
    }

    #[test]
    fn on_face_embeds_at_face_depth() {
        let face = FaceData {
            depth: -0.4,
            depth_expression: None,
            outer: vec![SketchCurve::Line(Line::new(p(0.0, 0.0), p(1.0, 0.0)))],
            holes: vec![vec![SketchCurve::Circle(
                Circle::new(p(0.5, 0.5), 0.1).unwrap(),
            )]],
        };
        let fs = Sketch::on_face(&face);
        assert!((fs.sketch.plane_depth() + 0.4).abs() < 1e-12);
        assert_eq!(fs.outer.len(), 1);
        assert_eq!(fs.holes.len(), 1);
        let hole_curve = fs.sketch.curve(fs.holes[0][0]).unwrap();
        if let SketchCurve::Circle(c) = &hole_curve.geometry {
            assert!((c.center.z + 0.4).abs() < 1e-12);
        } else {
            unreachable!();
        }
    }
}
