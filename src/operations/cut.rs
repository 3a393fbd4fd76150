use log::debug;

use crate::error::{PlanError, Result};
use crate::face::{FaceData, FaceId, FaceStore};
use crate::math::{angle, vector, Point3, Vector3, TOLERANCE};
use crate::math::vector::Axis;
use crate::sketch::{
    profile, Constraint, Dimension, FaceSketch, Line, LineEnd, Sketch, SketchCurve, SketchCurveId,
};

use super::extend::ExtendToBoundary;
use super::LayerThickness;

/// A construction line anchored at the inner-circle center that carries
/// the absolute orientation of a cut pass, in degrees normalized to
/// [0, 360). Propagates orientation from one pass to the next.
#[derive(Debug, Clone)]
pub struct GuideLine {
    pub line: Line,
    pub angle_deg: f64,
}

/// Ephemeral descriptor of one cut pass.
///
/// Constructed by the multi-pass controller, consumed by [`BridgeCut`],
/// and discarded once the next pass is constructed.
#[derive(Debug, Clone)]
pub struct CutPass {
    /// Face the pass operates on.
    pub face: FaceId,
    /// Guide line returned by the previous pass; absent on the first.
    pub previous_guide: Option<GuideLine>,
    /// Angle step in degrees. On the first pass this is the absolute
    /// starting angle; on later passes it is composed onto the previous
    /// guide's angle.
    pub angle_step_deg: f64,
}

/// Everything a completed pass hands to its successor, plus the sketch
/// it planned on for inspection.
#[derive(Debug)]
pub struct PassOutcome {
    /// The cut's terminal face.
    pub face: FaceId,
    /// Guide line for the next pass.
    pub guide: GuideLine,
    /// The working sketch, with all recorded constraints and dimensions.
    pub sketch: Sketch,
}

/// Plans and executes a single bridge-cut pass.
///
/// Builds the guide line, the two offset chords at perpendicular
/// distance (inner radius + gap) from the center, trims them against the
/// boundary, selects the unique center region bounded by both, and cuts
/// it one layer deep.
pub struct BridgeCut {
    pass: CutPass,
    layer: LayerThickness,
    gap: f64,
    pass_through_expression: bool,
}

impl BridgeCut {
    /// Creates a new `BridgeCut` operation.
    #[must_use]
    pub fn new(pass: CutPass, layer: LayerThickness, gap: f64) -> Self {
        Self {
            pass,
            layer,
            gap,
            pass_through_expression: false,
        }
    }

    /// Carries the layer-thickness expression onto the produced face.
    ///
    /// Enabled by the controller for the final pass only.
    #[must_use]
    pub fn with_expression_passthrough(mut self, enabled: bool) -> Self {
        self.pass_through_expression = enabled;
        self
    }

    /// Executes the pass against the face store.
    ///
    /// # Errors
    ///
    /// Fails with `DegenerateGap` for a non-positive gap,
    /// `NoInnerCircleFound`/`AmbiguousInnerCircle` when the face does not
    /// carry exactly one inner circle, and
    /// `AmbiguousOrMissingCenterProfile` when the two chords do not bound
    /// exactly one region. No geometry is committed on failure.
    pub fn execute(&self, store: &mut FaceStore) -> Result<PassOutcome> {
        if self.gap <= 0.0 {
            return Err(PlanError::DegenerateGap { gap: self.gap }.into());
        }

        let face = store.face(self.pass.face)?.clone();
        let FaceSketch {
            mut sketch, holes, ..
        } = Sketch::on_face(&face);

        let (inner_id, center, radius) = find_inner_circle(&sketch, &holes)?;

        // Project the previous guide onto the working plane and compose
        // the new absolute angle from its measured direction.
        let mut previous_guide_id = None;
        let new_angle = match &self.pass.previous_guide {
            Some(previous) => {
                let projected = previous.line.at_depth(face.depth);
                let measured = angle::angle_between_deg(&projected.start, &projected.end);
                let id = sketch.add_construction_curve(SketchCurve::Line(projected), true);
                previous_guide_id = Some(id);
                angle::compose_deg(measured, self.pass.angle_step_deg)
            }
            None => angle::normalize_deg(self.pass.angle_step_deg),
        };

        debug!(
            "bridge cut at {new_angle} deg, inner radius {radius}, gap {}",
            self.gap
        );

        let dir = Vector3::new(
            new_angle.to_radians().cos(),
            new_angle.to_radians().sin(),
            0.0,
        );
        let guide_geom = Line::new(center, center + dir * radius);
        let guide_id = sketch.add_construction_curve(SketchCurve::Line(guide_geom.clone()), true);
        if let Some(previous_id) = previous_guide_id {
            sketch.add_dimension(Dimension::Angle {
                from: previous_id,
                to: guide_id,
                degrees: self.pass.angle_step_deg,
            });
        }

        // The inner circle becomes a pure construction reference before
        // the boundary snapshot is taken.
        sketch.set_construction(inner_id)?;
        let boundary = sketch.boundary_curves();

        // Two chords parallel to the guide, offset perpendicular to it
        // by (inner radius + gap) on either side.
        let offset = radius + self.gap;
        let perp = vector::rotate(&dir, Axis::Z, 90.0);
        let sides = [perp, vector::rotate180(&perp)];
        let mut chord_ids: Vec<SketchCurveId> = Vec::with_capacity(2);
        for side in &sides {
            let anchor = center + side * offset;
            let geom = Line::new(anchor - dir * radius, anchor + dir * radius);
            let id = sketch.add_curve(SketchCurve::Line(geom));
            sketch.add_constraint(Constraint::Parallel(id, guide_id));
            sketch.add_dimension(Dimension::Distance {
                from: id,
                to: guide_id,
                value: offset,
            });
            chord_ids.push(id);
        }

        // Extend each chord to the boundary and pin its endpoints to the
        // curves they landed on.
        let mut chords: Vec<Line> = Vec::with_capacity(2);
        for &id in &chord_ids {
            let geom = match &sketch.curve(id)?.geometry {
                SketchCurve::Line(l) => l.clone(),
                _ => unreachable!("chords are lines"),
            };
            let trim = ExtendToBoundary::new(geom).execute(&boundary)?;

            let trimmed = Line::new(trim.start, trim.end);
            if let SketchCurve::Line(l) = &mut sketch.curve_mut(id)?.geometry {
                *l = trimmed.clone();
            }
            if let Some(target) = trim.start_curve {
                sketch.add_constraint(Constraint::CoincidentEndpoint {
                    line: id,
                    end: LineEnd::Start,
                    target,
                });
            }
            if let Some(target) = trim.end_curve {
                sketch.add_constraint(Constraint::CoincidentEndpoint {
                    line: id,
                    end: LineEnd::End,
                    target,
                });
            }
            chords.push(trimmed);
        }

        // Fresh profile set over the mutated sketch; exactly one region
        // must be bounded by both chords.
        let profiles = profile::derive_profiles(&sketch);
        let bounded: Vec<_> = profiles
            .iter()
            .filter(|pr| {
                pr.contains_line(&chords[0], TOLERANCE) && pr.contains_line(&chords[1], TOLERANCE)
            })
            .collect();
        debug!(
            "derived {} profiles, {} bounded by both chords",
            profiles.len(),
            bounded.len()
        );
        if bounded.len() != 1 {
            return Err(PlanError::AmbiguousOrMissingCenterProfile {
                found: bounded.len(),
            }
            .into());
        }
        let region = bounded[0];

        // Cut the region one layer down. The through-hole silhouette
        // carries over as a hole of the new face when it lies inside.
        let new_depth = face.depth - self.layer.value;
        let outer: Vec<SketchCurve> = region
            .outer
            .curves
            .iter()
            .map(|c| c.at_depth(new_depth))
            .collect();
        let mut new_holes: Vec<Vec<SketchCurve>> = region
            .holes
            .iter()
            .map(|hole| hole.curves.iter().map(|c| c.at_depth(new_depth)).collect())
            .collect();
        if region.contains_point(&center) {
            let silhouette = sketch.curve(inner_id)?.geometry.at_depth(new_depth);
            new_holes.push(vec![silhouette]);
        }

        let new_face = store.add_face(FaceData {
            depth: new_depth,
            depth_expression: if self.pass_through_expression {
                self.layer.expression.clone()
            } else {
                None
            },
            outer,
            holes: new_holes,
        });

        Ok(PassOutcome {
            face: new_face,
            guide: GuideLine {
                line: guide_geom,
                angle_deg: new_angle,
            },
            sketch,
        })
    }
}

/// Locates the single inner circle or arc among a face sketch's hole
/// loops and returns its id, center, and radius.
fn find_inner_circle(
    sketch: &Sketch,
    holes: &[Vec<SketchCurveId>],
) -> Result<(SketchCurveId, Point3, f64)> {
    let mut found: Vec<(SketchCurveId, Point3, f64)> = Vec::new();
    for &id in holes.iter().flatten() {
        match &sketch.curve(id)?.geometry {
            SketchCurve::Circle(c) => found.push((id, c.center, c.radius)),
            SketchCurve::Arc(a) => found.push((id, a.center, a.radius)),
            _ => {}
        }
    }
    match found.len() {
        0 => Err(PlanError::NoInnerCircleFound.into()),
        1 => Ok(found[0]),
        n => Err(PlanError::AmbiguousInnerCircle { found: n }.into()),
    }
}
