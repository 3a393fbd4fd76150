use std::f64::consts::PI;

use crate::math::{polygon_2d, Point3};

use super::curve::{Line, SketchCurve};
use super::{arrange, Sketch};

/// Angular step for polygonizing arcs in area and containment tests.
const ARC_SAMPLE_STEP: f64 = PI / 18.0;

/// One closed boundary loop of a profile: a cyclic sequence of curves
/// whose endpoints coincide within tolerance.
#[derive(Debug, Clone)]
pub struct ProfileLoop {
    pub curves: Vec<SketchCurve>,
}

impl ProfileLoop {
    /// Polygonizes the loop for area and point-containment tests.
    ///
    /// Lines contribute their start point; arcs additionally contribute
    /// interior samples.
    #[must_use]
    pub fn sample_polygon(&self) -> Vec<Point3> {
        let mut polygon = Vec::new();
        for curve in &self.curves {
            match curve {
                SketchCurve::Line(l) => polygon.push(l.start),
                SketchCurve::Arc(a) => {
                    polygon.push(a.start_point());
                    let steps = (a.sweep.abs() / ARC_SAMPLE_STEP).ceil() as usize;
                    for i in 1..steps {
                        #[allow(clippy::cast_precision_loss)]
                        let angle = a.start_angle + a.sweep * (i as f64) / (steps as f64);
                        polygon.push(a.point_at_angle(angle));
                    }
                }
                SketchCurve::Circle(c) => {
                    let steps = (2.0 * PI / ARC_SAMPLE_STEP).ceil() as usize;
                    for i in 0..steps {
                        #[allow(clippy::cast_precision_loss)]
                        let angle = 2.0 * PI * (i as f64) / (steps as f64);
                        polygon.push(c.point_at_angle(angle));
                    }
                }
                // Opaque curves never appear in derived loops.
                SketchCurve::Ellipse(_) | SketchCurve::Spline(_) => {}
            }
        }
        polygon
    }

    /// Signed area of the polygonized loop.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        polygon_2d::signed_area_2d(&self.sample_polygon())
    }
}

/// A closed planar region derived from a sketch's curve set: one outer
/// loop plus zero or more hole loops.
#[derive(Debug, Clone)]
pub struct Profile {
    pub outer: ProfileLoop,
    pub holes: Vec<ProfileLoop>,
}

impl Profile {
    /// Iterates all boundary loops, outer first.
    pub fn loops(&self) -> impl Iterator<Item = &ProfileLoop> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// Tests whether any boundary loop contains a line geometrically
    /// equal to `target`.
    ///
    /// Endpoints are compared at `tolerance` in either order, since
    /// boundary traversal direction is not guaranteed consistent.
    #[must_use]
    pub fn contains_line(&self, target: &Line, tolerance: f64) -> bool {
        self.loops().any(|lp| {
            lp.curves
                .iter()
                .filter_map(SketchCurve::as_line)
                .any(|boundary| boundary.endpoints_match(target, tolerance))
        })
    }

    /// Tests whether a point lies inside the region: inside the outer
    /// loop and outside every hole.
    #[must_use]
    pub fn contains_point(&self, point: &Point3) -> bool {
        if !polygon_2d::point_in_polygon_2d(point, &self.outer.sample_polygon()) {
            return false;
        }
        !self
            .holes
            .iter()
            .any(|hole| polygon_2d::point_in_polygon_2d(point, &hole.sample_polygon()))
    }

    /// Enclosed area: outer area minus hole areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        let outer = self.outer.signed_area().abs();
        let holes: f64 = self.holes.iter().map(|h| h.signed_area().abs()).sum();
        outer - holes
    }
}

/// Derives the closed profiles bounded by a sketch's non-construction
/// curves.
///
/// Takes a fresh snapshot of the curve set; construction curves and
/// opaque curve kinds (ellipse, spline) do not participate.
#[must_use]
pub fn derive_profiles(sketch: &Sketch) -> Vec<Profile> {
    let snapshot: Vec<SketchCurve> = sketch
        .boundary_curves()
        .into_iter()
        .map(|(_, geometry)| geometry)
        .collect();
    arrange::extract_profiles(&snapshot)
}
