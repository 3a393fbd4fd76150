//! Planar-arrangement extraction of closed profiles.
//!
//! Non-construction curves are split at their mutual intersection
//! points, merged into a node graph, and walked half-edge by half-edge
//! taking the sharpest counter-clockwise turn at every node. Positive-
//! area cycles become bounded profiles; negative-area cycles are
//! assigned as holes of the smallest profile that strictly contains
//! them.

use std::collections::HashSet;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::math::intersect_2d::angle_to_arc_param;
use crate::math::{polygon_2d, Point3, Vector3, MERGE_TOLERANCE, TOLERANCE};

use super::curve::{Arc, Line, SketchCurve};
use super::profile::{Profile, ProfileLoop};

/// Cycles with polygonized area below this are dead-end retraces.
const AREA_EPS: f64 = 1e-12;

/// Angular step for arc sampling in cycle polygons.
const ARC_SAMPLE_STEP: f64 = PI / 18.0;

/// Derives all closed profiles bounded by the given curves.
#[must_use]
pub fn extract_profiles(curves: &[SketchCurve]) -> Vec<Profile> {
    let prims = collect_prims(curves);
    if prims.is_empty() {
        return Vec::new();
    }
    let splits = compute_splits(&prims);
    let (nodes, edges) = build_edges(&prims, &splits);
    if edges.is_empty() {
        return Vec::new();
    }
    let cycles = trace_cycles(&nodes, &edges);
    assemble_profiles(cycles)
}

/// A curve reduced to its arrangement primitive.
///
/// Ellipses and splines are opaque passthrough geometry and do not
/// participate in profile derivation.
enum Prim {
    Segment {
        start: Point3,
        end: Point3,
    },
    ArcPrim {
        center: Point3,
        radius: f64,
        start_angle: f64,
        sweep: f64,
    },
    CirclePrim {
        center: Point3,
        radius: f64,
    },
}

fn collect_prims(curves: &[SketchCurve]) -> Vec<Prim> {
    curves
        .iter()
        .filter_map(|curve| match curve {
            SketchCurve::Line(l) => {
                if (l.end - l.start).norm() < MERGE_TOLERANCE {
                    None
                } else {
                    Some(Prim::Segment {
                        start: l.start,
                        end: l.end,
                    })
                }
            }
            SketchCurve::Arc(a) => Some(Prim::ArcPrim {
                center: a.center,
                radius: a.radius,
                start_angle: a.start_angle,
                sweep: a.sweep,
            }),
            SketchCurve::Circle(c) => Some(Prim::CirclePrim {
                center: c.center,
                radius: c.radius,
            }),
            SketchCurve::Ellipse(_) | SketchCurve::Spline(_) => None,
        })
        .collect()
}

/// Split parameters per primitive: segment parameter `t` for segments,
/// sweep fraction for arcs, absolute angle for circles.
fn compute_splits(prims: &[Prim]) -> Vec<Vec<f64>> {
    let mut splits: Vec<Vec<f64>> = vec![Vec::new(); prims.len()];
    for i in 0..prims.len() {
        for j in (i + 1)..prims.len() {
            for (pi, pj) in pair_params(&prims[i], &prims[j]) {
                splits[i].push(pi);
                splits[j].push(pj);
            }
        }
    }
    splits
}

/// Intersection parameters between an ordered pair of primitives.
fn pair_params(a: &Prim, b: &Prim) -> Vec<(f64, f64)> {
    match (a, b) {
        (
            Prim::Segment { start: a0, end: a1 },
            Prim::Segment { start: b0, end: b1 },
        ) => seg_seg(a0, a1, b0, b1).into_iter().collect(),
        (
            Prim::Segment { start, end },
            Prim::CirclePrim { center, radius },
        ) => seg_circle(start, end, center, *radius)
            .into_iter()
            .map(|(pt, t)| (t, circle_angle(center, &pt)))
            .collect(),
        (
            Prim::Segment { start, end },
            Prim::ArcPrim {
                center,
                radius,
                start_angle,
                sweep,
            },
        ) => seg_circle(start, end, center, *radius)
            .into_iter()
            .filter_map(|(pt, t)| {
                angle_to_arc_param(circle_angle(center, &pt), *start_angle, *sweep)
                    .map(|f| (t, f))
            })
            .collect(),
        (
            Prim::CirclePrim {
                center: c1,
                radius: r1,
            },
            Prim::CirclePrim {
                center: c2,
                radius: r2,
            },
        ) => circle_circle(c1, *r1, c2, *r2)
            .into_iter()
            .map(|pt| (circle_angle(c1, &pt), circle_angle(c2, &pt)))
            .collect(),
        (
            Prim::CirclePrim {
                center: c1,
                radius: r1,
            },
            Prim::ArcPrim {
                center,
                radius,
                start_angle,
                sweep,
            },
        ) => circle_circle(c1, *r1, center, *radius)
            .into_iter()
            .filter_map(|pt| {
                angle_to_arc_param(circle_angle(center, &pt), *start_angle, *sweep)
                    .map(|f| (circle_angle(c1, &pt), f))
            })
            .collect(),
        (
            Prim::ArcPrim {
                center: ca,
                radius: ra,
                start_angle: sa,
                sweep: wa,
            },
            Prim::ArcPrim {
                center: cb,
                radius: rb,
                start_angle: sb,
                sweep: wb,
            },
        ) => circle_circle(ca, *ra, cb, *rb)
            .into_iter()
            .filter_map(|pt| {
                let fa = angle_to_arc_param(circle_angle(ca, &pt), *sa, *wa)?;
                let fb = angle_to_arc_param(circle_angle(cb, &pt), *sb, *wb)?;
                Some((fa, fb))
            })
            .collect(),
        // Remaining combinations are the swaps of the ones above.
        _ => pair_params(b, a)
            .into_iter()
            .map(|(pb, pa)| (pa, pb))
            .collect(),
    }
}

fn circle_angle(center: &Point3, pt: &Point3) -> f64 {
    (pt.y - center.y).atan2(pt.x - center.x)
}

/// Bounded segment-segment intersection, endpoint inclusive.
fn seg_seg(a0: &Point3, a1: &Point3, b0: &Point3, b1: &Point3) -> Option<(f64, f64)> {
    let da = Vector3::new(a1.x - a0.x, a1.y - a0.y, 0.0);
    let db = Vector3::new(b1.x - b0.x, b1.y - b0.y, 0.0);

    let cross = da.x * db.y - da.y * db.x;
    if cross.abs() < TOLERANCE {
        return None;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let t = (dx * db.y - dy * db.x) / cross;
    let u = (dx * da.y - dy * da.x) / cross;

    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        Some((t.clamp(0.0, 1.0), u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Bounded segment-circle intersection, endpoint inclusive.
fn seg_circle(a0: &Point3, a1: &Point3, center: &Point3, radius: f64) -> Vec<(Point3, f64)> {
    let dir = Vector3::new(a1.x - a0.x, a1.y - a0.y, 0.0);
    let len = dir.norm();
    if len < TOLERANCE {
        return Vec::new();
    }
    let eps = TOLERANCE / len;
    crate::math::intersect_2d::infinite_line_circle(a0, &dir, center, radius)
        .into_iter()
        .filter(|(_, t)| *t >= -eps && *t <= 1.0 + eps)
        .collect()
}

/// Circle-circle intersection points via the radical line.
fn circle_circle(c1: &Point3, r1: f64, c2: &Point3, r2: f64) -> Vec<Point3> {
    let dx = c2.x - c1.x;
    let dy = c2.y - c1.y;
    let dist_sq = dx * dx + dy * dy;
    let dist = dist_sq.sqrt();

    if dist < TOLERANCE {
        // Concentric circles never cross at isolated points.
        return Vec::new();
    }
    if dist > r1 + r2 + TOLERANCE || dist < (r1 - r2).abs() - TOLERANCE {
        return Vec::new();
    }

    let a = (r1 * r1 - r2 * r2 + dist_sq) / (2.0 * dist);
    let h_sq = r1 * r1 - a * a;
    if h_sq < -TOLERANCE {
        return Vec::new();
    }
    let h = h_sq.max(0.0).sqrt();

    let mx = c1.x + a * dx / dist;
    let my = c1.y + a * dy / dist;
    let px = -dy / dist;
    let py = dx / dist;

    if h < TOLERANCE {
        vec![Point3::new(mx, my, c1.z)]
    } else {
        vec![
            Point3::new(mx + h * px, my + h * py, c1.z),
            Point3::new(mx - h * px, my - h * py, c1.z),
        ]
    }
}

// ── node graph construction ──

struct Nodes {
    pts: Vec<Point3>,
}

impl Nodes {
    fn ensure(&mut self, p: Point3) -> usize {
        let tol_sq = MERGE_TOLERANCE * MERGE_TOLERANCE;
        for (i, q) in self.pts.iter().enumerate() {
            let dx = q.x - p.x;
            let dy = q.y - p.y;
            if dx * dx + dy * dy < tol_sq {
                return i;
            }
        }
        self.pts.push(p);
        self.pts.len() - 1
    }
}

#[derive(Debug, Clone)]
enum EdgeGeom {
    Line,
    Arc {
        center: Point3,
        radius: f64,
        start_angle: f64,
        sweep: f64,
    },
}

#[derive(Debug, Clone)]
struct Edge {
    n0: usize,
    n1: usize,
    geom: EdgeGeom,
}

fn build_edges(prims: &[Prim], splits: &[Vec<f64>]) -> (Nodes, Vec<Edge>) {
    let mut nodes = Nodes { pts: Vec::new() };
    let mut edges = Vec::new();

    for (prim, prim_splits) in prims.iter().zip(splits.iter()) {
        match prim {
            Prim::Segment { start, end } => {
                let mut ts = interior_params(prim_splits);
                ts.insert(0, 0.0);
                ts.push(1.0);
                for pair in ts.windows(2) {
                    let p0 = lerp(start, end, pair[0]);
                    let p1 = lerp(start, end, pair[1]);
                    if (p1 - p0).norm() < MERGE_TOLERANCE {
                        continue;
                    }
                    let n0 = nodes.ensure(p0);
                    let n1 = nodes.ensure(p1);
                    if n0 != n1 {
                        edges.push(Edge {
                            n0,
                            n1,
                            geom: EdgeGeom::Line,
                        });
                    }
                }
            }
            Prim::ArcPrim {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                let mut fs = interior_params(prim_splits);
                fs.insert(0, 0.0);
                fs.push(1.0);
                for pair in fs.windows(2) {
                    let a0 = start_angle + sweep * pair[0];
                    let a1 = start_angle + sweep * pair[1];
                    push_arc_edge(&mut nodes, &mut edges, center, *radius, a0, a1 - a0);
                }
            }
            Prim::CirclePrim { center, radius } => {
                let angles = circle_split_angles(prim_splits);
                let n = angles.len();
                for k in 0..n {
                    let a0 = angles[k];
                    let a1 = if k + 1 < n {
                        angles[k + 1]
                    } else {
                        angles[0] + TAU
                    };
                    push_arc_edge(&mut nodes, &mut edges, center, *radius, a0, a1 - a0);
                }
            }
        }
    }

    (nodes, edges)
}

/// Sorted, deduplicated split parameters strictly inside (0, 1).
fn interior_params(raw: &[f64]) -> Vec<f64> {
    let eps = 1e-9;
    let mut ps: Vec<f64> = raw
        .iter()
        .copied()
        .filter(|p| *p > eps && *p < 1.0 - eps)
        .collect();
    ps.sort_by(f64::total_cmp);
    ps.dedup_by(|a, b| (*a - *b).abs() < eps);
    ps
}

/// Sorted, deduplicated absolute split angles of a circle, guaranteed to
/// hold at least two entries so every circle decomposes into proper arcs.
fn circle_split_angles(raw: &[f64]) -> Vec<f64> {
    let eps = 1e-9;
    let mut angles: Vec<f64> = raw.iter().map(|a| a.rem_euclid(TAU)).collect();
    angles.sort_by(f64::total_cmp);
    angles.dedup_by(|a, b| (*a - *b).abs() < eps);
    if angles.len() > 1 && (angles[0] + TAU - angles[angles.len() - 1]).abs() < eps {
        angles.pop();
    }
    match angles.len() {
        0 => vec![0.0, PI],
        1 => {
            let theta = angles[0];
            vec![theta, theta + PI]
        }
        _ => angles,
    }
}

fn push_arc_edge(
    nodes: &mut Nodes,
    edges: &mut Vec<Edge>,
    center: &Point3,
    radius: f64,
    start_angle: f64,
    sweep: f64,
) {
    if sweep.abs() < 1e-9 {
        return;
    }
    let p0 = arc_point(center, radius, start_angle);
    let p1 = arc_point(center, radius, start_angle + sweep);
    let n0 = nodes.ensure(p0);
    let n1 = nodes.ensure(p1);
    edges.push(Edge {
        n0,
        n1,
        geom: EdgeGeom::Arc {
            center: *center,
            radius,
            start_angle,
            sweep,
        },
    });
}

fn arc_point(center: &Point3, radius: f64, angle: f64) -> Point3 {
    Point3::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
        center.z,
    )
}

fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    Point3::new(
        a.x + (b.x - a.x) * t,
        a.y + (b.y - a.y) * t,
        a.z + (b.z - a.z) * t,
    )
}

// ── half-edge face tracing ──

/// A traced boundary cycle with its polygonization and source edges.
struct Traced {
    curves: Vec<SketchCurve>,
    polygon: Vec<Point3>,
    area: f64,
    edge_ids: HashSet<usize>,
}

fn he_edge(h: usize) -> usize {
    h / 2
}

fn he_forward(h: usize) -> bool {
    h % 2 == 0
}

fn he_twin(h: usize) -> usize {
    h ^ 1
}

fn he_from(edges: &[Edge], h: usize) -> usize {
    let e = &edges[he_edge(h)];
    if he_forward(h) {
        e.n0
    } else {
        e.n1
    }
}

fn he_to(edges: &[Edge], h: usize) -> usize {
    let e = &edges[he_edge(h)];
    if he_forward(h) {
        e.n1
    } else {
        e.n0
    }
}

/// Direction in which a half-edge departs its source node, in radians.
fn he_departure(edges: &[Edge], nodes: &Nodes, h: usize) -> f64 {
    let e = &edges[he_edge(h)];
    match &e.geom {
        EdgeGeom::Line => {
            let from = nodes.pts[he_from(edges, h)];
            let to = nodes.pts[he_to(edges, h)];
            (to.y - from.y).atan2(to.x - from.x)
        }
        EdgeGeom::Arc {
            start_angle, sweep, ..
        } => {
            // Tangent at an angle theta on a CCW arc points at theta + 90°.
            if he_forward(h) {
                start_angle + sweep.signum() * FRAC_PI_2
            } else {
                (start_angle + sweep) - sweep.signum() * FRAC_PI_2
            }
        }
    }
}

fn norm_tau(a: f64) -> f64 {
    a.rem_euclid(TAU)
}

fn trace_cycles(nodes: &Nodes, edges: &[Edge]) -> Vec<Traced> {
    let half_count = edges.len() * 2;
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); nodes.pts.len()];
    for h in 0..half_count {
        outgoing[he_from(edges, h)].push(h);
    }

    let mut used = vec![false; half_count];
    let mut traced = Vec::new();

    for h0 in 0..half_count {
        if used[h0] {
            continue;
        }

        let mut cycle: Vec<usize> = Vec::new();
        let mut h = h0;
        loop {
            if cycle.len() > half_count {
                // Malformed input: bail out of this walk.
                cycle.clear();
                break;
            }
            used[h] = true;
            cycle.push(h);

            let node = he_to(edges, h);
            let reverse = he_departure(edges, nodes, he_twin(h));

            // Sharpest CCW turn from the reversed arrival direction; the
            // twin ranks last so dead ends fold back only when forced.
            let mut best: Option<(usize, f64)> = None;
            for &cand in &outgoing[node] {
                let delta = if cand == he_twin(h) {
                    0.0
                } else {
                    norm_tau(he_departure(edges, nodes, cand) - reverse)
                };
                if best.map_or(true, |(_, bd)| delta > bd) {
                    best = Some((cand, delta));
                }
            }
            let Some((next, _)) = best else {
                cycle.clear();
                break;
            };
            if next == h0 {
                break;
            }
            if used[next] {
                cycle.clear();
                break;
            }
            h = next;
        }

        if !cycle.is_empty() {
            traced.push(realize_cycle(nodes, edges, &cycle));
        }
    }

    traced
}

fn realize_cycle(nodes: &Nodes, edges: &[Edge], cycle: &[usize]) -> Traced {
    let mut curves = Vec::with_capacity(cycle.len());
    let mut polygon = Vec::new();
    let mut edge_ids = HashSet::new();

    for &h in cycle {
        let e = &edges[he_edge(h)];
        edge_ids.insert(he_edge(h));
        let from_pt = nodes.pts[he_from(edges, h)];
        let to_pt = nodes.pts[he_to(edges, h)];
        polygon.push(from_pt);

        match &e.geom {
            EdgeGeom::Line => {
                curves.push(SketchCurve::Line(Line::new(from_pt, to_pt)));
            }
            EdgeGeom::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                let (a0, sw) = if he_forward(h) {
                    (*start_angle, *sweep)
                } else {
                    (start_angle + sweep, -sweep)
                };
                curves.push(SketchCurve::Arc(Arc {
                    center: *center,
                    radius: *radius,
                    start_angle: a0,
                    sweep: sw,
                }));
                let steps = (sw.abs() / ARC_SAMPLE_STEP).ceil() as usize;
                for i in 1..steps {
                    #[allow(clippy::cast_precision_loss)]
                    let angle = a0 + sw * (i as f64) / (steps as f64);
                    polygon.push(arc_point(center, *radius, angle));
                }
            }
        }
    }

    let area = polygon_2d::signed_area_2d(&polygon);
    Traced {
        curves,
        polygon,
        area,
        edge_ids,
    }
}

// ── profile assembly ──

fn assemble_profiles(cycles: Vec<Traced>) -> Vec<Profile> {
    let mut positives = Vec::new();
    let mut negatives = Vec::new();
    for t in cycles {
        if t.area > AREA_EPS {
            positives.push(t);
        } else if t.area < -AREA_EPS {
            negatives.push(t);
        }
        // Near-zero cycles are dead-end retraces; dropped.
    }

    // Each negative cycle becomes a hole of the smallest positive cycle
    // that contains it without sharing boundary edges; negatives with no
    // such container bound the unbounded region and are dropped.
    let mut holes: Vec<Vec<ProfileLoop>> = vec![Vec::new(); positives.len()];
    for neg in negatives {
        let Some(sample) = neg.polygon.first() else {
            continue;
        };
        let mut owner: Option<(usize, f64)> = None;
        for (i, pos) in positives.iter().enumerate() {
            if !pos.edge_ids.is_disjoint(&neg.edge_ids) {
                continue;
            }
            if !polygon_2d::point_in_polygon_2d(sample, &pos.polygon) {
                continue;
            }
            if owner.map_or(true, |(_, best)| pos.area < best) {
                owner = Some((i, pos.area));
            }
        }
        if let Some((i, _)) = owner {
            holes[i].push(ProfileLoop { curves: neg.curves });
        }
    }

    positives
        .into_iter()
        .zip(holes)
        .map(|(pos, hole_loops)| Profile {
            outer: ProfileLoop { curves: pos.curves },
            holes: hole_loops,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sketch::curve::Circle;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn line(a: Point3, b: Point3) -> SketchCurve {
        SketchCurve::Line(Line::new(a, b))
    }

    #[test]
    fn square_yields_one_profile() {
        let curves = vec![
            line(p(0.0, 0.0), p(1.0, 0.0)),
            line(p(1.0, 0.0), p(1.0, 1.0)),
            line(p(1.0, 1.0), p(0.0, 1.0)),
            line(p(0.0, 1.0), p(0.0, 0.0)),
        ];
        let profiles = extract_profiles(&curves);
        assert_eq!(profiles.len(), 1, "profiles={}", profiles.len());
        assert!((profiles[0].outer.signed_area().abs() - 1.0).abs() < 1e-6);
        assert!(profiles[0].holes.is_empty());
    }

    #[test]
    fn lone_circle_yields_disk() {
        let curves = vec![SketchCurve::Circle(Circle::new(p(0.0, 0.0), 1.0).unwrap())];
        let profiles = extract_profiles(&curves);
        assert_eq!(profiles.len(), 1);
        assert!((profiles[0].outer.signed_area().abs() - PI).abs() < 0.05);
    }

    #[test]
    fn crossed_square_yields_two_profiles() {
        // A square with a vertical splitter through the middle.
        let curves = vec![
            line(p(0.0, 0.0), p(1.0, 0.0)),
            line(p(1.0, 0.0), p(1.0, 1.0)),
            line(p(1.0, 1.0), p(0.0, 1.0)),
            line(p(0.0, 1.0), p(0.0, 0.0)),
            line(p(0.5, 0.0), p(0.5, 1.0)),
        ];
        let profiles = extract_profiles(&curves);
        assert_eq!(profiles.len(), 2, "profiles={}", profiles.len());
        for profile in &profiles {
            assert!((profile.outer.signed_area().abs() - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn two_chords_through_circle_yield_three_profiles() {
        // The pass-one shape: a circle crossed by two parallel chords.
        let r: f64 = 2.0;
        let y: f64 = 0.5;
        let x = (r * r - y * y).sqrt();
        let curves = vec![
            SketchCurve::Circle(Circle::new(p(0.0, 0.0), r).unwrap()),
            line(p(-x, y), p(x, y)),
            line(p(-x, -y), p(x, -y)),
        ];
        let profiles = extract_profiles(&curves);
        assert_eq!(profiles.len(), 3, "profiles={}", profiles.len());

        // The strip between the chords contains the center.
        let center_profiles: Vec<_> = profiles
            .iter()
            .filter(|pr| pr.contains_point(&p(0.0, 0.0)))
            .collect();
        assert_eq!(center_profiles.len(), 1);
    }

    #[test]
    fn disjoint_circle_becomes_hole() {
        let curves = vec![
            line(p(-2.0, -2.0), p(2.0, -2.0)),
            line(p(2.0, -2.0), p(2.0, 2.0)),
            line(p(2.0, 2.0), p(-2.0, 2.0)),
            line(p(-2.0, 2.0), p(-2.0, -2.0)),
            SketchCurve::Circle(Circle::new(p(0.0, 0.0), 0.5).unwrap()),
        ];
        let profiles = extract_profiles(&curves);
        // The inner disk and the square-with-hole.
        assert_eq!(profiles.len(), 2, "profiles={}", profiles.len());
        let with_hole: Vec<_> = profiles.iter().filter(|pr| !pr.holes.is_empty()).collect();
        assert_eq!(with_hole.len(), 1);
        assert!(!with_hole[0].contains_point(&p(0.0, 0.0)));
        assert!(with_hole[0].contains_point(&p(1.5, 1.5)));
    }
}
