use log::{debug, warn};

use crate::error::{PlanError, PontisError, Result};
use crate::face::{FaceId, FaceStore};
use crate::sketch::Sketch;

use super::cut::{BridgeCut, CutPass, GuideLine};
use super::LayerThickness;

/// Default clearance between the inner circle and each bridge chord.
pub const DEFAULT_GAP: f64 = 1e-4;

/// Record of one completed pass on a face.
#[derive(Debug)]
pub struct PassRecord {
    /// The face exposed by the pass's cut.
    pub face: FaceId,
    /// The guide line the pass produced.
    pub guide: GuideLine,
    /// The sketch the pass planned on.
    pub sketch: Sketch,
}

/// The completed pass chain of a single face.
#[derive(Debug)]
pub struct FaceChain {
    pub passes: Vec<PassRecord>,
}

impl FaceChain {
    /// The last completed pass, holding the final face and guide.
    #[must_use]
    pub fn final_pass(&self) -> Option<&PassRecord> {
        self.passes.last()
    }
}

/// Outcome of a plan for one input face.
///
/// Faces are independent: a failure on one face aborts only that face's
/// remaining passes, and its error carries the face and pass indices.
#[derive(Debug)]
pub struct FaceReport {
    pub face_index: usize,
    pub result: Result<FaceChain>,
}

/// Drives N sequential bridge-cut passes over one or more faces.
///
/// The angle step is `180 / N` degrees. Pass 1 uses the supplied start
/// angle with no previous guide line; each later pass composes the step
/// onto the guide returned by the pass before it and consumes that
/// pass's face.
pub struct BridgePlan {
    start_angle_deg: f64,
    layer: LayerThickness,
    passes: u32,
    gap: f64,
}

impl BridgePlan {
    /// Creates a new `BridgePlan` with the default gap.
    #[must_use]
    pub fn new(start_angle_deg: f64, layer: LayerThickness, passes: u32) -> Self {
        Self {
            start_angle_deg,
            layer,
            passes,
            gap: DEFAULT_GAP,
        }
    }

    /// Overrides the chord clearance gap.
    #[must_use]
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Executes the plan over the given faces, one report per face.
    ///
    /// # Errors
    ///
    /// Fails up front on an invalid pass count or non-positive gap.
    /// Per-face failures do not fail the plan; they appear in that
    /// face's report.
    pub fn execute(&self, store: &mut FaceStore, faces: &[FaceId]) -> Result<Vec<FaceReport>> {
        if !(1..=5).contains(&self.passes) {
            return Err(PlanError::InvalidPassCount {
                passes: self.passes,
            }
            .into());
        }
        if self.gap <= 0.0 {
            return Err(PlanError::DegenerateGap { gap: self.gap }.into());
        }
        let angle_step = 180.0 / f64::from(self.passes);

        let mut reports = Vec::with_capacity(faces.len());
        for (face_index, &face) in faces.iter().enumerate() {
            let result = self.run_face(store, face, face_index, angle_step);
            if let Err(err) = &result {
                warn!("face {face_index} aborted: {err}");
            }
            reports.push(FaceReport { face_index, result });
        }
        Ok(reports)
    }

    /// Runs the full pass chain for one face as an explicit fold over
    /// pass descriptors, threading (face, guide) from pass to pass.
    fn run_face(
        &self,
        store: &mut FaceStore,
        face: FaceId,
        face_index: usize,
        angle_step: f64,
    ) -> Result<FaceChain> {
        let descriptors: Vec<(usize, f64)> = (1..=self.passes as usize)
            .map(|pass_index| {
                let step = if pass_index == 1 {
                    self.start_angle_deg
                } else {
                    angle_step
                };
                (pass_index, step)
            })
            .collect();

        let chain = descriptors.into_iter().try_fold(
            (face, None::<GuideLine>, Vec::new()),
            |(face, guide, mut records), (pass_index, step)| {
                debug!("face {face_index} pass {pass_index} at step {step} deg");
                let pass = CutPass {
                    face,
                    previous_guide: guide,
                    angle_step_deg: step,
                };
                let is_last = pass_index == self.passes as usize;
                let outcome = BridgeCut::new(pass, self.layer.clone(), self.gap)
                    .with_expression_passthrough(is_last)
                    .execute(store)
                    .map_err(|source| {
                        PontisError::from(PlanError::Pass {
                            face_index,
                            pass_index,
                            source: Box::new(source),
                        })
                    })?;
                let next_guide = outcome.guide.clone();
                records.push(PassRecord {
                    face: outcome.face,
                    guide: outcome.guide,
                    sketch: outcome.sketch,
                });
                Ok::<_, PontisError>((outcome.face, Some(next_guide), records))
            },
        )?;

        Ok(FaceChain { passes: chain.2 })
    }
}
