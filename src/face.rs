use slotmap::SlotMap;

use crate::error::SketchError;
use crate::sketch::SketchCurve;

slotmap::new_key_type! {
    /// Unique identifier for a face in the face store.
    pub struct FaceId;
}

/// A planar face normal to Z at a fixed depth.
///
/// A face is bounded by an outer loop and zero or more hole loops; each
/// loop is a cyclic sequence of curves whose endpoints coincide within
/// tolerance. Faces are produced by cuts and consumed by the next pass.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// Plane depth of the face.
    pub depth: f64,
    /// Symbolic depth expression, carried only on the final cut of a
    /// multi-pass plan (informational passthrough).
    pub depth_expression: Option<String>,
    /// Outer boundary loop.
    pub outer: Vec<SketchCurve>,
    /// Hole loops.
    pub holes: Vec<Vec<SketchCurve>>,
}

/// Arena that owns all faces created during a plan.
#[derive(Debug, Default)]
pub struct FaceStore {
    faces: SlotMap<FaceId, FaceData>,
}

impl FaceStore {
    /// Creates a new, empty face store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a face and returns its ID.
    pub fn add_face(&mut self, data: FaceData) -> FaceId {
        self.faces.insert(data)
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, SketchError> {
        self.faces.get(id).ok_or(SketchError::EntityNotFound("face"))
    }

    /// Returns a mutable reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not in the store.
    pub fn face_mut(&mut self, id: FaceId) -> Result<&mut FaceData, SketchError> {
        self.faces
            .get_mut(id)
            .ok_or(SketchError::EntityNotFound("face"))
    }
}
