use thiserror::Error;

/// Top-level error type for the Pontis bridge-cut engine.
#[derive(Debug, Error)]
pub enum PontisError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Sketch(#[from] SketchError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector cannot be normalized")]
    DegenerateVector,
}

/// Errors related to the sketch entity store.
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),
}

/// Errors raised while planning or executing bridge-cut passes.
///
/// Every variant aborts the current pass; none are retried, since the
/// geometric inputs that produced them fail identically on retry.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no inner circle or arc found on the target face")]
    NoInnerCircleFound,

    #[error("expected exactly one inner circle on the target face, found {found}")]
    AmbiguousInnerCircle { found: usize },

    #[error("expected exactly one profile bounded by both bridge lines, found {found}")]
    AmbiguousOrMissingCenterProfile { found: usize },

    #[error("bridge gap must be positive, got {gap}")]
    DegenerateGap { gap: f64 },

    #[error("pass count must be between 1 and 5, got {passes}")]
    InvalidPassCount { passes: u32 },

    #[error("face {face_index}, pass {pass_index}: {source}")]
    Pass {
        face_index: usize,
        pass_index: usize,
        #[source]
        source: Box<PontisError>,
    },
}

/// Convenience type alias for results using [`PontisError`].
pub type Result<T> = std::result::Result<T, PontisError>;
