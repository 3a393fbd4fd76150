pub mod cut;
pub mod extend;
pub mod multipass;

pub use cut::{BridgeCut, CutPass, GuideLine, PassOutcome};
pub use extend::{ExtendToBoundary, TrimResult};
pub use multipass::{BridgePlan, FaceChain, FaceReport, PassRecord, DEFAULT_GAP};

/// Cut depth of a single pass.
///
/// The value drives the geometry; the optional expression is the
/// parameter-system string it was resolved from, carried symbolically to
/// the final cut only.
#[derive(Debug, Clone)]
pub struct LayerThickness {
    pub value: f64,
    pub expression: Option<String>,
}

impl LayerThickness {
    /// A literal layer thickness.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value,
            expression: None,
        }
    }

    /// A layer thickness resolved from a named parameter expression.
    #[must_use]
    pub fn from_expression(value: f64, expression: impl Into<String>) -> Self {
        Self {
            value,
            expression: Some(expression.into()),
        }
    }
}
