use crate::transform::TransformVariant;

/// Host-side precondition failures for the line pipeline.
///
/// The GPU stages never check their inputs; these errors are raised where
/// instances and draws are assembled so degenerate data never reaches a dispatch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LineError {
    #[error("line direction must be nonzero")]
    DegenerateDirection,

    #[error("line instance contains a non-finite component")]
    NonFinite,

    #[error("screen scale must be positive and finite, got {0}")]
    InvalidScale(f32),

    #[error("draw uses the {found:?} transform but the pipeline was built for {expected:?}")]
    VariantMismatch {
        expected: TransformVariant,
        found: TransformVariant,
    },

    #[error("matrix transform may change at most once per frame")]
    MatrixChangedWithinFrame,
}
