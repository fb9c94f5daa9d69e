use std::ops::Range;

use crate::error::LineError;
use crate::geometry::{LineInstance, LineStyle};
use crate::transform::{MatrixTransform, Transform, TransformParams, TransformVariant};

/// One recorded draw: a contiguous instance range with its transform and style.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDraw {
    pub instances: Range<u32>,
    pub transform: TransformParams,
    pub style: LineStyle,
}

/// Draws recorded for a frame, all targeting one transform variant.
///
/// Instances of every draw are packed into one buffer so the renderer uploads
/// them with a single write.
///
/// Invariants checked at `push`:
/// - every draw uses the batch's variant
/// - the screen scale of every transform is positive and finite
/// - all matrix draws share one matrix (the matrix block is persistent)
#[derive(Debug, Clone)]
pub struct LineBatch {
    variant: TransformVariant,
    instances: Vec<LineInstance>,
    draws: Vec<LineDraw>,
    matrix: Option<MatrixTransform>,
}

impl LineBatch {
    pub fn new(variant: TransformVariant) -> Self {
        Self {
            variant,
            instances: Vec::new(),
            draws: Vec::new(),
            matrix: None,
        }
    }

    #[inline]
    pub fn variant(&self) -> TransformVariant {
        self.variant
    }

    /// Clears recorded draws, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.instances.clear();
        self.draws.clear();
        self.matrix = None;
    }

    /// Records a draw of `instances` under `transform` with `style`.
    ///
    /// An empty instance slice records nothing.
    pub fn push(
        &mut self,
        instances: &[LineInstance],
        transform: impl Into<TransformParams>,
        style: LineStyle,
    ) -> Result<(), LineError> {
        let transform = transform.into();

        let found = transform.variant();
        if found != self.variant {
            return Err(LineError::VariantMismatch {
                expected: self.variant,
                found,
            });
        }

        let scale = transform.screen_scale();
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(LineError::InvalidScale(scale));
        }

        if let TransformParams::Matrix(m) = transform {
            match self.matrix {
                Some(existing) if existing != m => return Err(LineError::MatrixChangedWithinFrame),
                _ => self.matrix = Some(m),
            }
        }

        if instances.is_empty() {
            return Ok(());
        }

        let start = self.instances.len() as u32;
        self.instances.extend_from_slice(instances);
        let end = self.instances.len() as u32;

        self.draws.push(LineDraw {
            instances: start..end,
            transform,
            style,
        });
        Ok(())
    }

    #[inline]
    pub fn instances(&self) -> &[LineInstance] {
        &self.instances
    }

    #[inline]
    pub fn draws(&self) -> &[LineDraw] {
        &self.draws
    }

    /// The frame's matrix, for matrix batches that recorded at least one push.
    #[inline]
    pub fn matrix(&self) -> Option<&MatrixTransform> {
        self.matrix.as_ref()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}
