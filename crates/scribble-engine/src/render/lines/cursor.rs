use crate::error::LineError;
use crate::transform::MatrixTransform;

/// Where the next batch lands in the renderer's buffers within one submission.
///
/// Queued buffer writes all land before the submitted commands run, so every
/// `render` call in a frame appends past the previous one instead of reusing
/// offset 0. The cursor rewinds when a new frame index shows up.
#[derive(Debug, Clone, Default)]
pub(super) struct FrameCursor {
    frame: Option<u64>,
    instances: usize,
    draws: usize,
    matrix: Option<MatrixTransform>,
}

/// First instance and first uniform slot reserved for one batch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) struct Reservation {
    pub instance_base: usize,
    pub draw_base: usize,
}

impl FrameCursor {
    /// Rewinds when `frame` differs from the frame of the last reservation.
    pub(super) fn begin(&mut self, frame: u64) {
        if self.frame != Some(frame) {
            *self = Self {
                frame: Some(frame),
                ..Self::default()
            };
        }
    }

    pub(super) fn reserve(&mut self, instances: usize, draws: usize) -> Reservation {
        let reservation = Reservation {
            instance_base: self.instances,
            draw_base: self.draws,
        };
        self.instances += instances;
        self.draws += draws;
        reservation
    }

    /// Instances reserved so far this frame.
    #[inline]
    pub(super) fn instances(&self) -> usize {
        self.instances
    }

    /// Uniform slots reserved so far this frame.
    #[inline]
    pub(super) fn draws(&self) -> usize {
        self.draws
    }

    /// Claims the persistent matrix block for this frame. A second batch may
    /// reuse the same matrix but not replace it.
    pub(super) fn claim_matrix(&mut self, matrix: &MatrixTransform) -> Result<(), LineError> {
        match &self.matrix {
            Some(bound) if bound != matrix => Err(LineError::MatrixChangedWithinFrame),
            Some(_) => Ok(()),
            None => {
                self.matrix = Some(*matrix);
                Ok(())
            }
        }
    }
}
