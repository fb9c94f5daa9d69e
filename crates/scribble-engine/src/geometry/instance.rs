use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::error::LineError;

/// One line segment as uploaded to the per-instance vertex buffer.
///
/// `position` is the midpoint; `direction` spans the whole segment, so the
/// endpoints are `position ± direction / 2`.
///
/// Layout (16 bytes):
///
///  offset 0  position  [f32; 2]  loc 1
///  offset 8  direction [f32; 2]  loc 2
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub position: [f32; 2],
    pub direction: [f32; 2],
}

impl LineInstance {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        1 => Float32x2, // position
        2 => Float32x2  // direction
    ];

    /// Validates and builds an instance. A zero direction has no normal, so it
    /// is rejected here rather than producing NaNs in the vertex stage.
    pub fn new(position: Vec2, direction: Vec2) -> Result<Self, LineError> {
        if !position.is_finite() || !direction.is_finite() {
            return Err(LineError::NonFinite);
        }
        if direction.length_squared() == 0.0 {
            return Err(LineError::DegenerateDirection);
        }
        Ok(Self {
            position: position.to_array(),
            direction: direction.to_array(),
        })
    }

    /// Segment from `start` to `end`.
    pub fn from_endpoints(start: Vec2, end: Vec2) -> Result<Self, LineError> {
        Self::new((start + end) * 0.5, end - start)
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::from(self.position)
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        Vec2::from(self.direction)
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    /// `(start, end)` endpoints.
    #[inline]
    pub fn endpoints(&self) -> (Vec2, Vec2) {
        let half = self.direction() * 0.5;
        (self.position() - half, self.position() + half)
    }

    /// Unit normal, `perp(direction) / |direction|`.
    #[inline]
    pub fn normal(&self) -> Vec2 {
        let d = self.direction();
        d.perp() / d.length()
    }

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
