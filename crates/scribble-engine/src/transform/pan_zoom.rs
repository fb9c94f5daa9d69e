use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;

use super::{Transform, TransformVariant};

/// `clip = world * scale + offset`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PanZoom {
    pub offset: Vec2,
    pub scale: f32,
}

impl PanZoom {
    #[inline]
    pub const fn new(offset: Vec2, scale: f32) -> Self {
        Self { offset, scale }
    }

    pub(crate) fn uniform(&self) -> PanZoomUniform {
        PanZoomUniform {
            offset: self.offset.to_array(),
            scale: self.scale,
            _pad: 0.0,
        }
    }
}

impl Default for PanZoom {
    fn default() -> Self {
        Self::new(Vec2::zero(), 1.0)
    }
}

impl Transform for PanZoom {
    #[inline]
    fn to_clip(&self, world: Vec2) -> [f32; 4] {
        let p = world * self.scale + self.offset;
        [p.x, p.y, 0.0, 1.0]
    }

    #[inline]
    fn screen_scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    fn variant(&self) -> TransformVariant {
        TransformVariant::PanZoom
    }
}

/// `TransformBlock` in `pan_zoom.wgsl` (16 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct PanZoomUniform {
    pub offset: [f32; 2],
    pub scale: f32,
    pub _pad: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_then_offsets() {
        let t = PanZoom::new(Vec2::new(0.5, -0.25), 0.1);
        let clip = t.to_clip(Vec2::new(10.0, 5.0));
        assert!((clip[0] - 1.5).abs() < 1e-6);
        assert!((clip[1] - 0.25).abs() < 1e-6);
        assert_eq!([clip[2], clip[3]], [0.0, 1.0]);
    }

    #[test]
    fn uniform_matches_wgsl_size() {
        assert_eq!(std::mem::size_of::<PanZoomUniform>(), 16);
    }
}
