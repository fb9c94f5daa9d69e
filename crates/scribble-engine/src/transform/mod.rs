//! Transform variants for stage 1 and the screen scale they hand to stage 2.
//!
//! Every variant answers the same two questions, so the shading code never
//! branches on which one is bound:
//! - where does a world point land in clip space (`to_clip`)
//! - how many clip units does one world unit span (`screen_scale`, and
//!   `screen_scale_at` where that depends on the position)
//!
//! The WGSL side follows the same split: each variant ships a prelude that
//! defines `transform_to_clip` and `screen_scale`, and the shared stage code in
//! `line.wgsl` is appended to it.

mod affine;
mod matrix;
mod pan_zoom;

use serde::Deserialize;

use crate::coords::Vec2;

pub use affine::AffineTransform;
pub use matrix::MatrixTransform;
pub use pan_zoom::PanZoom;

pub(crate) use affine::AffineUniform;
pub(crate) use matrix::MatrixUniform;
pub(crate) use pan_zoom::PanZoomUniform;

/// World → clip mapping plus the scale stage 2 needs for its AA band.
pub trait Transform {
    /// Homogeneous clip position of a world point.
    fn to_clip(&self, world: Vec2) -> [f32; 4];

    /// Clip units per world unit. Must be positive for the AA band to be valid.
    ///
    /// For projective transforms this is the value at the world origin.
    fn screen_scale(&self) -> f32;

    /// NDC units per world unit around `world`.
    #[inline]
    fn screen_scale_at(&self, _world: Vec2) -> f32 {
        self.screen_scale()
    }

    fn variant(&self) -> TransformVariant;
}

/// Which transform a pipeline is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformVariant {
    /// Persistent 4×4 matrix, written at most once per frame.
    Matrix,
    /// Per-draw `offset` + `scale`.
    #[default]
    PanZoom,
    /// Per-draw 3×3 homogeneous matrix.
    Affine,
}

impl TransformVariant {
    pub const ALL: [TransformVariant; 3] = [
        TransformVariant::Matrix,
        TransformVariant::PanZoom,
        TransformVariant::Affine,
    ];

    /// WGSL defining `TransformBlock`, its binding, `transform_to_clip` and
    /// `screen_scale` for this variant.
    pub(crate) fn wgsl_prelude(self) -> &'static str {
        match self {
            TransformVariant::Matrix => include_str!("../render/shaders/matrix.wgsl"),
            TransformVariant::PanZoom => include_str!("../render/shaders/pan_zoom.wgsl"),
            TransformVariant::Affine => include_str!("../render/shaders/affine.wgsl"),
        }
    }

    /// Whether the transform block is written per draw (dynamic offset) rather
    /// than once per frame.
    #[inline]
    pub fn is_per_draw(self) -> bool {
        !matches!(self, TransformVariant::Matrix)
    }

    pub fn label(self) -> &'static str {
        match self {
            TransformVariant::Matrix => "matrix",
            TransformVariant::PanZoom => "pan_zoom",
            TransformVariant::Affine => "affine",
        }
    }
}

/// The active transform for one draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TransformParams {
    Matrix(MatrixTransform),
    PanZoom(PanZoom),
    Affine(AffineTransform),
}

impl TransformParams {
    fn as_transform(&self) -> &dyn Transform {
        match self {
            TransformParams::Matrix(t) => t,
            TransformParams::PanZoom(t) => t,
            TransformParams::Affine(t) => t,
        }
    }
}

impl Transform for TransformParams {
    #[inline]
    fn to_clip(&self, world: Vec2) -> [f32; 4] {
        self.as_transform().to_clip(world)
    }

    #[inline]
    fn screen_scale(&self) -> f32 {
        self.as_transform().screen_scale()
    }

    #[inline]
    fn screen_scale_at(&self, world: Vec2) -> f32 {
        self.as_transform().screen_scale_at(world)
    }

    #[inline]
    fn variant(&self) -> TransformVariant {
        self.as_transform().variant()
    }
}

impl From<MatrixTransform> for TransformParams {
    fn from(t: MatrixTransform) -> Self {
        TransformParams::Matrix(t)
    }
}

impl From<PanZoom> for TransformParams {
    fn from(t: PanZoom) -> Self {
        TransformParams::PanZoom(t)
    }
}

impl From<AffineTransform> for TransformParams {
    fn from(t: AffineTransform) -> Self {
        TransformParams::Affine(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{embed_affine_2d, Mat3};

    fn close(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    // Same camera (zoom 2, centered on (0.25, -0.5)) in all three forms.
    fn variants() -> [TransformParams; 3] {
        let zoom = 2.0;
        let offset = Vec2::new(-0.5, 1.0);
        let affine = Mat3::from_scale_angle_translation(glam::Vec2::splat(zoom), 0.0, offset.into());
        [
            PanZoom::new(offset, zoom).into(),
            AffineTransform::new(affine).into(),
            MatrixTransform::new(embed_affine_2d(&affine)).into(),
        ]
    }

    #[test]
    fn variants_agree_on_clip_position() {
        let [pz, af, mx] = variants();
        for p in [Vec2::zero(), Vec2::new(0.3, -0.2), Vec2::new(-1.0, 4.0)] {
            assert!(close(pz.to_clip(p), af.to_clip(p)));
            assert!(close(pz.to_clip(p), mx.to_clip(p)));
        }
    }

    #[test]
    fn variants_agree_on_screen_scale() {
        for t in variants() {
            assert!((t.screen_scale() - 2.0).abs() < 1e-5, "{:?}", t.variant());
            let away = t.screen_scale_at(Vec2::new(3.0, -7.0));
            assert!((away - 2.0).abs() < 1e-5, "{:?}", t.variant());
        }
    }

    #[test]
    fn params_report_their_variant() {
        let [pz, af, mx] = variants();
        assert_eq!(pz.variant(), TransformVariant::PanZoom);
        assert_eq!(af.variant(), TransformVariant::Affine);
        assert_eq!(mx.variant(), TransformVariant::Matrix);
    }

    #[test]
    fn only_matrix_is_persistent() {
        assert!(!TransformVariant::Matrix.is_per_draw());
        assert!(TransformVariant::PanZoom.is_per_draw());
        assert!(TransformVariant::Affine.is_per_draw());
    }
}
