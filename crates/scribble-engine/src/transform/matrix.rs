use bytemuck::{Pod, Zeroable};
use glam::{Mat2, Vec4};

use crate::coords::{Mat4, Vec2};

use super::{Transform, TransformVariant};

/// `clip = M * (world, 0, 1)` for an arbitrary projective 4×4 matrix.
///
/// The screen scale is the area scale of the mapping after the w divide,
/// `sqrt(|det J|)` with `J` the Jacobian of `(x/w, y/w)` at the world point.
/// It varies across the plane under perspective, so the shader evaluates it
/// per fragment; [`screen_scale`](Transform::screen_scale) reports the
/// value at the origin.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct MatrixTransform {
    pub matrix: Mat4,
}

impl MatrixTransform {
    #[inline]
    pub const fn new(matrix: Mat4) -> Self {
        Self { matrix }
    }

    pub(crate) fn uniform(&self) -> MatrixUniform {
        MatrixUniform {
            matrix: self.matrix.to_cols_array_2d(),
        }
    }

    /// Jacobian of NDC `xy` with respect to world `xy` at `world`, or `None`
    /// when the point maps to `w == 0`.
    fn ndc_jacobian(&self, world: Vec2) -> Option<Mat2> {
        let m = &self.matrix;
        let clip = *m * Vec4::new(world.x, world.y, 0.0, 1.0);
        if clip.w == 0.0 {
            return None;
        }
        let xy = clip.truncate().truncate();
        let w2 = clip.w * clip.w;
        let column = |axis: Vec4| (axis.truncate().truncate() * clip.w - xy * axis.w) / w2;
        Some(Mat2::from_cols(column(m.x_axis), column(m.y_axis)))
    }
}

impl Transform for MatrixTransform {
    #[inline]
    fn to_clip(&self, world: Vec2) -> [f32; 4] {
        (self.matrix * Vec4::new(world.x, world.y, 0.0, 1.0)).to_array()
    }

    #[inline]
    fn screen_scale(&self) -> f32 {
        self.screen_scale_at(Vec2::zero())
    }

    fn screen_scale_at(&self, world: Vec2) -> f32 {
        match self.ndc_jacobian(world) {
            Some(j) => j.determinant().abs().sqrt(),
            None => 0.0,
        }
    }

    #[inline]
    fn variant(&self) -> TransformVariant {
        TransformVariant::Matrix
    }
}

/// `TransformBlock` in `matrix.wgsl`: one `mat4x4<f32>` (64 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct MatrixUniform {
    pub matrix: [[f32; 4]; 4],
}
