use bytemuck::{Pod, Zeroable};

use glam::Mat2;

use crate::coords::{Mat3, Vec2};

use super::{Transform, TransformVariant};

/// `clip = ((A * (world, 1)).xy, 0, 1)` for a 3×3 homogeneous 2D matrix.
///
/// The scale is implicit in the matrix. Stage 2 uses the geometric mean of
/// the two axis scales, `sqrt(|det|)` of the linear block, which is invariant
/// under rotation and exact for uniform scale.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct AffineTransform {
    pub matrix: Mat3,
}

impl AffineTransform {
    #[inline]
    pub const fn new(matrix: Mat3) -> Self {
        Self { matrix }
    }

    pub(crate) fn uniform(&self) -> AffineUniform {
        // WGSL pads each mat3x3 column to 16 bytes.
        let [c0, c1, c2] = self.matrix.to_cols_array_2d();
        AffineUniform {
            matrix: [
                [c0[0], c0[1], c0[2], 0.0],
                [c1[0], c1[1], c1[2], 0.0],
                [c2[0], c2[1], c2[2], 0.0],
            ],
        }
    }
}

impl Transform for AffineTransform {
    #[inline]
    fn to_clip(&self, world: Vec2) -> [f32; 4] {
        let p = self.matrix.transform_point2(world.into());
        [p.x, p.y, 0.0, 1.0]
    }

    #[inline]
    fn screen_scale(&self) -> f32 {
        Mat2::from_mat3(self.matrix).determinant().abs().sqrt()
    }

    #[inline]
    fn variant(&self) -> TransformVariant {
        TransformVariant::Affine
    }
}

/// `TransformBlock` in `affine.wgsl`: one `mat3x3<f32>` (48 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct AffineUniform {
    pub matrix: [[f32; 4]; 3],
}
