use glam::{Mat3, Mat4, Vec4};

/// Lifts a 2D homogeneous transform into the XY plane of a 4×4 matrix.
///
/// `z` passes through, and the third row of `m` becomes clip `w`, so
/// `embed(m) * (x, y, 0, 1)` equals `m * (x, y, 1)` rearranged as `(x', y', 0, w')`.
pub fn embed_affine_2d(m: &Mat3) -> Mat4 {
    let (x, y, t) = (m.x_axis, m.y_axis, m.z_axis);
    Mat4::from_cols(
        Vec4::new(x.x, x.y, 0.0, x.z),
        Vec4::new(y.x, y.y, 0.0, y.z),
        Vec4::Z,
        Vec4::new(t.x, t.y, 0.0, t.z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn embedding_matches_mat3_on_the_plane() {
        let m = Mat3::from_scale_angle_translation(Vec2::splat(1.5), 0.4, Vec2::new(0.2, -0.1));
        let p = Vec2::new(-0.6, 0.3);
        let clip = embed_affine_2d(&m) * Vec4::new(p.x, p.y, 0.0, 1.0);
        let expected = m.transform_point2(p);
        assert!((clip.x - expected.x).abs() < 1e-6);
        assert!((clip.y - expected.y).abs() < 1e-6);
        assert_eq!(clip.z, 0.0);
        assert_eq!(clip.w, 1.0);
    }

    #[test]
    fn projective_row_becomes_clip_w() {
        let m = Mat3::from_cols(Vec3::new(1.0, 0.0, 0.5), Vec3::Y, Vec3::Z);
        let clip = embed_affine_2d(&m) * Vec4::new(2.0, 0.0, 0.0, 1.0);
        assert_eq!(clip.w, 2.0);
    }
}
