use scribble_engine::coords::{embed_affine_2d, Mat3, Vec2, Viewport};
use scribble_engine::transform::{
    AffineTransform, MatrixTransform, PanZoom, TransformParams, TransformVariant,
};

const MIN_ZOOM: f32 = 0.01;
const MAX_ZOOM: f32 = 1000.0;

/// 2D view over the sketch: `clip = A * zoom * R(rotation) * (world - center)`.
///
/// `A` squeezes the longer axis so a world unit covers the same number of
/// pixels both ways; at zoom 1 with the camera at the origin the shorter
/// axis spans `[-1, 1]`. Pan/zoom has a single scale, so it can neither
/// rotate nor correct the aspect: it maps world to NDC directly and ignores
/// both.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub center: Vec2,
    pub zoom: f32,
    pub rotation: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: Vec2::zero(),
            zoom: 1.0,
            rotation: 0.0,
        }
    }
}

impl Camera {
    fn effective_rotation(&self, variant: TransformVariant) -> f32 {
        match variant {
            TransformVariant::PanZoom => 0.0,
            TransformVariant::Matrix | TransformVariant::Affine => self.rotation,
        }
    }

    /// Per-axis NDC squeeze `A`.
    fn aspect(variant: TransformVariant, viewport: Viewport) -> Vec2 {
        if variant == TransformVariant::PanZoom || !viewport.is_valid() {
            return Vec2::new(1.0, 1.0);
        }
        let (w, h) = (viewport.width, viewport.height);
        Vec2::new((h / w).min(1.0), (w / h).min(1.0))
    }

    /// NDC offset → the world offset it shows, undoing `A`, rotation and zoom.
    fn ndc_to_world_offset(&self, ndc: Vec2, viewport: Viewport, variant: TransformVariant) -> Vec2 {
        let a = Self::aspect(variant, viewport);
        let unsqueezed = Vec2::new(ndc.x / a.x, ndc.y / a.y);
        unsqueezed.rotated(-self.effective_rotation(variant)) / self.zoom
    }

    /// World → clip as a 3×3 affine matrix.
    pub fn world_to_clip(&self, variant: TransformVariant, viewport: Viewport) -> Mat3 {
        let rotation = self.effective_rotation(variant);
        let translation = -(self.center.rotated(rotation) * self.zoom);
        let view = Mat3::from_scale_angle_translation(
            Vec2::new(self.zoom, self.zoom).into(),
            rotation,
            translation.into(),
        );
        Mat3::from_scale(Self::aspect(variant, viewport).into()) * view
    }

    /// Transform parameters for one draw under `variant`.
    pub fn params(&self, variant: TransformVariant, viewport: Viewport) -> TransformParams {
        match variant {
            TransformVariant::PanZoom => PanZoom::new(-(self.center * self.zoom), self.zoom).into(),
            TransformVariant::Affine => {
                AffineTransform::new(self.world_to_clip(variant, viewport)).into()
            }
            TransformVariant::Matrix => {
                MatrixTransform::new(embed_affine_2d(&self.world_to_clip(variant, viewport))).into()
            }
        }
    }

    /// Physical pixel (origin top-left, +Y down) → world point.
    pub fn screen_to_world(
        &self,
        pixel: Vec2,
        viewport: Viewport,
        variant: TransformVariant,
    ) -> Option<Vec2> {
        if !viewport.is_valid() {
            return None;
        }
        let m = self.world_to_clip(variant, viewport);
        let det = m.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let world = m.inverse().transform_point2(pixel_to_ndc(pixel, viewport).into());
        Some(world.into())
    }

    /// Moves the view by a pointer drag of `delta` physical pixels, so the
    /// content follows the pointer.
    pub fn pan_pixels(&mut self, delta: Vec2, viewport: Viewport, variant: TransformVariant) {
        if !viewport.is_valid() {
            return;
        }
        let ndc = Vec2::new(2.0 * delta.x / viewport.width, -2.0 * delta.y / viewport.height);
        self.center -= self.ndc_to_world_offset(ndc, viewport, variant);
    }

    /// Multiplies the zoom by `factor`, keeping the world point under `pixel`
    /// in place.
    pub fn zoom_at(&mut self, pixel: Vec2, factor: f32, viewport: Viewport, variant: TransformVariant) {
        if !(factor > 0.0 && factor.is_finite()) {
            return;
        }
        let Some(anchor) = self.screen_to_world(pixel, viewport, variant) else { return };

        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        let ndc = pixel_to_ndc(pixel, viewport);
        self.center = anchor - self.ndc_to_world_offset(ndc, viewport, variant);
    }

    /// Rotates the view about its center.
    pub fn rotate(&mut self, radians: f32) {
        self.rotation = (self.rotation + radians) % std::f32::consts::TAU;
    }
}

/// Physical pixel → NDC (+Y up).
pub fn pixel_to_ndc(pixel: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        2.0 * pixel.x / viewport.width - 1.0,
        1.0 - 2.0 * pixel.y / viewport.height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribble_engine::transform::Transform;

    const VP: Viewport = Viewport::new(800.0, 600.0);

    fn clip_xy(t: &TransformParams, p: Vec2) -> Vec2 {
        let [x, y, _, w] = t.to_clip(p);
        Vec2::new(x / w, y / w)
    }

    fn camera() -> Camera {
        Camera {
            center: Vec2::new(0.3, -0.2),
            zoom: 2.5,
            rotation: 0.7,
        }
    }

    #[test]
    fn surface_center_shows_camera_center() {
        let cam = camera();
        for variant in TransformVariant::ALL {
            let world = cam.screen_to_world(Vec2::new(400.0, 300.0), VP, variant).unwrap();
            assert!(world.abs_diff_eq(cam.center, 1e-5), "{variant:?}");
        }
    }

    #[test]
    fn screen_to_world_inverts_params() {
        let cam = camera();
        let pixel = Vec2::new(123.0, 456.0);
        for variant in TransformVariant::ALL {
            let world = cam.screen_to_world(pixel, VP, variant).unwrap();
            let ndc = clip_xy(&cam.params(variant, VP), world);
            assert!(ndc.abs_diff_eq(pixel_to_ndc(pixel, VP), 1e-4), "{variant:?}");
        }
    }

    #[test]
    fn variants_agree_without_rotation() {
        let cam = Camera {
            rotation: 0.0,
            ..camera()
        };
        // Aspect correction is a no-op on a square surface.
        let square = Viewport::new(600.0, 600.0);
        let p = Vec2::new(-0.4, 0.9);
        let reference = clip_xy(&cam.params(TransformVariant::PanZoom, square), p);
        for variant in [TransformVariant::Affine, TransformVariant::Matrix] {
            assert!(clip_xy(&cam.params(variant, square), p).abs_diff_eq(reference, 1e-5));
        }
    }

    #[test]
    fn pan_zoom_ignores_rotation() {
        let a = Camera::default();
        let b = Camera {
            rotation: 1.0,
            ..Camera::default()
        };
        assert_eq!(
            a.params(TransformVariant::PanZoom, VP),
            b.params(TransformVariant::PanZoom, VP)
        );
        assert_ne!(
            a.params(TransformVariant::Affine, VP),
            b.params(TransformVariant::Affine, VP)
        );
    }

    #[test]
    fn zoom_keeps_point_under_cursor() {
        let mut cam = camera();
        let cursor = Vec2::new(650.0, 120.0);
        for variant in TransformVariant::ALL {
            let before = cam.screen_to_world(cursor, VP, variant).unwrap();
            cam.zoom_at(cursor, 1.25, VP, variant);
            let after = cam.screen_to_world(cursor, VP, variant).unwrap();
            assert!(before.abs_diff_eq(after, 1e-4), "{variant:?}");
        }
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = Camera::default();
        for _ in 0..100 {
            cam.zoom_at(Vec2::new(400.0, 300.0), 10.0, VP, TransformVariant::PanZoom);
        }
        assert_eq!(cam.zoom, MAX_ZOOM);
        cam.zoom_at(Vec2::new(400.0, 300.0), 0.0, VP, TransformVariant::PanZoom);
        assert_eq!(cam.zoom, MAX_ZOOM);
    }

    #[test]
    fn drag_moves_content_with_pointer() {
        let mut cam = camera();
        let start = Vec2::new(200.0, 200.0);
        let delta = Vec2::new(40.0, -25.0);
        for variant in TransformVariant::ALL {
            let grabbed = cam.screen_to_world(start, VP, variant).unwrap();
            cam.pan_pixels(delta, VP, variant);
            let under = cam.screen_to_world(start + delta, VP, variant).unwrap();
            assert!(grabbed.abs_diff_eq(under, 1e-4), "{variant:?}");
        }
    }

    fn pixel_length(t: &TransformParams, from: Vec2, to: Vec2) -> f32 {
        let (a, b) = (clip_xy(t, from), clip_xy(t, to));
        let d = Vec2::new((b.x - a.x) * VP.width / 2.0, (b.y - a.y) * VP.height / 2.0);
        d.length()
    }

    #[test]
    fn rotating_views_keep_world_units_square_on_screen() {
        for rotation in [0.0, 0.6, std::f32::consts::FRAC_PI_2] {
            let cam = Camera {
                rotation,
                ..camera()
            };
            for variant in [TransformVariant::Affine, TransformVariant::Matrix] {
                let t = cam.params(variant, VP);
                let across = pixel_length(&t, Vec2::zero(), Vec2::new(0.1, 0.0));
                let up = pixel_length(&t, Vec2::zero(), Vec2::new(0.0, 0.1));
                assert!((across - up).abs() < 1e-2, "{variant:?} {rotation}: {across} vs {up}");
                // Shorter axis (600 px) spans two world units at zoom 1.
                assert!((across - 0.1 * 300.0 * cam.zoom).abs() < 1e-2);
            }
        }
    }

    #[test]
    fn pan_zoom_stretches_with_the_surface() {
        let t = Camera::default().params(TransformVariant::PanZoom, VP);
        let across = pixel_length(&t, Vec2::zero(), Vec2::new(0.1, 0.0));
        let up = pixel_length(&t, Vec2::zero(), Vec2::new(0.0, 0.1));
        assert!((across / up - 800.0 / 600.0).abs() < 1e-4);
    }

    #[test]
    fn pixel_mapping_flips_y() {
        assert_eq!(pixel_to_ndc(Vec2::new(0.0, 0.0), VP), Vec2::new(-1.0, 1.0));
        assert_eq!(pixel_to_ndc(Vec2::new(800.0, 600.0), VP), Vec2::new(1.0, -1.0));
    }
}
