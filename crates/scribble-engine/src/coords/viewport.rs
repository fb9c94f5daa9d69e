/// Framebuffer size in physical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Pixels covered by one NDC unit, as the geometric mean of both axes.
    ///
    /// Matches the area scale stage 2 uses, so a band converted with it is
    /// exact under an aspect-corrected camera.
    #[inline]
    pub fn pixels_per_ndc(self) -> f32 {
        0.5 * (self.width * self.height).sqrt()
    }
}
