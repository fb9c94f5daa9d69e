use crate::coords::{Color, Viewport};

use super::AA_BORDER;

/// Per-draw appearance of a batch of lines.
///
/// Thickness is the capsule half-width in world units. It is shared by every
/// instance of a draw; there is no per-instance width.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineStyle {
    pub thickness: f32,
    /// AA band width in clip units.
    pub aa_border: f32,
    pub color: Color,
}

impl LineStyle {
    #[inline]
    pub fn new(thickness: f32) -> Self {
        Self {
            thickness,
            aa_border: AA_BORDER,
            color: Color::white(),
        }
    }

    #[inline]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn with_aa_border(mut self, aa_border: f32) -> Self {
        self.aa_border = aa_border;
        self
    }

    /// Converts a band width in physical pixels to clip units for `viewport`,
    /// using the geometric mean of its two axes.
    #[inline]
    pub fn aa_border_from_pixels(pixels: f32, viewport: Viewport) -> f32 {
        pixels / viewport.pixels_per_ndc().max(1.0)
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::new(0.005)
    }
}
