//! Software rendition of the line pipeline.
//!
//! Runs the same two stages as `line.wgsl` on the CPU: quad expansion and
//! transform per corner, then capsule distance and coverage per pixel. Used to
//! check rendering properties without a GPU.

use crate::coords::{Color, Vec2};
use crate::error::LineError;
use crate::geometry::{
    aa_band, capsule_distance, coverage, expand_vertex, LineInstance, LineStyle, QUAD_INDICES,
    QUAD_VERTICES,
};
use crate::transform::Transform;

/// RGBA f32 target with straight-alpha source-over blending.
pub struct CpuRasterizer {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

/// A quad corner after stage 1, in pixel space.
#[derive(Debug, Copy, Clone)]
struct Corner {
    px: Vec2,
    inv_w: f32,
    world: Vec2,
}

impl CpuRasterizer {
    /// Creates a target cleared to transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::transparent().to_array(); (width as usize) * (height as usize)],
        }
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color.to_array());
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at column `x`, row `y` (row 0 at the top).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        self.pixels[self.index(x, y)]
    }

    #[inline]
    pub fn alpha_at(&self, x: u32, y: u32) -> f32 {
        self.pixel(x, y)[3]
    }

    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Rasterizes `instances` under `transform` with `style`.
    ///
    /// The AA band follows `screen_scale_at` the shaded world point. Instances
    /// with a corner at or behind the camera plane (`w <= 0`) are skipped
    /// whole; there is no near-plane clipping.
    pub fn draw(
        &mut self,
        transform: &dyn Transform,
        instances: &[LineInstance],
        style: &LineStyle,
    ) -> Result<(), LineError> {
        let scale = transform.screen_scale();
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(LineError::InvalidScale(scale));
        }

        for instance in instances {
            let Some(corners) = self.project_corners(transform, instance, style.thickness) else {
                log::trace!("cpu raster: instance behind camera, skipped");
                continue;
            };
            self.fill_quad(transform, &corners, instance, style);
        }
        Ok(())
    }

    // ── private helpers ────────────────────────────────────────────────────

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    fn project_corners(
        &self,
        transform: &dyn Transform,
        instance: &LineInstance,
        thickness: f32,
    ) -> Option<[Corner; 4]> {
        let (w, h) = (self.width as f32, self.height as f32);
        let mut out = [Corner {
            px: Vec2::zero(),
            inv_w: 0.0,
            world: Vec2::zero(),
        }; 4];

        for (corner, vertex) in out.iter_mut().zip(QUAD_VERTICES.iter()) {
            let world = expand_vertex(Vec2::from(vertex.local), instance, thickness);
            let [cx, cy, _, cw] = transform.to_clip(world);
            if !(cw > 0.0) {
                return None;
            }
            let (nx, ny) = (cx / cw, cy / cw);
            *corner = Corner {
                px: Vec2::new((nx * 0.5 + 0.5) * w, (0.5 - ny * 0.5) * h),
                inv_w: 1.0 / cw,
                world,
            };
        }
        Some(out)
    }

    fn fill_quad(
        &mut self,
        transform: &dyn Transform,
        c: &[Corner; 4],
        instance: &LineInstance,
        style: &LineStyle,
    ) {
        let (min, max) = c.iter().fold(
            (Vec2::new(f32::INFINITY, f32::INFINITY), Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY)),
            |(lo, hi), k| {
                (
                    Vec2::new(lo.x.min(k.px.x), lo.y.min(k.px.y)),
                    Vec2::new(hi.x.max(k.px.x), hi.y.max(k.px.y)),
                )
            },
        );

        let x0 = (min.x - 0.5).ceil().max(0.0) as u32;
        let y0 = (min.y - 0.5).ceil().max(0.0) as u32;
        let x1 = ((max.x - 0.5).floor() + 1.0).clamp(0.0, self.width as f32) as u32;
        let y1 = ((max.y - 0.5).floor() + 1.0).clamp(0.0, self.height as f32) as u32;

        let triangles = [
            [QUAD_INDICES[0], QUAD_INDICES[1], QUAD_INDICES[2]],
            [QUAD_INDICES[3], QUAD_INDICES[4], QUAD_INDICES[5]],
        ];

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

                // Shared diagonal: first triangle wins.
                let world = triangles.iter().find_map(|t| {
                    interpolate_world(&c[t[0] as usize], &c[t[1] as usize], &c[t[2] as usize], p)
                });
                let Some(world) = world else { continue };

                let scale = transform.screen_scale_at(world);
                if !(scale > 0.0 && scale.is_finite()) {
                    continue;
                }
                let d = capsule_distance(world, instance, style.thickness);
                let alpha = style.color.a * coverage(d, aa_band(style.aa_border, scale));
                if alpha <= 0.0 {
                    continue;
                }

                let i = self.index(x, y);
                self.pixels[i] = blend_over(self.pixels[i], style.color, alpha);
            }
        }
    }
}

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Perspective-correct world position at `p`, or `None` when `p` lies outside
/// the triangle. Accepts either winding.
fn interpolate_world(a: &Corner, b: &Corner, c: &Corner, p: Vec2) -> Option<Vec2> {
    let area = edge(a.px, b.px, c.px);
    if area == 0.0 {
        return None;
    }
    let l0 = edge(b.px, c.px, p) / area;
    let l1 = edge(c.px, a.px, p) / area;
    let l2 = edge(a.px, b.px, p) / area;
    if l0 < 0.0 || l1 < 0.0 || l2 < 0.0 {
        return None;
    }

    let (q0, q1, q2) = (l0 * a.inv_w, l1 * b.inv_w, l2 * c.inv_w);
    let sum = q0 + q1 + q2;
    Some((a.world * q0 + b.world * q1 + c.world * q2) / sum)
}

/// `SrcAlpha, OneMinusSrcAlpha` on color; `One, OneMinusSrcAlpha` on alpha.
#[inline]
fn blend_over(dst: [f32; 4], src: Color, alpha: f32) -> [f32; 4] {
    let keep = 1.0 - alpha;
    [
        src.r * alpha + dst[0] * keep,
        src.g * alpha + dst[1] * keep,
        src.b * alpha + dst[2] * keep,
        alpha + dst[3] * keep,
    ]
}
