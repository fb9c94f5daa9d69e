/// Default AA band width in clip (NDC) units.
///
/// Roughly 1.5 px on a 768 px tall surface. Use
/// [`LineStyle::aa_border_from_pixels`](super::LineStyle::aa_border_from_pixels)
/// for an exact pixel width.
pub const AA_BORDER: f32 = 0.004;

/// Width of the AA band in world units for a given effective screen scale
/// (clip units per world unit).
///
/// `aa_band(b, s) * s == b`, so the band occupies the same clip-space (and
/// therefore pixel) width at any zoom.
#[inline]
pub fn aa_band(aa_border: f32, scale: f32) -> f32 {
    aa_border / scale
}

/// Cubic Hermite ease with the semantics of WGSL `smoothstep`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Coverage for a signed distance `d` (negative inside) and band width.
///
/// `1` at or beyond `-band`, `0` at or outside the boundary, smooth and
/// monotonic in between.
#[inline]
pub fn coverage(d: f32, band: f32) -> f32 {
    if d >= 0.0 {
        0.0
    } else if d <= -band {
        1.0
    } else {
        1.0 - smoothstep(-band, 0.0, d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::geometry::{capsule_distance, LineInstance};

    #[test]
    fn saturates_outside_the_band() {
        let band = 0.5;
        for d in [-10.0, -1.0, -0.5] {
            assert_eq!(coverage(d, band), 1.0);
        }
        for d in [0.0, 0.01, 3.0] {
            assert_eq!(coverage(d, band), 0.0);
        }
    }

    #[test]
    fn monotonic_non_increasing_across_band() {
        let band = 0.25;
        let mut prev = coverage(-band, band);
        for i in 1..=200 {
            let d = -band + band * (i as f32 / 200.0);
            let a = coverage(d, band);
            assert!(a <= prev, "coverage increased at d = {d}");
            prev = a;
        }
        assert_eq!(prev, 0.0);
    }

    #[test]
    fn midpoint_of_band_is_half() {
        assert!((coverage(-0.5, 1.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn smoothstep_has_flat_ends() {
        let eps = 1e-3;
        assert!(smoothstep(0.0, 1.0, eps) < 1e-5);
        assert!(1.0 - smoothstep(0.0, 1.0, 1.0 - eps) < 1e-5);
    }

    #[test]
    fn band_scales_inversely_with_zoom() {
        let border = 0.01;
        for k in [0.25f32, 1.0, 2.0, 8.0] {
            let scale = 1.5 * k;
            let screen_width = aa_band(border, scale) * scale;
            assert!((screen_width - border).abs() < 1e-7);
        }
    }

    #[test]
    fn scenario_a_coverage() {
        let line = LineInstance::new(Vec2::zero(), Vec2::new(10.0, 0.0)).unwrap();
        let band = aa_band(AA_BORDER, 1.0);
        let alpha = |p: Vec2| coverage(capsule_distance(p, &line, 5.0), band);

        assert_eq!(alpha(Vec2::new(0.0, 0.0)), 1.0);
        assert_eq!(alpha(Vec2::new(0.0, 5.0)), 0.0);
        let edge = alpha(Vec2::new(0.0, 5.0 - band / 2.0));
        assert!(edge > 0.0 && edge < 1.0, "edge alpha = {edge}");
    }
}
