use crate::coords::Vec2;

use super::LineInstance;

/// Closest point on `[a, b]` to `p`, with its clamped parameter `h`.
///
/// Clamping `h` to `[0, 1]` is what turns the ends into rounded caps.
#[inline]
pub fn nearest_on_segment(p: Vec2, a: Vec2, b: Vec2) -> (Vec2, f32) {
    let ba = b - a;
    let pa = p - a;
    let h = (pa.dot(ba) / ba.dot(ba)).clamp(0.0, 1.0);
    (a + ba * h, h)
}

/// Stage 2 signed distance from `p` to the capsule boundary (negative inside).
pub fn capsule_distance(p: Vec2, instance: &LineInstance, thickness: f32) -> f32 {
    let (a, b) = instance.endpoints();
    let (nearest, _) = nearest_on_segment(p, a, b);
    (p - nearest).length() - thickness
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> LineInstance {
        LineInstance::new(Vec2::zero(), Vec2::new(10.0, 0.0)).unwrap()
    }

    #[test]
    fn midline_is_inside_by_thickness() {
        let line = LineInstance::new(Vec2::new(3.0, -1.0), Vec2::new(-4.0, 6.0)).unwrap();
        let (a, b) = line.endpoints();
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let p = a + (b - a) * t;
            let d = capsule_distance(p, &line, 0.75);
            assert!((d + 0.75).abs() < 1e-5, "t = {t}: d = {d}");
        }
    }

    #[test]
    fn side_at_thickness_is_on_boundary() {
        let line = LineInstance::new(Vec2::new(1.0, 1.0), Vec2::new(6.0, 8.0)).unwrap();
        let n = line.normal();
        for t in [-0.5f32, -0.2, 0.0, 0.3, 0.5] {
            let p = line.position() + line.direction() * t + n * 2.0;
            assert!(capsule_distance(p, &line, 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn scenario_a_distances() {
        let line = scenario();
        assert_eq!(capsule_distance(Vec2::new(0.0, 0.0), &line, 5.0), -5.0);
        assert_eq!(capsule_distance(Vec2::new(0.0, 5.0), &line, 5.0), 0.0);
    }

    #[test]
    fn scenario_b_rounded_cap() {
        let line = scenario();
        let (a, b) = line.endpoints();
        let (nearest, h) = nearest_on_segment(Vec2::new(8.0, 0.0), a, b);
        assert_eq!(h, 1.0);
        assert_eq!(nearest, Vec2::new(5.0, 0.0));
        assert_eq!(capsule_distance(Vec2::new(8.0, 0.0), &line, 5.0), -2.0);
    }

    #[test]
    fn cap_is_round_not_square() {
        let line = scenario();
        // Corner of the bounding quad lies outside the capsule.
        let corner = Vec2::new(9.0, 4.0);
        assert!(capsule_distance(corner, &line, 5.0) > 0.0);
    }

    #[test]
    fn non_positive_thickness_never_inside() {
        let line = scenario();
        for p in [Vec2::zero(), Vec2::new(5.0, 0.0), Vec2::new(-2.0, 0.0)] {
            assert!(capsule_distance(p, &line, 0.0) >= 0.0);
            assert!(capsule_distance(p, &line, -1.0) > 0.0);
        }
    }
}
