use crate::coords::Vec2;
use crate::geometry::LineInstance;

/// Default per-component distance below which a new point is dropped.
pub const MIN_POINT_DISTANCE: f32 = 1e-3;

/// Default cap on the total number of segments held by a sketch.
pub const MAX_INSTANCES: usize = 1 << 20;

#[derive(Debug, Clone, Default)]
struct Stroke {
    last: Option<Vec2>,
    segments: Vec<LineInstance>,
}

/// Freehand strokes turned into line segments.
///
/// Points arrive in world space through [`append_point`](Self::append_point);
/// each point farther than `min_point_distance` from the previous one adds a
/// segment between them. Releasing the pointer commits the stroke.
#[derive(Debug, Clone)]
pub struct Sketch {
    strokes: Vec<Vec<LineInstance>>,
    current: Stroke,
    min_point_distance: f32,
    max_instances: usize,
    len: usize,
    warned_full: bool,
}

impl Sketch {
    pub fn new() -> Self {
        Self::with_limits(MIN_POINT_DISTANCE, MAX_INSTANCES)
    }

    pub fn with_limits(min_point_distance: f32, max_instances: usize) -> Self {
        Self {
            strokes: Vec::new(),
            current: Stroke::default(),
            min_point_distance: min_point_distance.max(0.0),
            max_instances,
            len: 0,
            warned_full: false,
        }
    }

    /// Adds a point to the stroke in progress, starting one if needed.
    ///
    /// Returns `true` when a segment was added.
    pub fn append_point(&mut self, p: Vec2) -> bool {
        if !p.is_finite() {
            return false;
        }

        let Some(last) = self.current.last else {
            self.current.last = Some(p);
            return false;
        };

        if last.abs_diff_eq(p, self.min_point_distance) {
            return false;
        }

        if self.len >= self.max_instances {
            if !self.warned_full {
                log::warn!(
                    "sketch is full ({} segments); further points are ignored",
                    self.max_instances
                );
                self.warned_full = true;
            }
            return false;
        }

        match LineInstance::from_endpoints(last, p) {
            Ok(segment) => {
                self.current.segments.push(segment);
                self.current.last = Some(p);
                self.len += 1;
                true
            }
            Err(err) => {
                log::trace!("dropped segment: {err}");
                false
            }
        }
    }

    /// Ends the stroke in progress. Strokes without segments are discarded.
    ///
    /// Returns `true` when a stroke was committed.
    pub fn commit_stroke(&mut self) -> bool {
        let stroke = std::mem::take(&mut self.current);
        if stroke.segments.is_empty() {
            return false;
        }
        log::debug!("stroke committed: {} segments", stroke.segments.len());
        self.strokes.push(stroke.segments);
        true
    }

    /// Removes the most recently committed stroke.
    pub fn undo(&mut self) -> bool {
        match self.strokes.pop() {
            Some(stroke) => {
                self.len -= stroke.len();
                self.warned_full = false;
                true
            }
            None => false,
        }
    }

    /// Removes every stroke, including the one in progress.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.current = Stroke::default();
        self.len = 0;
        self.warned_full = false;
    }

    #[inline]
    pub fn is_drawing(&self) -> bool {
        self.current.last.is_some()
    }

    #[inline]
    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Segments held, committed and in progress.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every segment, committed strokes first, then the stroke in progress.
    pub fn instances(&self) -> Vec<LineInstance> {
        let mut out = Vec::with_capacity(self.len);
        for stroke in &self.strokes {
            out.extend_from_slice(stroke);
        }
        out.extend_from_slice(&self.current.segments);
        out
    }
}

impl Default for Sketch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(sketch: &mut Sketch, points: &[(f32, f32)]) {
        for &(x, y) in points {
            sketch.append_point(Vec2::new(x, y));
        }
        sketch.commit_stroke();
    }

    // ── capture ───────────────────────────────────────────────────────────

    #[test]
    fn first_point_only_starts_a_stroke() {
        let mut s = Sketch::new();
        assert!(!s.append_point(Vec2::new(0.1, 0.1)));
        assert!(s.is_drawing());
        assert!(s.is_empty());
    }

    #[test]
    fn consecutive_points_form_segments() {
        let mut s = Sketch::new();
        s.append_point(Vec2::new(0.0, 0.0));
        assert!(s.append_point(Vec2::new(0.1, 0.0)));
        assert!(s.append_point(Vec2::new(0.1, 0.2)));

        let segs = s.instances();
        assert_eq!(segs.len(), 2);
        let (a, b) = segs[1].endpoints();
        assert!(a.abs_diff_eq(Vec2::new(0.1, 0.0), 1e-6));
        assert!(b.abs_diff_eq(Vec2::new(0.1, 0.2), 1e-6));
    }

    #[test]
    fn close_points_are_dropped() {
        let mut s = Sketch::new();
        s.append_point(Vec2::new(0.0, 0.0));
        assert!(!s.append_point(Vec2::new(0.0005, -0.0005)));
        assert!(!s.append_point(Vec2::new(0.0, 0.0)));
        // One component past the threshold is enough.
        assert!(s.append_point(Vec2::new(0.002, 0.0)));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn non_finite_points_are_ignored() {
        let mut s = Sketch::new();
        s.append_point(Vec2::new(0.0, 0.0));
        assert!(!s.append_point(Vec2::new(f32::NAN, 0.0)));
        assert!(s.append_point(Vec2::new(0.5, 0.0)));
    }

    // ── strokes ───────────────────────────────────────────────────────────

    #[test]
    fn commit_starts_a_fresh_stroke() {
        let mut s = Sketch::new();
        stroke(&mut s, &[(0.0, 0.0), (0.5, 0.0)]);
        assert!(!s.is_drawing());

        // The next point does not connect to the previous stroke.
        assert!(!s.append_point(Vec2::new(0.9, 0.9)));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn taps_without_movement_are_discarded() {
        let mut s = Sketch::new();
        s.append_point(Vec2::new(0.3, 0.3));
        assert!(!s.commit_stroke());
        assert_eq!(s.stroke_count(), 0);
    }

    #[test]
    fn undo_drops_last_stroke_only() {
        let mut s = Sketch::new();
        stroke(&mut s, &[(0.0, 0.0), (0.1, 0.0)]);
        stroke(&mut s, &[(0.0, 0.5), (0.1, 0.5), (0.2, 0.5)]);
        assert_eq!(s.len(), 3);

        assert!(s.undo());
        assert_eq!(s.stroke_count(), 1);
        assert_eq!(s.len(), 1);
        assert!(s.undo());
        assert!(!s.undo());
        assert!(s.is_empty());
    }

    #[test]
    fn clear_removes_stroke_in_progress() {
        let mut s = Sketch::new();
        stroke(&mut s, &[(0.0, 0.0), (0.1, 0.0)]);
        s.append_point(Vec2::new(0.5, 0.5));
        s.append_point(Vec2::new(0.6, 0.5));
        s.clear();
        assert!(s.is_empty());
        assert!(!s.is_drawing());
        assert!(s.instances().is_empty());
    }

    #[test]
    fn instances_include_stroke_in_progress() {
        let mut s = Sketch::new();
        stroke(&mut s, &[(0.0, 0.0), (0.1, 0.0)]);
        s.append_point(Vec2::new(0.5, 0.5));
        s.append_point(Vec2::new(0.6, 0.5));
        assert_eq!(s.instances().len(), 2);
    }

    // ── capacity ──────────────────────────────────────────────────────────

    #[test]
    fn full_sketch_refuses_segments() {
        let mut s = Sketch::with_limits(MIN_POINT_DISTANCE, 2);
        s.append_point(Vec2::new(0.0, 0.0));
        assert!(s.append_point(Vec2::new(0.1, 0.0)));
        assert!(s.append_point(Vec2::new(0.2, 0.0)));
        assert!(!s.append_point(Vec2::new(0.3, 0.0)));
        assert!(!s.append_point(Vec2::new(0.4, 0.0)));
        assert_eq!(s.len(), 2);

        s.commit_stroke();
        assert!(s.undo());
        s.append_point(Vec2::new(0.0, 0.0));
        assert!(s.append_point(Vec2::new(0.1, 0.0)));
    }
}
