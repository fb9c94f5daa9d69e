use std::time::{Duration, Instant};

/// What the event loop should do about redrawing.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PacerDecision {
    /// Nothing requested; sleep until the next event.
    Idle,
    /// Request a redraw now.
    RedrawNow,
    /// A redraw is pending but too soon; wake at this instant.
    WaitUntil(Instant),
}

/// Redraw-on-demand with a minimum interval between frames.
#[derive(Debug, Clone)]
pub struct FramePacer {
    min_interval: Duration,
    last_frame: Option<Instant>,
    pending: bool,
}

impl FramePacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_frame: None,
            pending: false,
        }
    }

    #[inline]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn request(&mut self) {
        self.pending = true;
    }

    /// Decides at `now`. A `RedrawNow` consumes the pending request.
    pub fn poll(&mut self, now: Instant) -> PacerDecision {
        if !self.pending {
            return PacerDecision::Idle;
        }
        match self.last_frame {
            Some(last) if now < last + self.min_interval => {
                PacerDecision::WaitUntil(last + self.min_interval)
            }
            _ => {
                self.pending = false;
                PacerDecision::RedrawNow
            }
        }
    }

    /// Records that a frame was presented at `now`.
    pub fn frame_presented(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(Duration::from_micros(16_667))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_until_requested() {
        let mut pacer = FramePacer::default();
        assert_eq!(pacer.poll(Instant::now()), PacerDecision::Idle);
    }

    #[test]
    fn first_request_redraws_immediately() {
        let mut pacer = FramePacer::default();
        pacer.request();
        assert_eq!(pacer.poll(Instant::now()), PacerDecision::RedrawNow);
        assert!(!pacer.is_pending());
    }

    #[test]
    fn requests_inside_the_interval_wait() {
        let mut pacer = FramePacer::new(Duration::from_millis(16));
        let t0 = Instant::now();
        pacer.frame_presented(t0);

        pacer.request();
        let due = t0 + Duration::from_millis(16);
        assert_eq!(pacer.poll(t0 + Duration::from_millis(5)), PacerDecision::WaitUntil(due));
        assert!(pacer.is_pending());
        assert_eq!(pacer.poll(due), PacerDecision::RedrawNow);
    }

    #[test]
    fn many_requests_coalesce_into_one_frame() {
        let mut pacer = FramePacer::new(Duration::from_millis(16));
        for _ in 0..10 {
            pacer.request();
        }
        assert_eq!(pacer.poll(Instant::now()), PacerDecision::RedrawNow);
        assert_eq!(pacer.poll(Instant::now()), PacerDecision::Idle);
    }
}
