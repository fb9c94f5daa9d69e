//! Frame timing.
//!
//! - `FrameClock` produces clamped delta times, one tick per presented frame
//! - `FramePacer` turns redraw requests into redraws no closer together than
//!   a minimum interval

mod frame_clock;
mod pacer;

pub use frame_clock::{FrameClock, FrameTime};
pub use pacer::{FramePacer, PacerDecision};
