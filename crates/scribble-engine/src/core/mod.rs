//! Contract between the runtime (platform loop) and the application.
//!
//! Applications see engine types only: input events, frame timing and a
//! render entry point with a ready device, queue and target.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
