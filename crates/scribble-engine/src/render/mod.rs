//! GPU rendering subsystem.
//!
//! `lines` draws capsule segments with one of three transform pipelines.
//! `cpu` executes the same two stages on the CPU for tests and tooling.
//!
//! Convention:
//! - instances are in world space; the transform variant maps them to clip space
//! - the viewport is the framebuffer size in physical pixels

mod ctx;

pub mod cpu;
pub mod lines;

pub use ctx::{RenderCtx, RenderTarget};
