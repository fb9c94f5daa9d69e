//! Instanced capsule line renderer.
//!
//! One pipeline per [`TransformVariant`](crate::transform::TransformVariant),
//! chosen when the renderer is built. Draws are recorded into a [`LineBatch`]
//! and submitted in a single render pass; several batches may be rendered
//! into one frame.

mod batch;
mod cursor;
mod renderer;
mod ring;

pub use batch::{LineBatch, LineDraw};
pub use renderer::{LinePipelineConfig, LineRenderer};
