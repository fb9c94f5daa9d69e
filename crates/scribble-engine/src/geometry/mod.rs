//! Shared geometry for the two line stages.
//!
//! Everything here is a pure function of its inputs and mirrors the WGSL in
//! `render/shaders/line.wgsl`, so the CPU rasterizer and the tests exercise
//! the same math the GPU runs.

mod capsule;
mod coverage;
mod instance;
mod quad;
mod style;

pub use capsule::{capsule_distance, nearest_on_segment};
pub use coverage::{aa_band, coverage, smoothstep, AA_BORDER};
pub use instance::LineInstance;
pub use quad::{expand_vertex, QuadVertex, QUAD_INDICES, QUAD_VERTICES};
pub use style::LineStyle;
