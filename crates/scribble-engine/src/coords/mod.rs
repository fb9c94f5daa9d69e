//! Coordinate and geometry types shared across the engine and the studio.
//!
//! Spaces used by the line pipeline:
//! - world: the space instances live in; stage 2 measures distance here
//! - clip: homogeneous output of a transform variant (NDC after the w divide,
//!   +Y up)
//! - pixels: physical framebuffer pixels, origin top-left, +Y down
//!
//! Matrices are `glam`'s column-major `Mat3`/`Mat4`, matching WGSL memory
//! layout.

mod affine;
mod color;
mod vec2;
mod viewport;

pub use affine::embed_affine_2d;
pub use color::Color;
pub use glam::{Mat3, Mat4};
pub use vec2::Vec2;
pub use viewport::Viewport;
