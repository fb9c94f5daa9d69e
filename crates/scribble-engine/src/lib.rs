//! Scribble engine crate.
//!
//! Instanced capsule lines on wgpu: every segment is one instance of a shared
//! quad, expanded in the vertex stage and shaded with an analytic distance in
//! the fragment stage. Three transform pipelines (matrix, pan/zoom, affine)
//! share the shading code. Also owns the platform + GPU runtime the studio
//! runs on.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod error;
pub mod geometry;
pub mod transform;
pub mod render;
pub mod scene;
