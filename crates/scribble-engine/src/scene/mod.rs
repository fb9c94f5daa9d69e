//! Scene data fed to the line renderer.

mod sketch;

pub use sketch::Sketch;
