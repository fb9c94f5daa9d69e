//! Scribble studio: freehand drawing with instanced capsule lines.

mod app;
mod camera;
mod config;

use anyhow::Result;
use scribble_engine::device::GpuInit;
use scribble_engine::logging::{init_logging, LoggingConfig};
use scribble_engine::window::{Runtime, RuntimeConfig};

use crate::app::ScribbleApp;
use crate::config::{Config, ConfigSource};

fn main() -> Result<()> {
    let (config, source) = Config::load()?;

    init_logging(LoggingConfig {
        env_filter: config.logging.filter(),
        ..Default::default()
    });

    match &source {
        ConfigSource::File(_) => log::info!("config: {source}"),
        ConfigSource::Embedded(_) => log::warn!("config: {source}"),
    }
    log::info!(
        "pipeline: {}, thickness {}, aa border {} px",
        config.lines.variant.label(),
        config.lines.thickness,
        config.lines.aa_border_px
    );

    let runtime = RuntimeConfig {
        title: config.window.title.clone(),
        width: config.window.width as f64,
        height: config.window.height as f64,
        min_frame_interval: config.frame.min_interval(),
    };

    let gpu = GpuInit {
        validation: config.gpu.validation,
        prefer_srgb: config.gpu.prefer_srgb,
        ..GpuInit::default()
    }
    .with_vsync(config.gpu.vsync);

    let app = ScribbleApp::new(config.window.title, config.lines);
    Runtime::run(runtime, gpu, app)
}
