use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use scribble_engine::coords::Color;
use scribble_engine::transform::TransformVariant;
use serde::Deserialize;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "SCRIBBLE_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub window: WindowConfig,
    pub gpu: GpuConfig,
    pub lines: LinesConfig,
    pub frame: FrameConfig,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GpuConfig {
    pub validation: bool,
    pub vsync: bool,
    pub prefer_srgb: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinesConfig {
    pub variant: TransformVariant,
    pub thickness: f32,
    pub aa_border_px: f32,
    pub color: Color,
    pub background: Color,
    pub min_point_distance: f32,
    pub max_instances: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FrameConfig {
    pub min_interval_ms: f64,
}

impl FrameConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_secs_f64(self.min_interval_ms / 1000.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub filter: String,
}

impl LoggingSection {
    /// The configured filter, if any.
    pub fn filter(&self) -> Option<String> {
        let f = self.filter.trim();
        (!f.is_empty()).then(|| f.to_string())
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    /// Embedded defaults, with the reason the file was not used.
    Embedded(String),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Embedded(reason) => write!(f, "embedded defaults ({reason})"),
        }
    }
}

impl Config {
    /// Reads `config.toml` from the working directory, or the file named by
    /// `SCRIBBLE_CONFIG`, falling back to the embedded defaults when it cannot
    /// be read. A file that exists but does not parse or validate is an error.
    pub fn load() -> Result<(Self, ConfigSource)> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("config.toml"));

        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let config = Self::parse(&text)
                    .with_context(|| format!("invalid config file {}", path.display()))?;
                Ok((config, ConfigSource::File(path)))
            }
            Err(err) => {
                let reason = format!("{}: {err}", path.display());
                Ok((Self::embedded()?, ConfigSource::Embedded(reason)))
            }
        }
    }

    pub fn embedded() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG).context("embedded config.toml is invalid")
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.window.width > 0 && self.window.height > 0,
            "window size must be nonzero, got {}x{}",
            self.window.width,
            self.window.height
        );

        let lines = &self.lines;
        anyhow::ensure!(
            lines.thickness > 0.0 && lines.thickness.is_finite(),
            "lines.thickness must be positive, got {}",
            lines.thickness
        );
        anyhow::ensure!(
            lines.aa_border_px > 0.0 && lines.aa_border_px.is_finite(),
            "lines.aa_border_px must be positive, got {}",
            lines.aa_border_px
        );
        anyhow::ensure!(
            lines.min_point_distance >= 0.0 && lines.min_point_distance.is_finite(),
            "lines.min_point_distance must be non-negative, got {}",
            lines.min_point_distance
        );
        anyhow::ensure!(lines.max_instances > 0, "lines.max_instances must be nonzero");
        anyhow::ensure!(
            lines.color.is_finite() && lines.background.is_finite(),
            "colors must be finite"
        );

        anyhow::ensure!(
            self.frame.min_interval_ms >= 0.0 && self.frame.min_interval_ms.is_finite(),
            "frame.min_interval_ms must be non-negative, got {}",
            self.frame.min_interval_ms
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let config = Config::embedded().unwrap();
        assert_eq!(config.window.title, "Scribble");
        assert_eq!(config.lines.variant, TransformVariant::PanZoom);
        assert_eq!(config.lines.max_instances, 1 << 20);
        assert_eq!(config.logging.filter(), None);
        assert!((config.frame.min_interval().as_secs_f64() - 0.016667).abs() < 1e-9);
    }

    #[test]
    fn variants_parse_in_snake_case() {
        for (name, variant) in [
            ("matrix", TransformVariant::Matrix),
            ("pan_zoom", TransformVariant::PanZoom),
            ("affine", TransformVariant::Affine),
        ] {
            let text = DEFAULT_CONFIG.replace("variant = \"pan_zoom\"", &format!("variant = \"{name}\""));
            assert_eq!(Config::parse(&text).unwrap().lines.variant, variant);
        }
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let text = DEFAULT_CONFIG.replace("variant = \"pan_zoom\"", "variant = \"perspective\"");
        assert!(Config::parse(&text).is_err());
    }

    #[test]
    fn non_positive_thickness_is_rejected() {
        let text = DEFAULT_CONFIG.replace("thickness = 0.005", "thickness = 0.0");
        let err = Config::parse(&text).unwrap_err();
        assert!(format!("{err:#}").contains("thickness"));
    }

    #[test]
    fn logging_section_is_optional() {
        let i = DEFAULT_CONFIG.find("[logging]").unwrap();
        let config = Config::parse(&DEFAULT_CONFIG[..i]).unwrap();
        assert_eq!(config.logging, LoggingSection::default());
    }

    #[test]
    fn logging_filter_is_trimmed() {
        let section = LoggingSection {
            filter: "  scribble_engine=debug ".to_string(),
        };
        assert_eq!(section.filter().as_deref(), Some("scribble_engine=debug"));
    }

    #[test]
    fn source_reports_fallback_reason() {
        let source = ConfigSource::Embedded("config.toml: not found".to_string());
        assert_eq!(source.to_string(), "embedded defaults (config.toml: not found)");
    }
}
