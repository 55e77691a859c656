//! Style settings, read from an optional TOML file and command line flags.

use crate::error::ConvertError;
use crate::style::{resolve_font, Color, FontRegistry, RenderParams};

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_FONT: &str = "Helvetica";
pub const DEFAULT_FONT_SIZE: u32 = 50;
pub const DEFAULT_FONT_COLOR: &str = "#FFFFFF";
pub const DEFAULT_STROKE_COLOR: &str = "#000000";
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_POSITION: f64 = -450.0;

/// Style file format. Every field is optional.
///
/// ```toml
/// font_name = "PingFang SC"
/// font_size = 60
/// font_color = "#FFFFFF"
/// stroke_color = "#000000"
/// stroke_width = 3
/// position = -420
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    pub font_name: Option<String>,
    pub font_size: Option<u32>,
    pub font_color: Option<String>,
    pub stroke_color: Option<String>,
    pub stroke_width: Option<f64>,
    pub position: Option<f64>,
}

impl StyleConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to open style file: '{}'", path.display()))?;
        Self::from_toml(&content)
            .context(format!("Failed to read style file: '{}'", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Fields set in `other` take precedence.
    pub fn merge(self, other: StyleConfig) -> StyleConfig {
        StyleConfig {
            font_name: other.font_name.or(self.font_name),
            font_size: other.font_size.or(self.font_size),
            font_color: other.font_color.or(self.font_color),
            stroke_color: other.stroke_color.or(self.stroke_color),
            stroke_width: other.stroke_width.or(self.stroke_width),
            position: other.position.or(self.position),
        }
    }

    /// Fill in defaults, check the font and parse the colors.
    pub fn resolve(
        &self,
        file_name: &str,
        fonts: &dyn FontRegistry,
    ) -> Result<RenderParams, ConvertError> {
        let font_name = self.font_name.as_deref().unwrap_or(DEFAULT_FONT);
        let font_color = self.font_color.as_deref().unwrap_or(DEFAULT_FONT_COLOR);
        let stroke_color = self.stroke_color.as_deref().unwrap_or(DEFAULT_STROKE_COLOR);

        Ok(RenderParams {
            file_name: file_name.to_string(),
            font_name: resolve_font(fonts, font_name),
            font_size: self.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            font_color: Color::from_hex(font_color)?,
            stroke_color: Color::from_hex(stroke_color)?,
            stroke_width: self.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH),
            position: self.position.unwrap_or(DEFAULT_POSITION),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AnyFont;

    impl FontRegistry for AnyFont {
        fn has_family(&self, _: &str) -> bool {
            true
        }
    }

    #[test]
    fn defaults() {
        let params = StyleConfig::default().resolve("movie", &AnyFont).unwrap();
        assert_eq!(params.file_name, "movie");
        assert_eq!(params.font_name, "Helvetica");
        assert_eq!(params.font_size, 50);
        assert_eq!(params.font_color.to_string(), "1.0000 1.0000 1.0000 1");
        assert_eq!(params.stroke_color.to_string(), "0.0000 0.0000 0.0000 1");
        assert_eq!(params.stroke_width, 2.0);
        assert_eq!(params.position, -450.0);
    }

    #[test]
    fn reads_toml() {
        let cfg = StyleConfig::from_toml(
            "font_name = \"PingFang SC\"\nfont_size = 60\nstroke_width = 3.5\nposition = -420.0\n",
        )
        .unwrap();
        assert_eq!(cfg.font_name.as_deref(), Some("PingFang SC"));
        assert_eq!(cfg.font_size, Some(60));
        assert_eq!(cfg.stroke_width, Some(3.5));
        assert_eq!(cfg.font_color, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(StyleConfig::from_toml("colour = \"#FFFFFF\"\n").is_err());
    }

    #[test]
    fn flags_override_file() {
        let file = StyleConfig {
            font_name: Some("Arial".to_string()),
            font_size: Some(40),
            ..StyleConfig::default()
        };
        let flags = StyleConfig {
            font_size: Some(72),
            ..StyleConfig::default()
        };
        let merged = file.merge(flags);
        assert_eq!(merged.font_name.as_deref(), Some("Arial"));
        assert_eq!(merged.font_size, Some(72));
    }

    #[test]
    fn bad_color_fails_resolution() {
        let cfg = StyleConfig {
            font_color: Some("#12".to_string()),
            ..StyleConfig::default()
        };
        assert!(matches!(
            cfg.resolve("x", &AnyFont),
            Err(ConvertError::InvalidColor(_))
        ));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.toml");
        std::fs::write(&path, "font_color = \"#FF0000\"\n").unwrap();
        let cfg = StyleConfig::load(&path).unwrap();
        assert_eq!(cfg.font_color.as_deref(), Some("#FF0000"));
        assert!(StyleConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
