use crate::export::DEFAULT_OUTPUT;
use crate::geometry::LayoutGeometry;
use crate::resolver::DEFAULT_GLYPH_BASE;
use crate::RenderError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Background image used when none is configured
pub const DEFAULT_BACKGROUND: &str = "background.png";

/// Everything that can be configured about a plate. Every field is optional
/// in the JSON form and falls back to the reference values:
///
/// ```json
/// {
///     "geometry": { "anchor_x": 127.2, "glyph_height": 12.0 },
///     "glyph_base": "glyphs/",
///     "background": "background.png",
///     "output": "layout.pdf"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geometry: LayoutGeometry,
    /// Directory or URL the glyph images live under
    pub glyph_base: String,
    /// Locator of the background image
    pub background: String,
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            geometry: LayoutGeometry::default(),
            glyph_base: DEFAULT_GLYPH_BASE.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl Config {
    /// Parse a JSON configuration and check its geometry
    pub fn from_json(json: &str) -> Result<Config, RenderError> {
        let config: Config = serde_json::from_str(json)?;
        config.geometry.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, RenderError> {
        let json = std::fs::read_to_string(path)?;
        Config::from_json(&json)
    }
}
