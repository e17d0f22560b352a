//! Render configuration loaded from JSON

use std::path::Path;
use std::sync::Arc;

use figcanvas_text::{
    DynFontCache, FontCache, FontLoader, SystemFontLoader, DEFAULT_FONT_CACHE_CAPACITY,
};
use serde::Deserialize;

use crate::error::Result;

/// Knobs for a render session
///
/// Every field is optional in the JSON form; missing ones take the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Figure resolution before the device pixel ratio is applied
    pub dpi: f32,
    /// Multiplier applied to `dpi` for the duration of a pass
    pub device_pixel_ratio: f32,
    pub font_cache_capacity: usize,
    /// Report font discovery at `trace` instead of `debug`
    pub quiet_font_lookup: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: 100.0,
            device_pixel_ratio: 2.0,
            font_cache_capacity: DEFAULT_FONT_CACHE_CAPACITY,
            quiet_font_lookup: true,
        }
    }
}

impl RenderConfig {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Font cache over `loader` sized by this configuration
    pub fn font_cache(&self, loader: Arc<dyn FontLoader>) -> DynFontCache {
        FontCache::with_capacity(loader, self.font_cache_capacity)
    }

    /// Font cache backed by the fonts installed on this system
    pub fn system_font_cache(&self) -> DynFontCache {
        let loader = SystemFontLoader::new().quiet(self.quiet_font_lookup);
        self.font_cache(Arc::new(loader))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.dpi, 100.0);
        assert_eq!(config.device_pixel_ratio, 2.0);
        assert_eq!(config.font_cache_capacity, 50);
        assert!(config.quiet_font_lookup);
    }

    #[test]
    fn json_overrides_only_named_fields() {
        let config = RenderConfig::from_json(r#"{ "dpi": 72, "font_cache_capacity": 8 }"#)
            .expect("valid config");
        assert_eq!(config.dpi, 72.0);
        assert_eq!(config.font_cache_capacity, 8);
        assert_eq!(config.device_pixel_ratio, 2.0);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = RenderConfig::from_json("{ dpi: }").unwrap_err();
        assert!(matches!(err, crate::RenderError::Config(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = RenderConfig::from_path(Path::new("/nonexistent/figcanvas.json")).unwrap_err();
        assert!(matches!(err, crate::RenderError::ConfigRead(_)));
    }
}
