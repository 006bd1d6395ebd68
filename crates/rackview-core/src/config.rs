//! Canvas configuration.

use crate::snap::GRID_SIZE;
use crate::style::SerializableColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Grid size must be positive, got {0}")]
    GridSize(f64),
    #[error("Zoom bounds must be positive and finite, got {min}..{max}")]
    ZoomBounds { min: f64, max: f64 },
}

/// Interaction mode of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasMode {
    /// Components can be dragged.
    #[default]
    Edit,
    /// Read-only: components can only be selected.
    Inspection,
}

impl CanvasMode {
    pub fn is_editable(self) -> bool {
        self == CanvasMode::Edit
    }
}

/// Colors that do not depend on component status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasTheme {
    pub background: SerializableColor,
    pub grid_line: SerializableColor,
    /// Border of hovered and selected components.
    pub highlight: SerializableColor,
    pub label: SerializableColor,
    pub type_glyph: SerializableColor,
}

impl Default for CanvasTheme {
    fn default() -> Self {
        Self {
            background: SerializableColor::rgb(0xf9, 0xfa, 0xfb),
            grid_line: SerializableColor::rgb(0xf0, 0xf0, 0xf0),
            highlight: SerializableColor::rgb(0x00, 0x7b, 0xff),
            label: SerializableColor::black(),
            type_glyph: SerializableColor::rgb(0x66, 0x66, 0x66),
        }
    }
}

/// Settings for a canvas surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub grid_size: f64,
    pub mode: CanvasMode,
    pub corner_radius: f64,
    pub label_font_size: f64,
    pub theme: CanvasTheme,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            mode: CanvasMode::Edit,
            corner_radius: 4.0,
            label_font_size: 12.0,
            theme: CanvasTheme::default(),
            min_zoom: 0.5,
            max_zoom: 2.0,
        }
    }
}

impl CanvasConfig {
    /// Read-only configuration with default settings.
    pub fn inspection() -> Self {
        Self {
            mode: CanvasMode::Inspection,
            ..Self::default()
        }
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(self.min_zoom) && positive(self.max_zoom)) {
            return Err(ConfigError::ZoomBounds {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        assert_eq!(config.grid_size, 20.0);
        assert!(config.mode.is_editable());
        assert!(!CanvasConfig::inspection().mode.is_editable());
    }

    #[test]
    fn test_partial_json() {
        let config = CanvasConfig::from_json(r#"{"mode":"inspection","theme":{"highlight":{"r":0,"g":0,"b":0,"a":255}}}"#)
            .unwrap();
        assert_eq!(config.mode, CanvasMode::Inspection);
        assert_eq!(config.grid_size, 20.0);
        assert_eq!(config.theme.highlight, SerializableColor::black());
        assert_eq!(config.theme.grid_line, CanvasTheme::default().grid_line);
    }

    #[test]
    fn test_rejects_bad_grid() {
        assert!(matches!(
            CanvasConfig::from_json(r#"{"grid_size":0}"#),
            Err(ConfigError::GridSize(_))
        ));
        assert!(matches!(CanvasConfig::from_json("{"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            CanvasConfig::from_json(r#"{"min_zoom":0,"max_zoom":2}"#),
            Err(ConfigError::ZoomBounds { .. })
        ));
    }
}
