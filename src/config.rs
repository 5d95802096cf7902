use egui::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an optional JSON config file
pub const CONFIG_ENV_VAR: &str = "WELL_SCHEMATIC_CONFIG";

/// Tunables for the editor. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Scale multiplier applied per wheel notch
    pub zoom_factor: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Position of the first component added without a drop point
    pub stagger_base: f32,
    /// Per-component offset for components added without a drop point
    pub stagger_step: f32,
    /// Canvas size exported before the canvas is first drawn, in screen points
    pub canvas_size: Vec2,
    /// Supersampling used when rasterizing for export
    pub export_multiplier: f32,
    pub export_file_name: String,
    /// Storage slot holding the saved scene
    pub storage_key: String,
    /// Directory with `<Type>.svg` files; bundled graphics when unset
    pub asset_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom_factor: 1.05,
            min_scale: 0.1,
            max_scale: 10.0,
            stagger_base: 100.0,
            stagger_step: 20.0,
            canvas_size: Vec2::new(800.0, 800.0),
            export_multiplier: 3.0,
            export_file_name: "well-schematic.pdf".to_owned(),
            storage_key: "wellSchematic".to_owned(),
            asset_dir: None,
        }
    }
}

impl EditorConfig {
    /// Reads the file named by `WELL_SCHEMATIC_CONFIG`, if any.
    /// Unreadable or invalid files fall back to defaults.
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)).unwrap_or_else(|err| {
                log::warn!("Ignoring config {}: {}", Path::new(&path).display(), err);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zoom_factor > 1.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom_factor must be greater than 1, got {}",
                self.zoom_factor
            )));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(ConfigError::Invalid(format!(
                "scale bounds must satisfy 0 < min <= max, got {}..={}",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.export_multiplier > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "export_multiplier must be positive, got {}",
                self.export_multiplier
            )));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{ "export_multiplier": 2.0 }"#).unwrap();
        assert_eq!(config.export_multiplier, 2.0);
        assert_eq!(config.zoom_factor, 1.05);
        assert_eq!(config.storage_key, "wellSchematic");
    }

    #[test]
    fn test_rejects_inverted_scale_bounds() {
        let result = EditorConfig::from_json(r#"{ "min_scale": 5.0, "max_scale": 1.0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
