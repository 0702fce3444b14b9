use std::path::Path;

use log::{info, warn};

/// Environment variable naming a JSON file whose values override the stored settings
pub const SETTINGS_ENV: &str = "PATHFIND_SETTINGS";

/// We derive Deserialize/Serialize so we can persist the settings on shutdown.
/// The grid itself is never stored.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Settings {
    pub rows: usize,
    /// side length of the square drawing area in pixels
    pub window_width: u32,
    /// how many redraw steps the search advances per UI frame
    pub steps_per_frame: usize,
    pub auto_step: bool,
    pub draw_grid_lines: bool,
    pub draw_neighbors: bool,
    pub replay_failed_branch: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: 50,
            window_width: 800,
            steps_per_frame: 1,
            auto_step: true,
            draw_grid_lines: true,
            draw_neighbors: false,
            replay_failed_branch: true,
        }
    }
}

impl Settings {
    pub fn cell_width(&self) -> u32 {
        (self.window_width / self.rows.max(1) as u32).max(1)
    }

    pub fn from_json(text: &str) -> Result<Self, anyhow::Error> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validated()
    }

    pub fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Applies the override file named by [`SETTINGS_ENV`], if any. Errors are logged and the
    /// current settings are kept.
    pub fn with_env_override(self) -> Self {
        let Ok(path) = std::env::var(SETTINGS_ENV) else {
            return self;
        };

        match Self::load(Path::new(&path)) {
            Ok(settings) => {
                info!("loaded settings from {}", path);
                settings
            }
            Err(e) => {
                warn!("ignoring settings file {}: {}", path, e);
                self
            }
        }
    }

    fn validated(self) -> Result<Self, anyhow::Error> {
        if self.rows == 0 {
            return Err(anyhow::anyhow!("rows must be at least 1"));
        }
        if self.window_width < self.rows as u32 {
            return Err(anyhow::anyhow!(
                "window_width {} is too small for {} rows",
                self.window_width,
                self.rows
            ));
        }
        if self.steps_per_frame == 0 {
            return Err(anyhow::anyhow!("steps_per_frame must be at least 1"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_defaults_match_original_window() {
        let settings = Settings::default();
        assert_eq!(settings.rows, 50);
        assert_eq!(settings.cell_width(), 16);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "rows": 20, "auto_step": false }"#).unwrap();
        assert_eq!(settings.rows, 20);
        assert!(!settings.auto_step);
        assert_eq!(settings.window_width, 800);
        assert_eq!(settings.cell_width(), 40);
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(Settings::from_json(r#"{ "rows": 0 }"#).is_err());
        assert!(Settings::from_json(r#"{ "rows": 100, "window_width": 50 }"#).is_err());
        assert!(Settings::from_json(r#"{ "steps_per_frame": 0 }"#).is_err());
        assert!(Settings::from_json("rows = 3").is_err());
    }
}
