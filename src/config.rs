use crate::settings::LifeSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: u32 = 1;

/// Settings file for export/import. Holds preferences only, never grid contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    #[serde(default)]
    pub settings: LifeSettings,
}

impl AppConfig {
    pub fn new(settings: LifeSettings) -> Self {
        Self {
            version: CONFIG_VERSION,
            settings,
        }
    }

    /// Default location: `<config dir>/life-simulation/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("life-simulation").join("config.json"))
    }

    /// Export config to a JSON file, creating parent directories as needed
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create config directory: {}", e))?;
            }
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// Import config from a JSON file; out-of-range values are clamped
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        let mut config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.settings = config.settings.clamped();
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(LifeSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Background, CellColor, CellStyle};
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_config_file_save_and_load() {
        let config = AppConfig::new(LifeSettings {
            density: 55,
            speed: 700,
            cell_color: CellColor::Magenta,
            background: Background::Navy,
            cell_style: CellStyle::Braille,
        });

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.version, CONFIG_VERSION);
        assert_eq!(loaded.settings, config.settings);
    }

    #[test]
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        AppConfig::default().save_to_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), r#"{"version": 1, "settings": {"density": 60}}"#).unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.settings.density, 60);
        assert_eq!(loaded.settings.speed, LifeSettings::default().speed);
        assert_eq!(loaded.settings.cell_style, CellStyle::Block);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            r#"{"version": 1, "settings": {"density": 240, "speed": 5000}}"#,
        )
        .unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.settings.density, 100);
        assert_eq!(loaded.settings.speed, 990);
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/path/config.json"));
        assert!(result.is_err());
    }
}
