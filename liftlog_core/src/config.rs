//! Configuration file support for liftlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftlog/config.toml`.

use crate::types::{Equipment, ExerciseCategory, MuscleGroup};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Workout session defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Rest time given to newly added exercises
    #[serde(default = "default_rest_seconds")]
    pub default_rest_seconds: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_rest_seconds: default_rest_seconds(),
        }
    }
}

/// Session store behaviour
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Extra attempts after a failed write before giving up
    #[serde(default = "default_write_retries")]
    pub write_retries: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            write_retries: default_write_retries(),
        }
    }
}

/// Reporting defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_range_days")]
    pub default_range_days: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_range_days: default_range_days(),
        }
    }
}

/// User-defined exercise added to the built-in catalog
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomExercise {
    pub id: String,
    pub name: String,
    #[serde(default = "default_category")]
    pub category: ExerciseCategory,
    #[serde(default = "default_equipment")]
    pub equipment: Equipment,
    #[serde(default)]
    pub muscle_groups: Vec<MuscleGroup>,
}

/// Catalog extensions
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub custom: Vec<CustomExercise>,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("liftlog")
}

fn default_rest_seconds() -> u32 {
    90
}

fn default_write_retries() -> u32 {
    2
}

fn default_range_days() -> u32 {
    30
}

fn default_category() -> ExerciseCategory {
    ExerciseCategory::Strength
}

fn default_equipment() -> Equipment {
    Equipment::Bodyweight
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values that would make the rest of the system misbehave
    pub fn validate(&self) -> Result<()> {
        if i64::from(self.session.default_rest_seconds) > crate::types::MAX_REST_SECONDS {
            return Err(Error::Config(format!(
                "session.default_rest_seconds must be at most {}",
                crate::types::MAX_REST_SECONDS
            )));
        }
        if self.report.default_range_days == 0
            || self.report.default_range_days > crate::types::MAX_RANGE_DAYS
        {
            return Err(Error::Config(format!(
                "report.default_range_days must be between 1 and {}",
                crate::types::MAX_RANGE_DAYS
            )));
        }
        for custom in &self.catalog.custom {
            if custom.id.trim().is_empty() || custom.name.trim().is_empty() {
                return Err(Error::Config(
                    "custom exercises need a non-empty id and name".into(),
                ));
            }
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("liftlog").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.session.default_rest_seconds, 90);
        assert_eq!(config.storage.write_retries, 2);
        assert_eq!(config.report.default_range_days, 30);
        assert!(config.catalog.custom.is_empty());
        assert!(config.data.data_dir.ends_with("liftlog"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.session.default_rest_seconds = 120;
        config.save_to(&path).unwrap();

        let parsed = Config::load_from(&path).unwrap();
        assert_eq!(parsed.session.default_rest_seconds, 120);
        assert_eq!(parsed.data.data_dir, config.data.data_dir);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[report]
default_range_days = 90

[[catalog.custom]]
id = "sled_push"
name = "Sled Push"
equipment = "machine"
muscle_groups = ["quadriceps", "glutes"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.report.default_range_days, 90);
        assert_eq!(config.session.default_rest_seconds, 90); // default
        assert_eq!(config.catalog.custom.len(), 1);
        let sled = &config.catalog.custom[0];
        assert_eq!(sled.category, ExerciseCategory::Strength);
        assert_eq!(sled.equipment, Equipment::Machine);
        assert_eq!(sled.muscle_groups.len(), 2);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[report]\ndefault_range_days = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Config);

        std::fs::write(&path, "[report]\ndefault_range_days = 200000000\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Config);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[session\ndefault_rest_seconds = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Config);
    }
}
