//! Per-instance settings management
//!
//! Each indicator instance keeps a small TOML file under the user config
//! directory. Loading never fails: unreadable or malformed files fall back to
//! defaults. Saving only touches `icon_size` and keeps every other key.

use super::error::IndicatorError;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default icon size in pixels
pub const DEFAULT_ICON_SIZE: u8 = 12;

/// Minimum icon size
pub const MIN_ICON_SIZE: u8 = 0;

/// Maximum icon size
pub const MAX_ICON_SIZE: u8 = 100;

/// Instance name used when none is given
pub const DEFAULT_INSTANCE: &str = "default";

/// Indicator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Free-form string, unused by the indicator itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setting1: Option<String>,

    /// Icon size in pixels
    #[serde(default = "default_icon_size", deserialize_with = "deserialize_icon_size")]
    pub icon_size: u8,

    /// Boolean flag, unused by the indicator itself
    #[serde(default)]
    pub setting3: bool,
}

fn default_icon_size() -> u8 {
    DEFAULT_ICON_SIZE
}

fn deserialize_icon_size<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(clamp_icon_size(raw))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            setting1: None,
            icon_size: default_icon_size(),
            setting3: false,
        }
    }
}

impl Settings {
    /// Set icon size with clamping to the valid range
    pub fn set_icon_size(&mut self, size: i64) {
        self.icon_size = clamp_icon_size(size);
    }
}

/// Clamp any integer into `MIN_ICON_SIZE..=MAX_ICON_SIZE`
pub fn clamp_icon_size(size: i64) -> u8 {
    size.clamp(MIN_ICON_SIZE as i64, MAX_ICON_SIZE as i64) as u8
}

/// Step an icon size the way the spin control does: past either bound it
/// wraps around to the other one.
pub fn step_icon_size(size: u8, delta: i64) -> u8 {
    let span = (MAX_ICON_SIZE - MIN_ICON_SIZE) as i64 + 1;
    let offset = (size as i64 - MIN_ICON_SIZE as i64 + delta).rem_euclid(span);
    (offset + MIN_ICON_SIZE as i64) as u8
}

/// Persistent storage for one indicator instance
pub trait SettingsStore: Send {
    /// Load settings, falling back to defaults on any failure
    fn load(&self) -> Settings;

    /// Write the icon size back to storage
    fn save(&self, settings: &Settings) -> Result<(), IndicatorError>;
}

/// Settings stored as a TOML file
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    /// Store backed by an explicit file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for a named instance under the user config directory
    pub fn for_instance(instance: &str) -> Result<Self> {
        Ok(Self::new(Self::instance_path(instance)?))
    }

    /// Get the settings file path of an instance
    pub fn instance_path(instance: &str) -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "update-indicator", "UpdateIndicator")
            .context("Failed to determine settings directory")?;
        Ok(proj_dirs
            .config_dir()
            .join("instances")
            .join(format!("{}.toml", sanitize_instance(instance))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the settings file, reporting every failure
    pub fn try_load(&self) -> Result<Settings, IndicatorError> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file: {:?}", self.path))
            .map_err(|e| IndicatorError::SettingsRead(format!("{:#}", e)))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", self.path))
            .map_err(|e| IndicatorError::SettingsRead(format!("{:#}", e)))
    }

    fn write_icon_size(&self, icon_size: u8) -> Result<()> {
        // Keep whatever else the file holds
        let mut table = match std::fs::read_to_string(&self.path) {
            Ok(content) => content.parse::<toml::Table>().unwrap_or_else(|e| {
                warn!("Replacing malformed settings file {:?}: {}", self.path, e);
                toml::Table::new()
            }),
            Err(_) => toml::Table::new(),
        };
        table.insert("icon_size".to_string(), toml::Value::Integer(icon_size as i64));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(&table).context("Failed to serialize settings")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings file: {:?}", self.path))?;

        Ok(())
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&self) -> Settings {
        if !self.path.exists() {
            debug!("No settings file at {:?}, applying defaults", self.path);
            return Settings::default();
        }

        match self.try_load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Applying default settings: {}", e);
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), IndicatorError> {
        self.write_icon_size(settings.icon_size)
            .map_err(|e| IndicatorError::SettingsWrite(format!("{:#}", e)))
    }
}

/// Keep instance names usable as file names
fn sanitize_instance(instance: &str) -> String {
    let name: String = instance
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() {
        DEFAULT_INSTANCE.to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.setting1, None);
        assert_eq!(settings.icon_size, DEFAULT_ICON_SIZE);
        assert!(!settings.setting3);
    }

    #[test]
    fn test_icon_size_clamping() {
        let mut settings = Settings::default();

        settings.set_icon_size(-5);
        assert_eq!(settings.icon_size, MIN_ICON_SIZE);

        settings.set_icon_size(500);
        assert_eq!(settings.icon_size, MAX_ICON_SIZE);

        settings.set_icon_size(40);
        assert_eq!(settings.icon_size, 40);
    }

    #[test]
    fn test_icon_size_step_wraps() {
        assert_eq!(step_icon_size(12, 1), 13);
        assert_eq!(step_icon_size(100, 1), 0);
        assert_eq!(step_icon_size(0, -1), 100);
        assert_eq!(step_icon_size(99, 3), 1);
    }

    #[test]
    fn test_parse_partial_file() {
        let settings: Settings = toml::from_str("setting3 = true\n").unwrap();
        assert_eq!(settings.icon_size, DEFAULT_ICON_SIZE);
        assert!(settings.setting3);

        let settings: Settings = toml::from_str("icon_size = 250\nsetting1 = \"x\"\n").unwrap();
        assert_eq!(settings.icon_size, MAX_ICON_SIZE);
        assert_eq!(settings.setting1.as_deref(), Some("x"));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlSettingsStore::new(dir.path().join("missing.toml"));
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_load_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "icon_size = [not toml").unwrap();

        let store = TomlSettingsStore::new(&path);
        assert!(matches!(store.try_load(), Err(IndicatorError::SettingsRead(_))));
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlSettingsStore::new(dir.path().join("nested").join("panel-1.toml"));

        let mut settings = Settings::default();
        settings.set_icon_size(40);
        store.save(&settings).unwrap();

        assert_eq!(store.load().icon_size, 40);
    }

    #[test]
    fn test_save_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.toml");
        std::fs::write(&path, "setting1 = \"keep me\"\nsetting3 = true\nicon_size = 8\n").unwrap();

        let store = TomlSettingsStore::new(&path);
        let settings = Settings {
            setting1: None,
            icon_size: 64,
            setting3: false,
        };
        store.save(&settings).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.icon_size, 64);
        assert_eq!(loaded.setting1.as_deref(), Some("keep me"));
        assert!(loaded.setting3);
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the write fail
        let path = dir.path().join("occupied");
        std::fs::create_dir(&path).unwrap();

        let store = TomlSettingsStore::new(&path);
        let result = store.save(&Settings::default());
        assert!(matches!(result, Err(IndicatorError::SettingsWrite(_))));
    }

    #[test]
    fn test_sanitize_instance() {
        assert_eq!(sanitize_instance("panel-1"), "panel-1");
        assert_eq!(sanitize_instance("../etc"), "___etc");
        assert_eq!(sanitize_instance(""), DEFAULT_INSTANCE);
    }
}
