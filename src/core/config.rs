//! Configuration management
//!
//! Which commands count updates, run the upgrade and open the help page.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Update-count command configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Shell used to run the command
    #[serde(default = "default_shell")]
    pub shell: String,
    /// Command line printing the number of pending updates
    #[serde(default = "default_query_command")]
    pub command: String,
}

fn default_shell() -> String {
    "sh".to_string()
}

fn default_query_command() -> String {
    "zypper list-updates | wc -l".to_string()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            command: default_query_command(),
        }
    }
}

/// Upgrade command configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeConfig {
    /// Helper that opens a terminal running the command given as last argument
    #[serde(default = "default_terminal_launcher")]
    pub terminal_launcher: Vec<String>,
    /// Privileged upgrade command run inside the terminal
    #[serde(default = "default_upgrade_command")]
    pub command: String,
}

fn default_terminal_launcher() -> Vec<String> {
    vec![
        "exo-open".to_string(),
        "--launch".to_string(),
        "TerminalEmulator".to_string(),
    ]
}

fn default_upgrade_command() -> String {
    "sudo zypper dup".to_string()
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            terminal_launcher: default_terminal_launcher(),
            command: default_upgrade_command(),
        }
    }
}

/// Help link configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpConfig {
    /// Documentation URL opened from the settings dialog
    #[serde(default = "default_help_url")]
    pub url: String,
    /// Helper that opens the URL given as last argument
    #[serde(default = "default_url_launcher")]
    pub launcher: Vec<String>,
}

fn default_help_url() -> String {
    "https://docs.xfce.org/panel-plugins/xfce4-sample-plugin".to_string()
}

fn default_url_launcher() -> Vec<String> {
    vec![
        "exo-open".to_string(),
        "--launch".to_string(),
        "WebBrowser".to_string(),
    ]
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            url: default_help_url(),
            launcher: default_url_launcher(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Update-count command
    #[serde(default)]
    pub query: QueryConfig,
    /// Upgrade command
    #[serde(default)]
    pub upgrade: UpgradeConfig,
    /// Help link
    #[serde(default)]
    pub help: HelpConfig,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a file, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "update-indicator", "UpdateIndicator")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Get the default configuration embedded in the binary
    pub fn default_config_str() -> &'static str {
        include_str!("../../config/default.toml")
    }
}
