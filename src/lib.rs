//! Update Indicator
//!
//! A system tray indicator that shows how many package updates are pending.
//!
//! # Features
//! - Counts pending updates with `zypper list-updates | wc -l`
//! - Shows the count as the tray label
//! - Left click launches `sudo zypper dup` in a terminal, then counts again
//! - Settings dialog for the icon size, persisted per instance
//! - About dialog from the tray menu

pub mod core;
pub mod process;
pub mod tray;
pub mod window;

pub use crate::core::config::Config;
pub use crate::core::error::IndicatorError;
pub use crate::core::events::IndicatorEvent;
pub use crate::core::indicator::{Collaborators, UpdateIndicator};
pub use crate::core::settings::{Settings, TomlSettingsStore};
pub use crate::core::state::IndicatorState;
