//! Settings dialog window
//!
//! The dialog runs as a child process of the indicator and talks to it over
//! line-delimited JSON.

mod host;
pub mod protocol;
mod settings_dialog;

pub use host::ProcessSettingsWindow;
pub use protocol::{DialogMessage, HostMessage};
pub use settings_dialog::{render_settings_dialog, run_settings_dialog, SettingsDialog};
