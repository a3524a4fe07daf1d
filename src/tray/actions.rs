//! Menu actions and about information shared by every tray backend

use crate::core::events::IndicatorEvent;

/// Program name shown in the tooltip and about dialog
pub const PROGRAM_NAME: &str = "Update Indicator";

/// Documentation page shown in the about dialog
pub const WEBSITE: &str = "https://docs.xfce.org/panel-plugins/xfce4-sample-plugin";

pub const COMMENTS: &str = "Shows pending package updates and runs the system upgrade";

pub const AUTHORS: &[&str] = &["Xfce development team <xfce4-dev@xfce.org>"];

/// Tray menu actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    /// Run the system upgrade
    UpdateSystem,
    /// Count pending updates again
    CheckForUpdates,
    /// Open settings
    OpenSettings,
    /// Quit application
    Quit,
}

impl TrayAction {
    /// Indicator event this action stands for
    pub fn event(self) -> IndicatorEvent {
        match self {
            TrayAction::UpdateSystem => IndicatorEvent::RunUpgrade,
            TrayAction::CheckForUpdates => IndicatorEvent::Refresh,
            TrayAction::OpenSettings => IndicatorEvent::OpenSettings,
            TrayAction::Quit => IndicatorEvent::Shutdown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrayAction::UpdateSystem => "Update System",
            TrayAction::CheckForUpdates => "Check for Updates",
            TrayAction::OpenSettings => "Settings...",
            TrayAction::Quit => "Quit",
        }
    }
}

pub fn tooltip(label: &str) -> String {
    format!("{} - pending updates: {}", PROGRAM_NAME, label)
}
