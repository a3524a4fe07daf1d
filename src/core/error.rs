//! Error kinds raised by the indicator and its collaborators

use thiserror::Error;

/// Failures of the query, upgrade, settings and helper operations.
///
/// `Display` is the bare underlying message: query failures are shown to the
/// user verbatim as the indicator label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    /// The update-count command could not be started
    #[error("{0}")]
    QueryLaunch(String),

    /// The update-count command started but its output could not be collected
    #[error("{0}")]
    QueryCompletion(String),

    /// The terminal running the upgrade could not be started
    #[error("{0}")]
    UpgradeLaunch(String),

    /// The upgrade process failed or exited unsuccessfully
    #[error("{0}")]
    UpgradeCompletion(String),

    /// Settings file could not be read or parsed
    #[error("{0}")]
    SettingsRead(String),

    /// Settings file could not be written
    #[error("{0}")]
    SettingsWrite(String),

    /// The documentation URL could not be opened
    #[error("{0}")]
    HelpLaunch(String),

    /// The settings dialog window could not be started
    #[error("{0}")]
    DialogLaunch(String),
}

impl IndicatorError {
    /// Short label for the operation that failed, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            IndicatorError::QueryLaunch(_) => "query launch",
            IndicatorError::QueryCompletion(_) => "query completion",
            IndicatorError::UpgradeLaunch(_) => "upgrade launch",
            IndicatorError::UpgradeCompletion(_) => "upgrade completion",
            IndicatorError::SettingsRead(_) => "settings read",
            IndicatorError::SettingsWrite(_) => "settings write",
            IndicatorError::HelpLaunch(_) => "help launch",
            IndicatorError::DialogLaunch(_) => "dialog launch",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_message() {
        let err = IndicatorError::QueryLaunch("command not found".to_string());
        assert_eq!(err.to_string(), "command not found");
        assert_eq!(err.kind(), "query launch");
    }
}
