//! Indicator state

use super::settings::Settings;

/// Label shown before the first query resolves
pub const INITIAL_LABEL: &str = "running";

/// Label shown when the query produced no output
pub const NO_OUTPUT_LABEL: &str = "no output";

/// What the indicator is currently waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing outstanding
    #[default]
    Idle,
    /// Counting pending updates
    Querying,
    /// Starting the terminal that runs the upgrade
    Launching,
    /// Waiting for the upgrade process to exit
    Upgrading,
}

impl Phase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }
}

/// The single mutable record behind the indicator
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorState {
    /// Currently shown label: a count, "no output" or an error message
    pub display_text: String,
    /// Persisted per-instance settings, including the icon size
    pub settings: Settings,
    /// Outstanding operation, if any
    pub phase: Phase,
}

impl IndicatorState {
    /// Create the start-up state from loaded settings
    pub fn new(settings: Settings) -> Self {
        Self {
            display_text: INITIAL_LABEL.to_string(),
            settings,
            phase: Phase::Idle,
        }
    }

    /// Icon size in pixels
    pub fn icon_size(&self) -> u8 {
        self.settings.icon_size
    }
}

impl Default for IndicatorState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

/// Turn raw query output into the label text.
///
/// Trailing whitespace is dropped; empty output becomes [`NO_OUTPUT_LABEL`].
pub fn label_from_output(output: Option<&str>) -> String {
    match output.map(str::trim_end) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NO_OUTPUT_LABEL.to_string(),
    }
}
