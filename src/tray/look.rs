//! What the indicator currently looks like
//!
//! Backends fold [`ViewUpdate`]s into a [`TrayLook`] and draw from it. The
//! label never depends on the icon size.

use super::icon::{IndicatorIcon, RgbaImage};
use crate::core::events::ViewUpdate;
use crate::core::state::INITIAL_LABEL;

/// Label and icon to display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayLook {
    pub label: String,
    /// `None` when the icon size is 0
    pub icon: Option<RgbaImage>,
}

impl Default for TrayLook {
    fn default() -> Self {
        Self {
            label: INITIAL_LABEL.to_string(),
            icon: None,
        }
    }
}

/// Which part of the look an update touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookChange {
    Label,
    Icon,
    Nothing,
}

impl TrayLook {
    pub fn apply(&mut self, icon: &IndicatorIcon, update: &ViewUpdate) -> LookChange {
        match update {
            ViewUpdate::Label(text) => {
                self.label = text.clone();
                LookChange::Label
            }
            ViewUpdate::IconSize(size) => {
                self.icon = icon.image(*size);
                LookChange::Icon
            }
            ViewUpdate::Exit => LookChange::Nothing,
        }
    }

    /// Icon for hosts that hide the label without one: a transparent pixel
    /// stands in at size 0
    pub fn icon_or_placeholder(&self) -> RgbaImage {
        self.icon.clone().unwrap_or_else(|| RgbaImage::transparent(1))
    }
}
