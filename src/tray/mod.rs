//! Tray module - Indicator icon, label and menu
//!
//! Linux gets a GTK panel window, other platforms a native tray icon.

mod actions;
mod icon;
mod look;
#[cfg(not(target_os = "linux"))]
mod menu;
#[cfg(target_os = "linux")]
mod panel;
mod runloop;

pub use actions::{tooltip, TrayAction};
pub use icon::{decode_png, IndicatorIcon, RgbaImage};
pub use look::{LookChange, TrayLook};
#[cfg(not(target_os = "linux"))]
pub use menu::{pointer_event, TrayManager};
#[cfg(target_os = "linux")]
pub use panel::{pointer_from_gdk, PanelIndicator};
pub use runloop::run_tray_loop;
