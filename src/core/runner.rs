//! Seams between the indicator and the outside world
//!
//! Launching and completing are separate steps: `launch` reports whether the
//! process could be started at all, and the returned future resolves when it
//! has finished.

use super::error::IndicatorError;
use super::events::{DialogId, EventSender};
use futures_util::future::BoxFuture;

/// Completion of a started update-count command
pub type QueryCompletion = BoxFuture<'static, Result<Option<String>, IndicatorError>>;

/// Completion of a started upgrade
pub type UpgradeCompletion = BoxFuture<'static, Result<(), IndicatorError>>;

/// Counts pending package updates
pub trait PackageQueryRunner: Send + Sync {
    /// Start the command; the future yields its captured stdout
    fn launch(&self) -> Result<QueryCompletion, IndicatorError>;
}

/// Runs the privileged upgrade in a user-visible terminal
pub trait UpgradeRunner: Send + Sync {
    /// Start the terminal; the future yields once the process has exited
    fn launch(&self) -> Result<UpgradeCompletion, IndicatorError>;
}

/// Opens URLs with an external helper, fire and forget
pub trait UrlLauncher: Send + Sync {
    fn open(&self, url: &str) -> Result<(), IndicatorError>;
}

/// Host of the settings dialog window
pub trait SettingsWindow: Send {
    /// Show a new dialog; its messages arrive as indicator events tagged `id`
    fn open(&mut self, id: DialogId, icon_size: u8, events: EventSender) -> Result<(), IndicatorError>;

    /// Bring the open dialog to the front
    fn present(&mut self);

    /// Close the open dialog without further messages
    fn close(&mut self);
}
