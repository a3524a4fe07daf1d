//! Indicator event definitions

use super::error::IndicatorError;
use crate::window::protocol::DialogMessage;
use tokio::sync::mpsc;

/// Identifies one settings dialog window over its lifetime
pub type DialogId = u64;

/// Mouse button of a pointer event on the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Whether the button went down or up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Press,
    Release,
    DoublePress,
}

/// Pointer input on the indicator's clickable surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub button: PointerButton,
    pub action: PointerAction,
}

impl PointerEvent {
    pub fn new(button: PointerButton, action: PointerAction) -> Self {
        Self { button, action }
    }

    /// Map a toolkit button number (1 primary, 2 middle, 3 secondary)
    pub fn from_button_number(button: u32, action: PointerAction) -> Option<Self> {
        let button = match button {
            1 => PointerButton::Primary,
            2 => PointerButton::Middle,
            3 => PointerButton::Secondary,
            _ => return None,
        };
        Some(Self::new(button, action))
    }

    /// Only a single primary-button press starts the upgrade
    pub fn is_primary_press(&self) -> bool {
        self.button == PointerButton::Primary && self.action == PointerAction::Press
    }
}

/// Everything the indicator reacts to
#[derive(Debug, Clone)]
pub enum IndicatorEvent {
    /// Count pending updates (startup, manual re-check)
    Refresh,

    /// Pointer input on the indicator
    Activate(PointerEvent),

    /// "Update System" chosen from the menu
    RunUpgrade,

    /// Update-count command finished; `None` means it produced no output
    QueryFinished(Result<Option<String>, IndicatorError>),

    /// Upgrade process finished
    UpgradeFinished(Result<(), IndicatorError>),

    /// "Settings..." chosen from the menu
    OpenSettings,

    /// Message from a settings dialog window
    Dialog { id: DialogId, message: DialogMessage },

    /// Settings dialog process went away
    DialogExited { id: DialogId },

    /// Persist settings and stop
    Shutdown,
}

/// Sender half of the indicator event channel
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<IndicatorEvent>,
}

impl EventSender {
    pub fn new(tx: mpsc::UnboundedSender<IndicatorEvent>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: IndicatorEvent) -> Result<(), mpsc::error::SendError<IndicatorEvent>> {
        self.tx.send(event)
    }
}

/// Create the indicator event channel
pub fn channel() -> (EventSender, mpsc::UnboundedReceiver<IndicatorEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender::new(tx), rx)
}

/// State changes pushed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    /// New label text
    Label(String),
    /// Re-render the icon at this pixel size
    IconSize(u8),
    /// Indicator has shut down
    Exit,
}

/// Presentation layer observing indicator state
pub trait View: Send {
    fn apply(&self, update: ViewUpdate);
}

impl View for std::sync::mpsc::Sender<ViewUpdate> {
    fn apply(&self, update: ViewUpdate) {
        let _ = self.send(update);
    }
}

impl View for mpsc::UnboundedSender<ViewUpdate> {
    fn apply(&self, update: ViewUpdate) {
        let _ = self.send(update);
    }
}
