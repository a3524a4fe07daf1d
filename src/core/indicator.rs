//! The update indicator
//!
//! Owns [`IndicatorState`] and reacts to [`IndicatorEvent`]s one at a time.
//! Query and upgrade processes are awaited in spawned tasks that post their
//! result back onto the event channel, so every state change happens inside
//! [`UpdateIndicator::handle`].

use super::error::IndicatorError;
use super::events::{DialogId, EventSender, IndicatorEvent, PointerEvent, View, ViewUpdate};
use super::runner::{PackageQueryRunner, SettingsWindow, UpgradeRunner, UrlLauncher};
use super::settings::{clamp_icon_size, SettingsStore};
use super::state::{label_from_output, IndicatorState, Phase};
use crate::window::protocol::DialogMessage;
use std::ops::ControlFlow;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// External collaborators of the indicator
pub struct Collaborators {
    pub query: Box<dyn PackageQueryRunner>,
    pub upgrade: Box<dyn UpgradeRunner>,
    pub url_launcher: Box<dyn UrlLauncher>,
    pub store: Box<dyn SettingsStore>,
    pub settings_window: Box<dyn SettingsWindow>,
    pub view: Box<dyn View>,
}

/// Update-count indicator
pub struct UpdateIndicator {
    state: IndicatorState,
    parts: Collaborators,
    events: EventSender,
    help_url: String,
    /// Dialog currently shown, if any
    open_dialog: Option<DialogId>,
    next_dialog_id: DialogId,
}

impl UpdateIndicator {
    /// Create the indicator, loading its settings from the store
    pub fn new(parts: Collaborators, events: EventSender, help_url: impl Into<String>) -> Self {
        let settings = parts.store.load();
        info!("Loaded settings (icon size {} px)", settings.icon_size);

        Self {
            state: IndicatorState::new(settings),
            parts,
            events,
            help_url: help_url.into(),
            open_dialog: None,
            next_dialog_id: 1,
        }
    }

    pub fn state(&self) -> &IndicatorState {
        &self.state
    }

    pub fn is_dialog_open(&self) -> bool {
        self.open_dialog.is_some()
    }

    /// Publish the initial state and run the first query
    pub fn start(&mut self) {
        self.parts
            .view
            .apply(ViewUpdate::Label(self.state.display_text.clone()));
        self.parts
            .view
            .apply(ViewUpdate::IconSize(self.state.icon_size()));
        self.refresh();
    }

    /// Process events until shutdown
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<IndicatorEvent>) {
        self.start();

        while let Some(event) = rx.recv().await {
            if self.handle(event).is_break() {
                break;
            }
        }

        info!("Indicator stopped");
    }

    /// Apply one event
    pub fn handle(&mut self, event: IndicatorEvent) -> ControlFlow<()> {
        debug!("Indicator event: {:?}", event);

        match event {
            IndicatorEvent::Refresh => self.refresh(),
            IndicatorEvent::Activate(pointer) => self.activate(pointer),
            IndicatorEvent::RunUpgrade => self.begin_upgrade(),
            IndicatorEvent::QueryFinished(result) => self.on_query_finished(result),
            IndicatorEvent::UpgradeFinished(result) => self.on_upgrade_finished(result),
            IndicatorEvent::OpenSettings => self.open_settings(),
            IndicatorEvent::Dialog { id, message } => self.on_dialog_message(id, message),
            IndicatorEvent::DialogExited { id } => self.on_dialog_exited(id),
            IndicatorEvent::Shutdown => {
                self.shutdown();
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    /// Count pending updates unless something is already outstanding
    pub fn refresh(&mut self) {
        if !self.state.phase.is_idle() {
            info!("Ignoring refresh while {:?}", self.state.phase);
            return;
        }
        self.start_query();
    }

    fn start_query(&mut self) {
        match self.parts.query.launch() {
            Ok(completion) => {
                self.state.phase = Phase::Querying;
                let events = self.events.clone();
                tokio::spawn(async move {
                    let result = completion.await;
                    let _ = events.send(IndicatorEvent::QueryFinished(result));
                });
            }
            Err(e) => self.on_query_finished(Err(e)),
        }
    }

    fn on_query_finished(&mut self, result: Result<Option<String>, IndicatorError>) {
        self.state.phase = Phase::Idle;

        let label = match result {
            Ok(output) => {
                let label = label_from_output(output.as_deref());
                info!("Pending updates: {}", label);
                label
            }
            Err(e) => {
                error!("Couldn't count pending updates ({}): {}", e.kind(), e);
                e.to_string()
            }
        };

        self.set_display_text(label);
    }

    fn activate(&mut self, pointer: PointerEvent) {
        if !pointer.is_primary_press() {
            debug!("Ignoring {:?}", pointer);
            return;
        }
        self.begin_upgrade();
    }

    fn begin_upgrade(&mut self) {
        if !self.state.phase.is_idle() {
            info!("Ignoring upgrade request while {:?}", self.state.phase);
            return;
        }

        self.state.phase = Phase::Launching;
        match self.parts.upgrade.launch() {
            Ok(completion) => {
                info!("System upgrade launched");
                self.state.phase = Phase::Upgrading;
                let events = self.events.clone();
                tokio::spawn(async move {
                    let result = completion.await;
                    let _ = events.send(IndicatorEvent::UpgradeFinished(result));
                });
            }
            Err(e) => {
                error!("Couldn't launch the update process: {}", e);
                self.state.phase = Phase::Idle;
            }
        }
    }

    fn on_upgrade_finished(&mut self, result: Result<(), IndicatorError>) {
        self.state.phase = Phase::Idle;

        match result {
            Ok(()) => {
                info!("System upgrade finished, re-counting updates");
                self.start_query();
            }
            Err(e) => error!("Couldn't finish the system update: {}", e),
        }
    }

    fn open_settings(&mut self) {
        if self.open_dialog.is_some() {
            debug!("Settings dialog already open, presenting it");
            self.parts.settings_window.present();
            return;
        }

        let id = self.next_dialog_id;
        self.next_dialog_id += 1;

        match self
            .parts
            .settings_window
            .open(id, self.state.icon_size(), self.events.clone())
        {
            Ok(()) => self.open_dialog = Some(id),
            Err(e) => error!("Couldn't open the settings dialog: {}", e),
        }
    }

    fn on_dialog_message(&mut self, id: DialogId, message: DialogMessage) {
        if self.open_dialog != Some(id) {
            debug!("Dropping {:?} from stale dialog {}", message, id);
            return;
        }

        match message {
            DialogMessage::IconSize { value } => self.set_icon_size(value),
            DialogMessage::Help => {
                if let Err(e) = self.parts.url_launcher.open(&self.help_url) {
                    warn!("Unable to open the following url: {}: {}", self.help_url, e);
                }
            }
            DialogMessage::Close => {
                self.open_dialog = None;
                self.persist();
            }
        }
    }

    fn on_dialog_exited(&mut self, id: DialogId) {
        if self.open_dialog == Some(id) {
            warn!("Settings dialog exited without closing, settings not saved");
            self.open_dialog = None;
        }
    }

    /// Apply a new icon size right away; saving waits for the dialog to close
    pub fn set_icon_size(&mut self, size: i64) {
        let size = clamp_icon_size(size);
        if size == self.state.settings.icon_size {
            return;
        }
        self.state.settings.icon_size = size;
        self.parts.view.apply(ViewUpdate::IconSize(size));
    }

    fn set_display_text(&mut self, text: String) {
        self.state.display_text = text.clone();
        self.parts.view.apply(ViewUpdate::Label(text));
    }

    fn persist(&self) {
        match self.parts.store.save(&self.state.settings) {
            Ok(()) => debug!("Settings saved"),
            Err(e) => error!("Couldn't save settings: {}", e),
        }
    }

    fn shutdown(&mut self) {
        info!("Shutting down indicator");
        if self.open_dialog.take().is_some() {
            self.parts.settings_window.close();
        }
        self.persist();
        self.parts.view.apply(ViewUpdate::Exit);
    }
}
