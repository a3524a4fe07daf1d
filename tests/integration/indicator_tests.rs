//! Indicator integration tests
//!
//! Drive [`UpdateIndicator`] through its event channel with scripted query
//! and upgrade runners and a real settings file.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use update_indicator::core::events::{
    self, DialogId, EventSender, PointerAction, PointerButton, PointerEvent, ViewUpdate,
};
use update_indicator::core::runner::{
    PackageQueryRunner, QueryCompletion, SettingsWindow, UpgradeCompletion, UpgradeRunner,
    UrlLauncher,
};
use update_indicator::core::settings::SettingsStore;
use update_indicator::core::state::Phase;
use update_indicator::window::DialogMessage;
use update_indicator::{
    Collaborators, IndicatorError, IndicatorEvent, TomlSettingsStore, UpdateIndicator,
};

type QueryOutcome = Result<Option<String>, IndicatorError>;
type UpgradeOutcome = Result<Result<(), IndicatorError>, IndicatorError>;

/// Query runner answering from a script, one entry per launch
#[derive(Clone, Default)]
struct ScriptedQuery {
    script: Arc<Mutex<VecDeque<QueryOutcome>>>,
    launches: Arc<Mutex<usize>>,
}

impl ScriptedQuery {
    fn push(&self, outcome: QueryOutcome) {
        self.script.lock().unwrap().push_back(outcome);
    }

    fn launches(&self) -> usize {
        *self.launches.lock().unwrap()
    }
}

impl PackageQueryRunner for ScriptedQuery {
    fn launch(&self) -> Result<QueryCompletion, IndicatorError> {
        *self.launches.lock().unwrap() += 1;
        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Some("0\n".to_string())));

        match outcome {
            Err(e @ IndicatorError::QueryLaunch(_)) => Err(e),
            other => Ok(Box::pin(futures_util::future::ready(other))),
        }
    }
}

/// Upgrade runner answering from a script: outer result is the launch,
/// inner result the completion
#[derive(Clone, Default)]
struct ScriptedUpgrade {
    script: Arc<Mutex<VecDeque<UpgradeOutcome>>>,
    launches: Arc<Mutex<usize>>,
}

impl ScriptedUpgrade {
    fn push(&self, outcome: UpgradeOutcome) {
        self.script.lock().unwrap().push_back(outcome);
    }

    fn launches(&self) -> usize {
        *self.launches.lock().unwrap()
    }
}

impl UpgradeRunner for ScriptedUpgrade {
    fn launch(&self) -> Result<UpgradeCompletion, IndicatorError> {
        *self.launches.lock().unwrap() += 1;
        let outcome = self.script.lock().unwrap().pop_front().unwrap_or(Ok(Ok(())));
        let completion = outcome?;
        Ok(Box::pin(futures_util::future::ready(completion)))
    }
}

#[derive(Clone, Default)]
struct RecordingLauncher(Arc<Mutex<Vec<String>>>);

impl UrlLauncher for RecordingLauncher {
    fn open(&self, url: &str) -> Result<(), IndicatorError> {
        self.0.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct RecordingWindow {
    opened: Arc<Mutex<Vec<DialogId>>>,
    presented: Arc<Mutex<usize>>,
}

impl RecordingWindow {
    fn last_id(&self) -> DialogId {
        *self.opened.lock().unwrap().last().unwrap()
    }
}

impl SettingsWindow for RecordingWindow {
    fn open(&mut self, id: DialogId, _icon_size: u8, _events: EventSender) -> Result<(), IndicatorError> {
        self.opened.lock().unwrap().push(id);
        Ok(())
    }

    fn present(&mut self) {
        *self.presented.lock().unwrap() += 1;
    }

    fn close(&mut self) {}
}

struct Harness {
    indicator: UpdateIndicator,
    rx: UnboundedReceiver<IndicatorEvent>,
    query: ScriptedQuery,
    upgrade: ScriptedUpgrade,
    help: RecordingLauncher,
    window: RecordingWindow,
    view_rx: std::sync::mpsc::Receiver<ViewUpdate>,
}

impl Harness {
    fn new(store: TomlSettingsStore) -> Self {
        let query = ScriptedQuery::default();
        let upgrade = ScriptedUpgrade::default();
        let help = RecordingLauncher::default();
        let window = RecordingWindow::default();
        let (view_tx, view_rx) = std::sync::mpsc::channel();
        let (events, rx) = events::channel();

        let indicator = UpdateIndicator::new(
            Collaborators {
                query: Box::new(query.clone()),
                upgrade: Box::new(upgrade.clone()),
                url_launcher: Box::new(help.clone()),
                store: Box::new(store),
                settings_window: Box::new(window.clone()),
                view: Box::new(view_tx),
            },
            events,
            "https://docs.example.org/update-indicator",
        );

        Self {
            indicator,
            rx,
            query,
            upgrade,
            help,
            window,
            view_rx,
        }
    }

    /// Handle an event, then everything it causes
    async fn send(&mut self, event: IndicatorEvent) {
        self.indicator.handle(event);
        self.settle().await;
    }

    /// Handle completions until the channel goes quiet
    async fn settle(&mut self) {
        while let Ok(Some(event)) = tokio::time::timeout(Duration::from_millis(200), self.rx.recv()).await {
            self.indicator.handle(event);
        }
    }

    fn label(&self) -> &str {
        &self.indicator.state().display_text
    }

    fn view_updates(&self) -> Vec<ViewUpdate> {
        self.view_rx.try_iter().collect()
    }
}

fn left_click() -> IndicatorEvent {
    IndicatorEvent::Activate(PointerEvent::new(PointerButton::Primary, PointerAction::Press))
}

fn temp_store(dir: &tempfile::TempDir) -> TomlSettingsStore {
    TomlSettingsStore::new(dir.path().join("default.toml"))
}

#[tokio::test]
async fn test_query_count_becomes_label() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(temp_store(&dir));
    h.query.push(Ok(Some("3\n".to_string())));

    h.indicator.start();
    h.settle().await;

    assert_eq!(h.label(), "3");
    assert_eq!(
        h.view_updates(),
        vec![
            ViewUpdate::Label("running".to_string()),
            ViewUpdate::IconSize(12),
            ViewUpdate::Label("3".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_empty_query_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(temp_store(&dir));
    h.query.push(Ok(Some(String::new())));

    h.indicator.start();
    h.settle().await;

    assert_eq!(h.label(), "no output");
}

#[tokio::test]
async fn test_query_spawn_failure_shows_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(temp_store(&dir));
    h.query
        .push(Err(IndicatorError::QueryLaunch("command not found".to_string())));

    h.indicator.start();
    h.settle().await;

    assert_eq!(h.label(), "command not found");
    assert_eq!(h.indicator.state().phase, Phase::Idle);
}

#[tokio::test]
async fn test_query_completion_failure_shows_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(temp_store(&dir));
    h.query.push(Err(IndicatorError::QueryCompletion(
        "Invalid byte sequence in conversion input".to_string(),
    )));

    h.indicator.start();
    h.settle().await;

    assert_eq!(h.label(), "Invalid byte sequence in conversion input");
}

#[tokio::test]
async fn test_successful_upgrade_recounts_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(temp_store(&dir));
    h.query.push(Ok(Some("5\n".to_string())));
    h.query.push(Ok(Some("0\n".to_string())));

    h.indicator.start();
    h.settle().await;
    assert_eq!(h.label(), "5");

    h.send(left_click()).await;

    assert_eq!(h.upgrade.launches(), 1);
    assert_eq!(h.query.launches(), 2);
    assert_eq!(h.label(), "0");
    assert_eq!(h.indicator.state().phase, Phase::Idle);
}

#[tokio::test]
async fn test_failed_upgrade_keeps_label() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(temp_store(&dir));
    h.query.push(Ok(Some("5\n".to_string())));
    h.upgrade.push(Ok(Err(IndicatorError::UpgradeCompletion(
        "exo-open exited with exit status: 1".to_string(),
    ))));

    h.indicator.start();
    h.settle().await;
    h.send(left_click()).await;

    assert_eq!(h.upgrade.launches(), 1);
    assert_eq!(h.query.launches(), 1);
    assert_eq!(h.label(), "5");
    assert_eq!(h.indicator.state().phase, Phase::Idle);
}

#[tokio::test]
async fn test_upgrade_launch_failure_keeps_label() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(temp_store(&dir));
    h.query.push(Ok(Some("5\n".to_string())));
    h.upgrade.push(Err(IndicatorError::UpgradeLaunch(
        "Failed to execute child process \"exo-open\"".to_string(),
    )));

    h.indicator.start();
    h.settle().await;
    h.send(left_click()).await;

    assert_eq!(h.label(), "5");
    assert_eq!(h.query.launches(), 1);
    assert_eq!(h.indicator.state().phase, Phase::Idle);

    // A later click tries again
    h.send(left_click()).await;
    assert_eq!(h.upgrade.launches(), 2);
    assert_eq!(h.query.launches(), 2);
}

#[tokio::test]
async fn test_irrelevant_clicks_never_upgrade() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(temp_store(&dir));
    h.indicator.start();
    h.settle().await;

    let ignored = [
        (PointerButton::Primary, PointerAction::Release),
        (PointerButton::Primary, PointerAction::DoublePress),
        (PointerButton::Middle, PointerAction::Press),
        (PointerButton::Secondary, PointerAction::Press),
        (PointerButton::Secondary, PointerAction::Release),
    ];
    for (button, action) in ignored {
        h.send(IndicatorEvent::Activate(PointerEvent::new(button, action)))
            .await;
    }

    assert_eq!(h.upgrade.launches(), 0);
    assert_eq!(h.query.launches(), 1);
}

#[tokio::test]
async fn test_settings_dialog_is_a_singleton() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(temp_store(&dir));

    h.send(IndicatorEvent::OpenSettings).await;
    h.send(IndicatorEvent::OpenSettings).await;

    assert_eq!(h.window.opened.lock().unwrap().len(), 1);
    assert_eq!(*h.window.presented.lock().unwrap(), 1);
    assert!(h.indicator.is_dialog_open());
}

#[tokio::test]
async fn test_icon_size_persists_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(temp_store(&dir));
    h.indicator.start();
    h.settle().await;
    let _ = h.view_updates();

    h.send(IndicatorEvent::OpenSettings).await;
    let id = h.window.last_id();

    h.send(IndicatorEvent::Dialog {
        id,
        message: DialogMessage::IconSize { value: 40 },
    })
    .await;

    // Applied right away, saved only on close
    assert_eq!(h.view_updates(), vec![ViewUpdate::IconSize(40)]);
    assert_eq!(temp_store(&dir).load().icon_size, 12);

    h.send(IndicatorEvent::Dialog {
        id,
        message: DialogMessage::Close,
    })
    .await;
    assert!(!h.indicator.is_dialog_open());
    assert_eq!(temp_store(&dir).load().icon_size, 40);

    // Restart
    drop(h);
    let restarted = Harness::new(temp_store(&dir));
    assert_eq!(restarted.indicator.state().icon_size(), 40);
}

#[tokio::test]
async fn test_help_neither_closes_nor_persists() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(temp_store(&dir));

    h.send(IndicatorEvent::OpenSettings).await;
    let id = h.window.last_id();

    h.send(IndicatorEvent::Dialog {
        id,
        message: DialogMessage::IconSize { value: 64 },
    })
    .await;
    h.send(IndicatorEvent::Dialog {
        id,
        message: DialogMessage::Help,
    })
    .await;

    assert!(h.indicator.is_dialog_open());
    assert_eq!(
        *h.help.0.lock().unwrap(),
        vec!["https://docs.example.org/update-indicator".to_string()]
    );
    assert!(!dir.path().join("default.toml").exists());
}

#[tokio::test]
async fn test_reopen_after_close_opens_new_dialog() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(temp_store(&dir));

    h.send(IndicatorEvent::OpenSettings).await;
    let first = h.window.last_id();
    h.send(IndicatorEvent::Dialog {
        id: first,
        message: DialogMessage::Close,
    })
    .await;
    h.send(IndicatorEvent::OpenSettings).await;
    let second = h.window.last_id();
    assert_ne!(first, second);

    // The first dialog's process exiting late leaves the second one open
    h.send(IndicatorEvent::DialogExited { id: first }).await;
    assert!(h.indicator.is_dialog_open());
}

#[tokio::test]
async fn test_shutdown_persists_and_exits_view() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(temp_store(&dir));

    h.send(IndicatorEvent::OpenSettings).await;
    let id = h.window.last_id();
    h.send(IndicatorEvent::Dialog {
        id,
        message: DialogMessage::IconSize { value: 30 },
    })
    .await;

    assert!(h.indicator.handle(IndicatorEvent::Shutdown).is_break());
    assert_eq!(temp_store(&dir).load().icon_size, 30);
    assert_eq!(h.view_updates().last(), Some(&ViewUpdate::Exit));
}
