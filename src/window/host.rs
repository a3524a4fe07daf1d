//! Settings dialog hosted in a child process
//!
//! The dialog is this same executable started with the `settings-dialog`
//! subcommand. Its stdout lines become indicator events; closing its stdin
//! tells it to go away.

use super::protocol::{decode_line, encode_line, DialogMessage, HostMessage};
use crate::core::error::IndicatorError;
use crate::core::events::{DialogId, EventSender, IndicatorEvent};
use crate::core::runner::SettingsWindow;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdin, ChildStdout, Command};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Runs the settings dialog as `<exe> settings-dialog --icon-size <n>`
pub struct ProcessSettingsWindow {
    exe: PathBuf,
    /// Messages for the current dialog; dropping it closes the dialog
    to_dialog: Option<mpsc::UnboundedSender<HostMessage>>,
}

impl ProcessSettingsWindow {
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        Self {
            exe: exe.into(),
            to_dialog: None,
        }
    }
}

impl SettingsWindow for ProcessSettingsWindow {
    fn open(&mut self, id: DialogId, icon_size: u8, events: EventSender) -> Result<(), IndicatorError> {
        let mut child = Command::new(&self.exe)
            .arg("settings-dialog")
            .arg("--icon-size")
            .arg(icon_size.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| IndicatorError::DialogLaunch(format!("{:?}: {}", self.exe, e)))?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(IndicatorError::DialogLaunch(
                "Settings dialog pipes unavailable".to_string(),
            ));
        };

        info!("Settings dialog {} opened", id);

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_host_messages(stdin, rx));
        tokio::spawn(async move {
            read_dialog_messages(id, stdout, &events).await;

            match child.wait().await {
                Ok(status) => debug!("Settings dialog {} exited with {}", id, status),
                Err(e) => warn!("Failed to wait for settings dialog {}: {}", id, e),
            }
            let _ = events.send(IndicatorEvent::DialogExited { id });
        });

        self.to_dialog = Some(tx);
        Ok(())
    }

    fn present(&mut self) {
        if let Some(tx) = &self.to_dialog {
            let _ = tx.send(HostMessage::Present);
        }
    }

    fn close(&mut self) {
        self.to_dialog = None;
    }
}

async fn write_host_messages(mut stdin: ChildStdin, mut rx: mpsc::UnboundedReceiver<HostMessage>) {
    while let Some(message) = rx.recv().await {
        let line = match encode_line(&message) {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to encode {:?}: {}", message, e);
                continue;
            }
        };
        if let Err(e) = stdin.write_all(line.as_bytes()).await {
            debug!("Settings dialog stdin closed: {}", e);
            return;
        }
        let _ = stdin.flush().await;
    }
    // stdin is dropped here, which closes the dialog
}

async fn read_dialog_messages(id: DialogId, stdout: ChildStdout, events: &EventSender) {
    let mut lines = BufReader::new(stdout).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match decode_line::<DialogMessage>(&line) {
                Ok(message) => {
                    if events.send(IndicatorEvent::Dialog { id, message }).is_err() {
                        return;
                    }
                }
                Err(e) => warn!("Ignoring malformed dialog message {:?}: {}", line, e),
            },
            Ok(None) => return,
            Err(e) => {
                warn!("Failed to read from settings dialog {}: {}", id, e);
                return;
            }
        }
    }
}
