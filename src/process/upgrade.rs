//! System upgrade run inside a terminal emulator

use crate::core::config::UpgradeConfig;
use crate::core::error::IndicatorError;
use crate::core::runner::{UpgradeCompletion, UpgradeRunner};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runs `<terminal launcher...> <command>` and waits for it to exit
#[derive(Debug, Clone)]
pub struct TerminalUpgrade {
    launcher: Vec<String>,
    command: String,
}

impl TerminalUpgrade {
    pub fn new(config: &UpgradeConfig) -> Self {
        Self {
            launcher: config.terminal_launcher.clone(),
            command: config.command.clone(),
        }
    }
}

impl UpgradeRunner for TerminalUpgrade {
    fn launch(&self) -> Result<UpgradeCompletion, IndicatorError> {
        let (program, args) = self
            .launcher
            .split_first()
            .ok_or_else(|| IndicatorError::UpgradeLaunch("No terminal launcher configured".to_string()))?;

        debug!("Launching upgrade: {} {:?} {:?}", program, args, self.command);

        // Not killed on drop: quitting the indicator must leave a running
        // upgrade alone.
        let mut child = Command::new(program)
            .args(args)
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                IndicatorError::UpgradeLaunch(format!(
                    "Failed to execute child process \"{}\" ({})",
                    program, e
                ))
            })?;

        let program = program.clone();
        Ok(Box::pin(async move {
            let status = child
                .wait()
                .await
                .map_err(|e| IndicatorError::UpgradeCompletion(e.to_string()))?;

            if status.success() {
                Ok(())
            } else {
                Err(IndicatorError::UpgradeCompletion(format!(
                    "{} exited with {}",
                    program, status
                )))
            }
        }))
    }
}
