//! Update-count command run through a shell

use crate::core::config::QueryConfig;
use crate::core::error::IndicatorError;
use crate::core::runner::{PackageQueryRunner, QueryCompletion};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs `<shell> -c <command>` and captures its stdout
#[derive(Debug, Clone)]
pub struct ShellQuery {
    shell: String,
    command: String,
}

impl ShellQuery {
    pub fn new(config: &QueryConfig) -> Self {
        Self {
            shell: config.shell.clone(),
            command: config.command.clone(),
        }
    }
}

impl PackageQueryRunner for ShellQuery {
    fn launch(&self) -> Result<QueryCompletion, IndicatorError> {
        debug!("Running update-count command: {} -c {:?}", self.shell, self.command);

        let child = Command::new(&self.shell)
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                IndicatorError::QueryLaunch(format!(
                    "Failed to execute child process \"{}\" ({})",
                    self.shell, e
                ))
            })?;

        Ok(Box::pin(async move {
            let output = child
                .wait_with_output()
                .await
                .map_err(|e| IndicatorError::QueryCompletion(e.to_string()))?;

            // A failing package manager still pipes into `wc -l`; only the
            // captured text matters.
            if !output.status.success() {
                warn!("Update-count command exited with {}", output.status);
            }

            let stdout = String::from_utf8(output.stdout).map_err(|e| {
                IndicatorError::QueryCompletion(format!("Invalid UTF-8 in command output: {}", e))
            })?;
            Ok(Some(stdout))
        }))
    }
}
