//! Fire-and-forget helper commands

use crate::core::error::IndicatorError;
use crate::core::runner::UrlLauncher;
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

/// Opens URLs with `<launcher...> <url>`
#[derive(Debug, Clone)]
pub struct CommandUrlLauncher {
    launcher: Vec<String>,
}

impl CommandUrlLauncher {
    pub fn new(launcher: Vec<String>) -> Self {
        Self { launcher }
    }
}

impl UrlLauncher for CommandUrlLauncher {
    fn open(&self, url: &str) -> Result<(), IndicatorError> {
        let (program, args) = self
            .launcher
            .split_first()
            .ok_or_else(|| IndicatorError::HelpLaunch("No URL launcher configured".to_string()))?;

        // The child is reaped by the runtime once it exits
        Command::new(program)
            .args(args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| IndicatorError::HelpLaunch(format!("{}: {}", program, e)))?;

        info!("Opened {}", url);
        Ok(())
    }
}
