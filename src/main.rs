//! Update Indicator - Entry Point
//!
//! Runs the tray on the main thread and the indicator on a background
//! tokio runtime. The same binary also hosts the settings dialog.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use update_indicator::{
    core::{
        events::{self, EventSender, IndicatorEvent, View, ViewUpdate},
        settings::DEFAULT_INSTANCE,
    },
    process::{CommandUrlLauncher, ShellQuery, TerminalUpgrade},
    tray::run_tray_loop,
    window::{run_settings_dialog, ProcessSettingsWindow},
    Collaborators, Config, TomlSettingsStore, UpdateIndicator,
};

#[derive(Parser, Debug)]
#[command(name = "update-indicator", version, about = "Pending package updates in the system tray")]
struct Cli {
    /// Instance name; each instance keeps its own settings
    #[arg(long, default_value = DEFAULT_INSTANCE)]
    instance: String,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Settings dialog, started by the indicator itself
    #[command(hide = true)]
    SettingsDialog {
        #[arg(long)]
        icon_size: u8,
    },
    /// Print the default configuration
    DefaultConfig,
}

fn main() -> Result<()> {
    // stdout carries the settings dialog protocol, so logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::SettingsDialog { icon_size }) => run_settings_dialog(icon_size),
        Some(Command::DefaultConfig) => {
            print!("{}", Config::default_config_str());
            Ok(())
        }
        None => run_indicator(cli.instance, cli.config),
    }
}

fn run_indicator(instance: String, config_path: Option<PathBuf>) -> Result<()> {
    info!("Starting update indicator (instance {})", instance);

    let config = match config_path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    let store = TomlSettingsStore::for_instance(&instance)?;
    info!("Settings file: {:?}", store.path());

    let exe = std::env::current_exe().context("Failed to locate own executable")?;
    let (event_tx, event_rx) = events::channel();

    run_tray_loop(event_tx.clone(), move |view| {
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("Failed to create tokio runtime: {}", e);
                    view.apply(ViewUpdate::Exit);
                    return;
                }
            };

            runtime.block_on(async move {
                let parts = Collaborators {
                    query: Box::new(ShellQuery::new(&config.query)),
                    upgrade: Box::new(TerminalUpgrade::new(&config.upgrade)),
                    url_launcher: Box::new(CommandUrlLauncher::new(config.help.launcher.clone())),
                    store: Box::new(store),
                    settings_window: Box::new(ProcessSettingsWindow::new(exe)),
                    view,
                };

                spawn_ctrl_c_handler(event_tx.clone());

                let indicator = UpdateIndicator::new(parts, event_tx, config.help.url.clone());
                indicator.run(event_rx).await;
            });
        });
    })?;

    info!("Update indicator exited");
    Ok(())
}

fn spawn_ctrl_c_handler(events: EventSender) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupted, shutting down");
                let _ = events.send(IndicatorEvent::Shutdown);
            }
            Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
        }
    });
}
