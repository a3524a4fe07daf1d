//! Settings dialog
//!
//! Runs in its own process (see [`super::host`]). Every change is reported to
//! the indicator right away over stdout so the tray reflects it live; the
//! indicator persists the value once the dialog closes.

use super::protocol::{decode_line, encode_line, DialogMessage, HostMessage};
use crate::core::settings::{clamp_icon_size, step_icon_size, MAX_ICON_SIZE, MIN_ICON_SIZE};
use anyhow::Result;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Dialog window title
const TITLE: &str = "Update Indicator";

/// State of the settings dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsDialog {
    icon_size: u8,
    closed: bool,
}

impl SettingsDialog {
    pub fn new(icon_size: u8) -> Self {
        Self {
            icon_size: clamp_icon_size(icon_size as i64),
            closed: false,
        }
    }

    pub fn icon_size(&self) -> u8 {
        self.icon_size
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Set the spin value, reporting it if it changed
    pub fn set_icon_size(&mut self, value: i64) -> Option<DialogMessage> {
        let size = clamp_icon_size(value);
        if self.closed || size == self.icon_size {
            return None;
        }
        self.icon_size = size;
        Some(DialogMessage::IconSize {
            value: size as i64,
        })
    }

    /// Step the spin value, wrapping at either bound
    pub fn step(&mut self, delta: i64) -> Option<DialogMessage> {
        let size = step_icon_size(self.icon_size, delta);
        self.set_icon_size(size as i64)
    }

    pub fn help(&self) -> Option<DialogMessage> {
        (!self.closed).then_some(DialogMessage::Help)
    }

    /// Close the dialog; reported only the first time
    pub fn close(&mut self) -> Option<DialogMessage> {
        if self.closed {
            return None;
        }
        self.closed = true;
        Some(DialogMessage::Close)
    }
}

/// Render the dialog and return the messages it produced this frame
pub fn render_settings_dialog(ctx: &egui::Context, dialog: &mut SettingsDialog) -> Vec<DialogMessage> {
    let mut messages = Vec::new();

    egui::TopBottomPanel::bottom("settings_buttons").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("Help").clicked() {
                messages.extend(dialog.help());
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Close").clicked() {
                    messages.extend(dialog.close());
                }
            });
        });
        ui.add_space(6.0);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_space(10.0);
        ui.heading("Set Icon Size");
        ui.add_space(15.0);

        ui.horizontal(|ui| {
            ui.label("Icon size:");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("+").clicked() {
                    messages.extend(dialog.step(1));
                }

                let mut value = dialog.icon_size() as i64;
                let response = ui.add(
                    egui::DragValue::new(&mut value)
                        .range(MIN_ICON_SIZE as i64..=MAX_ICON_SIZE as i64)
                        .suffix(" px"),
                );
                if response.changed() {
                    messages.extend(dialog.set_icon_size(value));
                }

                if ui.button("-").clicked() {
                    messages.extend(dialog.step(-1));
                }
            });
        });
    });

    // Close on Escape
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        messages.extend(dialog.close());
    }

    messages
}

/// eframe application wrapping [`SettingsDialog`]
struct SettingsDialogApp {
    dialog: SettingsDialog,
    /// Set once the indicator closed our stdin
    parent_gone: Arc<AtomicBool>,
}

impl SettingsDialogApp {
    fn emit(&mut self, message: &DialogMessage) {
        if self.parent_gone.load(Ordering::SeqCst) {
            return;
        }
        let line = match encode_line(message) {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to encode {:?}: {}", message, e);
                return;
            }
        };
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(line.as_bytes()).and_then(|_| stdout.flush()) {
            debug!("Indicator stopped listening: {}", e);
            self.parent_gone.store(true, Ordering::SeqCst);
        }
    }
}

impl eframe::App for SettingsDialogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let messages = render_settings_dialog(ctx, &mut self.dialog);
        for message in &messages {
            self.emit(message);
        }

        // Window close button commits like the Close button
        if ctx.input(|i| i.viewport().close_requested()) {
            if let Some(message) = self.dialog.close() {
                self.emit(&message);
            }
        }

        if self.dialog.is_closed() || self.parent_gone.load(Ordering::SeqCst) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

/// Follow requests from the indicator until it closes our stdin
fn watch_host(ctx: egui::Context, parent_gone: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match decode_line::<HostMessage>(&line) {
                Ok(HostMessage::Present) => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(false));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
                }
                Err(e) => warn!("Ignoring malformed host message {:?}: {}", line, e),
            }
            ctx.request_repaint();
        }

        debug!("Indicator closed the settings dialog");
        parent_gone.store(true, Ordering::SeqCst);
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        ctx.request_repaint();
    });
}

/// Show the settings dialog until it is closed
pub fn run_settings_dialog(icon_size: u8) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([340.0, 240.0])
            .with_resizable(false),
        centered: true,
        ..Default::default()
    };

    let parent_gone = Arc::new(AtomicBool::new(false));

    eframe::run_native(
        TITLE,
        options,
        Box::new(move |cc| {
            watch_host(cc.egui_ctx.clone(), parent_gone.clone());
            Ok(Box::new(SettingsDialogApp {
                dialog: SettingsDialog::new(icon_size),
                parent_gone,
            }))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Settings dialog failed: {}", e))
}
