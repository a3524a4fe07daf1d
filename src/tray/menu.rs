//! Tray icon and menu on platforms with a native tray (macOS, Windows)

use super::actions::{tooltip, TrayAction, AUTHORS, COMMENTS, PROGRAM_NAME, WEBSITE};
use super::icon::{IndicatorIcon, RgbaImage};
use super::look::{LookChange, TrayLook};
use crate::core::events::{
    EventSender, IndicatorEvent, PointerAction, PointerButton, PointerEvent, ViewUpdate,
};
use anyhow::{Context, Result};
use tray_icon::{
    menu::{AboutMetadata, Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem},
    Icon, MouseButton, MouseButtonState, TrayIcon as TrayIconHandle, TrayIconBuilder,
    TrayIconEvent,
};
use tracing::{debug, error, info};

/// Map raw tray pointer input to indicator input
pub fn pointer_event(event: &TrayIconEvent) -> Option<PointerEvent> {
    let (button, action) = match event {
        TrayIconEvent::Click {
            button,
            button_state,
            ..
        } => {
            let action = match button_state {
                MouseButtonState::Down => PointerAction::Press,
                MouseButtonState::Up => PointerAction::Release,
            };
            (*button, action)
        }
        TrayIconEvent::DoubleClick { button, .. } => (*button, PointerAction::DoublePress),
        _ => return None,
    };

    let button = match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Middle => PointerButton::Middle,
        MouseButton::Right => PointerButton::Secondary,
    };

    Some(PointerEvent::new(button, action))
}

fn about_metadata() -> AboutMetadata {
    AboutMetadata {
        name: Some(PROGRAM_NAME.to_string()),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        comments: Some(COMMENTS.to_string()),
        website: Some(WEBSITE.to_string()),
        license: Some(env!("CARGO_PKG_LICENSE").to_string()),
        authors: Some(AUTHORS.iter().map(|a| a.to_string()).collect()),
        ..Default::default()
    }
}

fn to_icon(image: RgbaImage) -> Result<Icon> {
    Icon::from_rgba(image.data, image.width, image.height)
        .map_err(|e| anyhow::anyhow!("Failed to create icon: {}", e))
}

/// Tray manager
pub struct TrayManager {
    /// Tray icon handle
    tray: TrayIconHandle,
    /// Icon rendered at the configured size
    icon: IndicatorIcon,
    look: TrayLook,
}

impl TrayManager {
    /// Create the tray icon and start forwarding its input to the indicator
    pub fn new(events: EventSender) -> Result<Self> {
        let icon = IndicatorIcon::new().context("Failed to load tray icon")?;

        let menu = Menu::new();
        let mut actions = Vec::new();

        let mut add_item = |action: TrayAction| -> Result<()> {
            let item = MenuItem::new(action.label(), true, None);
            actions.push((item.id().clone(), action));
            menu.append(&item)?;
            Ok(())
        };

        add_item(TrayAction::UpdateSystem)?;
        add_item(TrayAction::CheckForUpdates)?;
        menu.append(&PredefinedMenuItem::separator())?;
        add_item(TrayAction::OpenSettings)?;
        menu.append(&PredefinedMenuItem::about(Some("About"), Some(about_metadata())))?;
        menu.append(&PredefinedMenuItem::separator())?;
        add_item(TrayAction::Quit)?;

        // Left click belongs to the upgrade action
        let tray = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_menu_on_left_click(false)
            .with_tooltip(PROGRAM_NAME)
            .build()
            .context("Failed to create tray icon")?;

        info!("Tray icon created");

        start_menu_handler(actions, events.clone());
        start_pointer_handler(events);

        Ok(Self {
            tray,
            icon,
            look: TrayLook::default(),
        })
    }

    /// Reflect an indicator state change
    pub fn apply(&mut self, update: &ViewUpdate) {
        match self.look.apply(&self.icon, update) {
            LookChange::Label => {
                self.tray.set_title(Some(&self.look.label));
                if let Err(e) = self.tray.set_tooltip(Some(tooltip(&self.look.label))) {
                    error!("Failed to set tray tooltip: {}", e);
                }
            }
            // Some hosts drop the title without an icon, keep a placeholder
            LookChange::Icon => match to_icon(self.look.icon_or_placeholder()) {
                Ok(icon) => {
                    if let Err(e) = self.tray.set_icon(Some(icon)) {
                        error!("Failed to set tray icon: {}", e);
                    }
                }
                Err(e) => error!("Failed to render tray icon: {}", e),
            },
            LookChange::Nothing => {}
        }
    }
}

fn start_menu_handler(actions: Vec<(MenuId, TrayAction)>, events: EventSender) {
    std::thread::spawn(move || {
        let receiver = MenuEvent::receiver();

        while let Ok(event) = receiver.recv() {
            debug!("Menu event: {:?}", event);

            let action = actions
                .iter()
                .find(|(id, _)| *id == event.id)
                .map(|(_, action)| *action);

            if let Some(action) = action {
                if let Err(e) = events.send(action.event()) {
                    error!("Failed to send tray action: {}", e);
                    break;
                }
            }
        }
    });
}

fn start_pointer_handler(events: EventSender) {
    std::thread::spawn(move || {
        let receiver = TrayIconEvent::receiver();

        while let Ok(event) = receiver.recv() {
            if let Some(pointer) = pointer_event(&event) {
                if let Err(e) = events.send(IndicatorEvent::Activate(pointer)) {
                    error!("Failed to send tray click: {}", e);
                    break;
                }
            }
        }
    });
}
