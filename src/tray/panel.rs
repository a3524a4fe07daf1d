//! Panel-style indicator on Linux
//!
//! The appindicator tray used elsewhere never reports clicks on Linux and
//! hides its label without an icon, so here the indicator is a small GTK
//! dock window: the icon and the count side by side in an event box. A
//! primary press starts the upgrade, a secondary press opens the menu.

use super::actions::{tooltip, TrayAction, AUTHORS, COMMENTS, PROGRAM_NAME, WEBSITE};
use super::icon::{IndicatorIcon, RgbaImage};
use super::look::{LookChange, TrayLook};
use crate::core::events::{
    EventSender, IndicatorEvent, PointerAction, PointerButton, PointerEvent, ViewUpdate,
};
use anyhow::{Context, Result};
use gtk::gdk;
use gtk::gdk_pixbuf::{Colorspace, Pixbuf};
use gtk::glib;
use gtk::prelude::*;
use tracing::{debug, error, info};

/// Map a GDK button event to indicator input
pub fn pointer_from_gdk(button: u32, event_type: gdk::EventType) -> Option<PointerEvent> {
    let action = match event_type {
        gdk::EventType::ButtonPress => PointerAction::Press,
        gdk::EventType::DoubleButtonPress => PointerAction::DoublePress,
        gdk::EventType::ButtonRelease => PointerAction::Release,
        _ => return None,
    };
    PointerEvent::from_button_number(button, action)
}

fn to_pixbuf(image: RgbaImage) -> Pixbuf {
    let (width, height) = (image.width as i32, image.height as i32);
    Pixbuf::from_mut_slice(image.data, Colorspace::Rgb, true, 8, width, height, width * 4)
}

fn send_event(events: &EventSender, event: IndicatorEvent) {
    if let Err(e) = events.send(event) {
        error!("Failed to send indicator event: {}", e);
    }
}

fn show_about() {
    let dialog = gtk::AboutDialog::builder()
        .program_name(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .comments(COMMENTS)
        .website(WEBSITE)
        .authors(AUTHORS)
        .license_type(gtk::License::Gpl20)
        .logo_icon_name("system-software-update")
        .build();
    dialog.connect_response(|dialog, _| dialog.close());
    dialog.show();
}

fn build_menu(events: &EventSender) -> gtk::Menu {
    let menu = gtk::Menu::new();

    let add_item = |action: TrayAction| {
        let item = gtk::MenuItem::with_label(action.label());
        let events = events.clone();
        item.connect_activate(move |_| send_event(&events, action.event()));
        menu.append(&item);
    };

    add_item(TrayAction::UpdateSystem);
    add_item(TrayAction::CheckForUpdates);
    menu.append(&gtk::SeparatorMenuItem::new());
    add_item(TrayAction::OpenSettings);

    let about = gtk::MenuItem::with_label("About");
    about.connect_activate(|_| show_about());
    menu.append(&about);

    menu.append(&gtk::SeparatorMenuItem::new());
    add_item(TrayAction::Quit);

    menu.show_all();
    menu
}

/// GTK indicator showing the icon and the label
pub struct PanelIndicator {
    window: gtk::Window,
    image: gtk::Image,
    label: gtk::Label,
    icon: IndicatorIcon,
    look: TrayLook,
}

impl PanelIndicator {
    /// Build and show the indicator window; must run on the GTK thread
    pub fn new(events: EventSender) -> Result<Self> {
        let icon = IndicatorIcon::new().context("Failed to load indicator icon")?;
        let look = TrayLook::default();

        let image = gtk::Image::new();
        let label = gtk::Label::new(Some(&look.label));

        let row = gtk::Box::new(gtk::Orientation::Horizontal, 4);
        row.pack_start(&image, false, false, 0);
        row.pack_start(&label, false, false, 0);

        let event_box = gtk::EventBox::new();
        event_box.add(&row);

        let menu = build_menu(&events);
        let click_events = events.clone();
        event_box.connect_button_press_event(move |_, event| {
            let Some(pointer) = pointer_from_gdk(event.button(), event.event_type()) else {
                return glib::Propagation::Proceed;
            };
            debug!("Indicator click: {:?}", pointer);

            if pointer.button == PointerButton::Secondary && pointer.action == PointerAction::Press {
                menu.popup_at_pointer(Some(&**event));
            } else {
                send_event(&click_events, IndicatorEvent::Activate(pointer));
            }
            glib::Propagation::Stop
        });

        let window = gtk::Window::builder()
            .title(PROGRAM_NAME)
            .decorated(false)
            .resizable(false)
            .skip_taskbar_hint(true)
            .type_hint(gdk::WindowTypeHint::Dock)
            .build();
        window.add(&event_box);
        window.set_keep_above(true);
        window.stick();
        window.set_tooltip_text(Some(&tooltip(&look.label)));

        // Closing the indicator quits it
        window.connect_delete_event(move |_, _| {
            send_event(&events, IndicatorEvent::Shutdown);
            glib::Propagation::Stop
        });

        window.show_all();
        // Shown once an icon size arrives
        image.hide();

        info!("Panel indicator created");

        Ok(Self {
            window,
            image,
            label,
            icon,
            look,
        })
    }

    /// Reflect an indicator state change
    pub fn apply(&mut self, update: &ViewUpdate) {
        match self.look.apply(&self.icon, update) {
            LookChange::Label => {
                self.label.set_label(&self.look.label);
                self.window
                    .set_tooltip_text(Some(&tooltip(&self.look.label)));
            }
            LookChange::Icon => match self.look.icon.clone() {
                Some(image) => {
                    self.image.set_from_pixbuf(Some(&to_pixbuf(image)));
                    self.image.show();
                }
                // The label stays, only the icon goes
                None => {
                    self.image.set_from_pixbuf(None);
                    self.image.hide();
                }
            },
            LookChange::Nothing => {}
        }
    }
}
