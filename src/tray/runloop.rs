//! Main-thread loop hosting the indicator
//!
//! The presentation must run on the main thread: a GTK main loop on Linux,
//! a winit event loop elsewhere. Indicator state changes reach it through the
//! [`View`] handed to `start`.

use crate::core::events::{EventSender, View, ViewUpdate};
use anyhow::{Context, Result};
use tracing::{error, info};

/// Run the indicator until it reports [`ViewUpdate::Exit`].
///
/// `start` receives the view the indicator should publish to; it is called
/// before the widgets exist so no early update is lost.
#[cfg(target_os = "linux")]
pub fn run_tray_loop<F>(events: EventSender, start: F) -> Result<()>
where
    F: FnOnce(Box<dyn View>),
{
    use super::panel::PanelIndicator;
    use gtk::glib;

    gtk::init().context("Failed to initialize GTK")?;

    let (view_tx, mut view_rx) = tokio::sync::mpsc::unbounded_channel::<ViewUpdate>();
    start(Box::new(view_tx));

    let mut panel = match PanelIndicator::new(events) {
        Ok(panel) => Some(panel),
        Err(e) => {
            error!("Failed to create indicator: {:#}", e);
            None
        }
    };

    glib::spawn_future_local(async move {
        while let Some(update) = view_rx.recv().await {
            if update == ViewUpdate::Exit {
                break;
            }
            if let Some(panel) = panel.as_mut() {
                panel.apply(&update);
            }
        }
        gtk::main_quit();
    });

    gtk::main();
    info!("Indicator loop finished");
    Ok(())
}

/// Run the tray until the indicator reports [`ViewUpdate::Exit`].
///
/// `start` receives the view the indicator should publish to; it is called
/// before the tray exists so no early update is lost.
#[cfg(not(target_os = "linux"))]
pub fn run_tray_loop<F>(events: EventSender, start: F) -> Result<()>
where
    F: FnOnce(Box<dyn View>),
{
    use super::menu::TrayManager;
    use winit::application::ApplicationHandler;
    use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};

    /// Forwards updates into the winit loop, waking it up
    struct ProxyView(EventLoopProxy<ViewUpdate>);

    impl View for ProxyView {
        fn apply(&self, update: ViewUpdate) {
            let _ = self.0.send_event(update);
        }
    }

    struct TrayApp {
        events: EventSender,
        tray: Option<TrayManager>,
        /// Updates that arrived before the tray was created
        pending: Vec<ViewUpdate>,
    }

    impl ApplicationHandler<ViewUpdate> for TrayApp {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            event_loop.set_control_flow(ControlFlow::Wait);

            // Tray must be created once the loop is running (macOS)
            if self.tray.is_none() {
                self.tray = match TrayManager::new(self.events.clone()) {
                    Ok(tray) => Some(tray),
                    Err(e) => {
                        error!("Failed to create tray: {:#}", e);
                        None
                    }
                };
                if let Some(ref mut tray) = self.tray {
                    for update in self.pending.drain(..) {
                        tray.apply(&update);
                    }
                }
            }
        }

        fn window_event(
            &mut self,
            _event_loop: &ActiveEventLoop,
            _window_id: winit::window::WindowId,
            _event: winit::event::WindowEvent,
        ) {
        }

        fn user_event(&mut self, event_loop: &ActiveEventLoop, update: ViewUpdate) {
            if update == ViewUpdate::Exit {
                event_loop.exit();
                return;
            }
            match self.tray {
                Some(ref mut tray) => tray.apply(&update),
                None => self.pending.push(update),
            }
        }
    }

    let event_loop = EventLoop::<ViewUpdate>::with_user_event()
        .build()
        .context("Failed to create event loop")?;
    start(Box::new(ProxyView(event_loop.create_proxy())));

    let mut app = TrayApp {
        events,
        tray: None,
        pending: Vec::new(),
    };
    event_loop.run_app(&mut app).context("Event loop failed")?;

    info!("Tray loop finished");
    Ok(())
}
