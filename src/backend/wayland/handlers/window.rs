// Responds to xdg-toplevel configure/close events, keeping the layout in sync with the
// size the compositor picked.
use log::info;
use smithay_client_toolkit::shell::xdg::window::{Window, WindowConfigure, WindowHandler};
use wayland_client::{Connection, QueueHandle};

use super::super::state::WaylandState;

impl WindowHandler for WaylandState {
    fn request_close(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _window: &Window) {
        info!("Window closed by compositor");
        self.view.should_exit = true;
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _window: &Window,
        configure: WindowConfigure,
        _serial: u32,
    ) {
        // A missing dimension means the client picks; keep the current one.
        // A given one is a hard limit when tiled or maximized, even below our minimum.
        let width = configure
            .new_size
            .0
            .map_or(self.surface.width(), |w| w.get());
        let height = configure
            .new_size
            .1
            .map_or(self.surface.height(), |h| h.get());
        info!("Window configured: {}x{}", width, height);

        self.resize(width, height);
        self.surface.set_configured(true);
        self.view.needs_redraw = true;
    }
}
