// Holds the live Wayland protocol state shared by the backend loop and the handler
// submodules; owns the drawing view and routes window-space input to it.
use anyhow::{Context, Result};
use log::debug;
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    registry::RegistryState,
    seat::{
        SeatState,
        pointer::{CursorIcon, ThemedPointer},
    },
    shell::{WaylandSurface, xdg::XdgShell},
    shm::Shm,
};
use wayland_client::{Connection, QueueHandle, protocol::wl_shm};

use crate::{
    config::Config,
    draw::Color,
    input::{DrawingView, MouseButton},
    notification,
    ui::{self, Layout, UiTarget},
};

use super::surface::SurfaceState;

/// Internal Wayland state shared across modules.
pub(super) struct WaylandState {
    // Wayland protocol objects
    pub(super) registry_state: RegistryState,
    pub(super) compositor_state: CompositorState,
    pub(super) xdg_shell: XdgShell,
    pub(super) shm: Shm,
    pub(super) output_state: OutputState,
    pub(super) seat_state: SeatState,

    // Window and buffer management
    pub(super) surface: SurfaceState,
    pub(super) pointer: Option<ThemedPointer>,
    cursor: CursorIcon,

    pub(super) config: Config,

    // Drawing view and the controls around it
    pub(super) view: DrawingView,
    pub(super) layout: Layout,
    pub(super) palette: Vec<Color>,
    pub(super) pointer_position: (f64, f64),

    // Tokio runtime handle for notifications
    pub(super) tokio_handle: tokio::runtime::Handle,
}

impl WaylandState {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        registry_state: RegistryState,
        compositor_state: CompositorState,
        xdg_shell: XdgShell,
        shm: Shm,
        output_state: OutputState,
        seat_state: SeatState,
        config: Config,
        view: DrawingView,
        tokio_handle: tokio::runtime::Handle,
    ) -> Self {
        let surface = SurfaceState::new();
        let palette = ui::palette(&config.extra_palette());
        let layout = Layout::with_palette(surface.width(), surface.height(), palette.len());

        let mut state = Self {
            registry_state,
            compositor_state,
            xdg_shell,
            shm,
            output_state,
            seat_state,
            surface,
            pointer: None,
            cursor: CursorIcon::Default,
            config,
            view,
            layout,
            palette,
            pointer_position: (0.0, 0.0),
            tokio_handle,
        };
        state.sync_display_size();
        state
    }

    /// Recomputes the layout for a new window size.
    pub(super) fn resize(&mut self, width: u32, height: u32) {
        if self.surface.update_dimensions(width, height) {
            debug!("Window size changed to {}x{} - recreating SlotPool", width, height);
        }
        self.layout = Layout::with_palette(width, height, self.palette.len());
        self.sync_display_size();
        self.view.needs_redraw = true;
    }

    fn sync_display_size(&mut self) {
        let canvas = self.layout.canvas;
        self.view.set_display_size(canvas.width, canvas.height);
    }

    /// Routes a button press at a window position to the control under it.
    pub(super) fn handle_press(&mut self, button: MouseButton, x: f64, y: f64) {
        if button != MouseButton::Left {
            return;
        }
        let Some(target) = self.layout.hit_test(x, y, self.view.dialog()) else {
            return;
        };
        debug!("Press on {:?}", target);

        // Clicking away from a hex field being typed into applies its value.
        if !matches!(target, UiTarget::HexField(_)) {
            self.view.commit_hex_entry();
        }

        match target {
            UiTarget::Canvas => {
                let (cx, cy) = self.layout.canvas_local(x, y);
                self.view.on_pointer_down(button, cx, cy);
            }
            UiTarget::StrokeSwatch(index) => {
                if let Some(color) = self.palette.get(index) {
                    self.view.set_stroke_color(*color);
                }
            }
            UiTarget::BackgroundSwatch(index) => {
                if let Some(color) = self.palette.get(index) {
                    self.view.set_background(*color);
                }
            }
            UiTarget::HexField(field) => self.view.begin_hex_entry(field),
            UiTarget::Width(width) => self.view.set_line_width(width),
            UiTarget::Action(action) => self.view.handle_action(action),
            UiTarget::DialogOk => self.view.confirm_dialog(),
            UiTarget::DialogCancel => self.view.dismiss_dialog(),
        }
        self.view.needs_redraw = true;
    }

    /// Pointer motion in window coordinates.
    ///
    /// Leaving the canvas region mid-stroke ends the stroke.
    pub(super) fn handle_motion(&mut self, x: f64, y: f64) {
        self.pointer_position = (x, y);
        if !self.view.is_drawing() {
            return;
        }
        if self.layout.canvas.contains(x, y) {
            let (cx, cy) = self.layout.canvas_local(x, y);
            self.view.on_pointer_move(cx, cy);
        } else {
            debug!("Pointer left the canvas mid-stroke");
            self.view.on_pointer_leave();
        }
    }

    /// Picks the cursor for the current pointer position and eraser state.
    pub(super) fn update_cursor(&mut self, conn: &Connection) {
        let (x, y) = self.pointer_position;
        let target = match self.view.dialog() {
            Some(_) => None,
            None => self.layout.hit_test(x, y, None),
        };
        let icon = match target {
            Some(UiTarget::Canvas) if self.view.is_eraser() => CursorIcon::Cell,
            Some(UiTarget::Canvas) => CursorIcon::Crosshair,
            Some(UiTarget::HexField(_)) => CursorIcon::Text,
            _ => CursorIcon::Default,
        };
        if icon == self.cursor {
            return;
        }

        let Some(pointer) = &self.pointer else {
            return;
        };
        match pointer.set_cursor(conn, icon) {
            Ok(()) => self.cursor = icon,
            Err(err) => debug!("Failed to set cursor {:?}: {}", icon, err),
        }
    }

    /// Forces the cursor to be set again on the next update.
    pub(super) fn reset_cursor(&mut self) {
        self.cursor = CursorIcon::Default;
    }

    /// Hands queued notices to the desktop notification service.
    pub(super) fn flush_notices(&mut self) {
        for notice in self.view.take_notices() {
            notification::notify_async(&self.tokio_handle, &notice);
        }
    }

    pub(super) fn render(&mut self, qh: &QueueHandle<Self>) -> Result<()> {
        debug!("=== RENDER START ===");
        let buffer_count = self.config.performance.buffer_count as usize;
        let width = self.surface.width();
        let height = self.surface.height();

        let (buffer, canvas) = {
            let pool = self.surface.ensure_pool(&self.shm, buffer_count)?;
            pool.create_buffer(
                width as i32,
                height as i32,
                (width * 4) as i32,
                wl_shm::Format::Argb8888,
            )
            .context("Failed to create buffer")?
        };

        // SAFETY: This unsafe block creates a Cairo surface from raw memory buffer.
        // Safety invariants that must be maintained:
        // 1. `canvas` is a valid mutable slice from SlotPool with exactly (width * height * 4) bytes
        // 2. The buffer format ARgb32 matches the allocation (4 bytes per pixel)
        // 3. The stride (width * 4) correctly represents the number of bytes per row
        // 4. `cairo_surface` and `ctx` are explicitly dropped before the buffer is committed,
        //    so Cairo never touches the memory after ownership transfers to the compositor
        // 5. No other references to this memory exist during Cairo's usage
        let cairo_surface = unsafe {
            cairo::ImageSurface::create_for_data_unsafe(
                canvas.as_mut_ptr(),
                cairo::Format::ARgb32,
                width as i32,
                height as i32,
                (width * 4) as i32,
            )
            .context("Failed to create Cairo surface")?
        };

        let ctx = cairo::Context::new(&cairo_surface).context("Failed to create Cairo context")?;
        ui::render_window(&ctx, &self.layout, &self.view, &self.palette);

        cairo_surface.flush();
        drop(ctx);
        drop(cairo_surface);

        let wl_surface = self
            .surface
            .window()
            .context("Window not created")?
            .wl_surface();
        wl_surface.attach(Some(buffer.wl_buffer()), 0, 0);
        wl_surface.damage_buffer(0, 0, width as i32, height as i32);

        if self.config.performance.enable_vsync {
            debug!("Requesting frame callback (vsync enabled)");
            wl_surface.frame(qh, wl_surface.clone());
        }

        wl_surface.commit();
        debug!("=== RENDER COMPLETE ===");

        Ok(())
    }

    /// Applies decodes that finished since the last wakeup.
    pub(super) fn pump_loads(&mut self) {
        let applied = self.view.pump_loads();
        if applied > 0 {
            debug!(
                "Applied {} decoded image(s), {} still in flight",
                applied,
                self.view.pending_loads()
            );
        }
    }
}
