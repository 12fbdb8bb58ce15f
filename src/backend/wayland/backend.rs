// Coordinates backend startup/shutdown and drives the calloop event loop while
// delegating rendering & protocol state to `WaylandState` and its handler modules.
use anyhow::{Context, Result};
use calloop::{EventLoop, ping::make_ping};
use log::{debug, info, warn};
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    reexports::calloop_wayland_source::WaylandSource,
    registry::RegistryState,
    seat::SeatState,
    shell::{
        WaylandSurface,
        xdg::{XdgShell, window::WindowDecorations},
    },
    shm::Shm,
};
use wayland_client::{Connection, globals::registry_queue_init};

use super::state::WaylandState;
use crate::{
    config::Config,
    draw::ImageLoader,
    input::{DrawingView, ViewOptions},
    storage::KeyValueStore,
    ui::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH},
};

const WINDOW_TITLE: &str = "Sketchpad";
const APP_ID: &str = "sketchpad";
const MAX_RENDER_FAILURES: u32 = 10;

/// Wayland backend state
pub struct WaylandBackend {
    config: Config,
    store: Option<Box<dyn KeyValueStore>>,
    /// Tokio runtime for image decoding and notifications
    tokio_runtime: tokio::runtime::Runtime,
}

impl WaylandBackend {
    pub fn new(config: Config, store: Box<dyn KeyValueStore>) -> Result<Self> {
        let tokio_runtime = tokio::runtime::Runtime::new()
            .context("Failed to create Tokio runtime for background work")?;
        Ok(Self {
            config,
            store: Some(store),
            tokio_runtime,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        info!("Starting Wayland backend");

        let store = self
            .store
            .take()
            .context("Wayland backend can only run once")?;

        // Connect to Wayland compositor
        let conn =
            Connection::connect_to_env().context("Failed to connect to Wayland compositor")?;
        debug!("Connected to Wayland display");

        let (globals, event_queue) =
            registry_queue_init(&conn).context("Failed to initialize Wayland registry")?;
        let qh = event_queue.handle();

        // Bind global interfaces
        let compositor_state =
            CompositorState::bind(&globals, &qh).context("wl_compositor not available")?;
        debug!("Bound compositor");

        let xdg_shell = XdgShell::bind(&globals, &qh).context("xdg_wm_base not available")?;
        debug!("Bound xdg shell");

        let shm = Shm::bind(&globals, &qh).context("wl_shm not available")?;
        debug!("Bound shared memory");

        let output_state = OutputState::new(&globals, &qh);
        let seat_state = SeatState::new(&globals, &qh);
        let registry_state = RegistryState::new(&globals);

        let config = self.config.clone();
        debug!("  Storage key: {}", config.storage.key);
        debug!("  Download file: {}", config.export.filename);
        debug!("  Extra swatches: {}", config.ui.palette.len());
        debug!("  Buffer count: {}", config.performance.buffer_count);
        debug!("  VSync: {}", config.performance.enable_vsync);

        let action_map = config
            .keybindings
            .build_action_map()
            .map_err(|e| anyhow::anyhow!("Invalid keybindings: {}", e))?;

        let mut event_loop: EventLoop<WaylandState> =
            EventLoop::try_new().context("Failed to create event loop")?;
        let loop_handle = event_loop.handle();

        WaylandSource::new(conn.clone(), event_queue)
            .insert(loop_handle.clone())
            .map_err(|e| anyhow::anyhow!("Failed to register Wayland source: {}", e.error))?;

        // Decode completions ping the loop so restored images show up without input.
        let (ping, ping_source) = make_ping().context("Failed to create decode waker")?;
        loop_handle
            .insert_source(ping_source, |_, _, state: &mut WaylandState| {
                state.pump_loads();
            })
            .map_err(|e| anyhow::anyhow!("Failed to register decode waker: {}", e.error))?;

        let mut loader = ImageLoader::new(self.tokio_runtime.handle());
        loader.set_waker(ping);

        let options = ViewOptions {
            storage_key: config.storage.key.clone(),
            download: config.export.download_config(),
            confirm_save: config.ui.confirm_save,
        };
        let mut view = DrawingView::new(store, loader, action_map, options);
        view.attach_surface()
            .context("Failed to create canvas surface")?;

        let tokio_handle = self.tokio_runtime.handle().clone();
        let mut state = WaylandState::new(
            registry_state,
            compositor_state,
            xdg_shell,
            shm,
            output_state,
            seat_state,
            config,
            view,
            tokio_handle,
        );

        info!("Creating window");
        let wl_surface = state.compositor_state.create_surface(&qh);
        let window =
            state
                .xdg_shell
                .create_window(wl_surface, WindowDecorations::RequestServer, &qh);
        window.set_title(WINDOW_TITLE);
        window.set_app_id(APP_ID);
        window.set_min_size(Some((MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)));
        window.commit();

        state.surface.set_window(window);
        info!("Window created");

        let mut consecutive_render_failures = 0u32;

        let mut loop_error: Option<anyhow::Error> = None;
        loop {
            if state.view.should_exit {
                info!("Exit requested, breaking event loop");
                break;
            }

            if let Err(e) = event_loop.dispatch(None, &mut state) {
                warn!("Event loop error: {}", e);
                loop_error = Some(anyhow::anyhow!("Wayland event loop error: {}", e));
                break;
            }

            if state.view.should_exit {
                info!("Exit requested after dispatch, breaking event loop");
                break;
            }

            state.pump_loads();
            state.flush_notices();

            // Render if configured and needs redraw, but only if no frame callback pending
            // This throttles rendering to display refresh rate (when vsync is enabled)
            let can_render = state.surface.is_configured()
                && state.view.needs_redraw
                && (!state.surface.frame_callback_pending()
                    || !state.config.performance.enable_vsync);

            if can_render {
                match state.render(&qh) {
                    Ok(()) => {
                        consecutive_render_failures = 0;
                        state.view.needs_redraw = false;
                        if state.config.performance.enable_vsync {
                            state.surface.set_frame_callback_pending(true);
                        }
                    }
                    Err(e) => {
                        consecutive_render_failures += 1;
                        warn!(
                            "Rendering error (attempt {}/{}): {}",
                            consecutive_render_failures, MAX_RENDER_FAILURES, e
                        );

                        if consecutive_render_failures >= MAX_RENDER_FAILURES {
                            return Err(anyhow::anyhow!(
                                "Too many consecutive render failures ({}), exiting: {}",
                                consecutive_render_failures,
                                e
                            ));
                        }

                        // Clear redraw flag to avoid infinite error loop
                        state.view.needs_redraw = false;
                    }
                }
            } else if state.view.needs_redraw && state.surface.frame_callback_pending() {
                debug!("Main loop: Skipping render - frame callback already pending");
            }
        }

        info!("Wayland backend exiting");
        state.flush_notices();

        match loop_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
