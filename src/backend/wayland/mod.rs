//! Wayland window backend: an xdg-toplevel rendered through Cairo into SHM buffers.

mod backend;
mod handlers;
mod state;
mod surface;

pub use backend::WaylandBackend;
