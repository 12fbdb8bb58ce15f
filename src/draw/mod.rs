//! Raster drawing primitives (Cairo-based).
//!
//! This module defines the core drawing types used by the canvas:
//! - [`Color`]: RGBA color representation with hex conversion and a named palette
//! - [`Surface`]: the fixed-size raster buffer strokes are drawn into
//! - [`History`]: the linear stack of encoded snapshots behind undo
//! - [`LineWidth`]: stroke widths restricted to the selector presets
//! - [`ImageLoader`]: background PNG decoding for retrieve and undo

pub mod color;
pub mod history;
pub mod loader;
pub mod surface;
pub mod width;

pub use color::Color;
pub use history::{History, Snapshot};
pub use loader::{ImageLoader, LoadOutcome, LoadPurpose};
pub use surface::{
    CANVAS_HEIGHT, CANVAS_WIDTH, DecodedImage, Surface, SurfaceError, decode_png,
};
pub use width::{LineWidth, WIDTH_PRESETS};

pub use color::{BLACK, BLUE, GREEN, NAMED_PALETTE, ORANGE, PINK, RED, WHITE, YELLOW};
