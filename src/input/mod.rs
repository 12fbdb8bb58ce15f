//! Input handling and the drawing view state machine.
//!
//! This module translates backend keyboard and pointer events into operations
//! on the canvas. [`DrawingView`] owns the raster surface, the undo history,
//! and the current stroke settings; it also drives saving and retrieving the
//! persisted snapshot.

pub mod events;
pub mod modifiers;
pub mod state;

pub use events::{Key, MouseButton};
pub use modifiers::Modifiers;
pub use state::{ColorField, Dialog, DrawingState, DrawingView, HexEntry, Notice, ViewOptions};
