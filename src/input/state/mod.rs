mod actions;
mod core;
mod mouse;

pub use self::core::{
    ColorField, Dialog, DrawingState, DrawingView, HexEntry, Notice, ViewOptions,
};
