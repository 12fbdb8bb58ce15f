//! Library exports for the sketchpad drawing canvas.
//!
//! The binary is a thin CLI over these modules; integration tests and the
//! schema dumper use them directly.

pub mod backend;
pub mod config;
pub mod draw;
pub mod export;
pub mod input;
pub mod notification;
pub mod storage;
pub mod ui;

pub use config::Config;
