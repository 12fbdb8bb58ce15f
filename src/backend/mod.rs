use anyhow::Result;

use crate::config::Config;
use crate::storage::KeyValueStore;

pub mod wayland;

/// Opens the drawing window and runs until it is closed.
///
/// # Arguments
/// * `config` - Validated configuration
/// * `store` - Where the saved canvas is persisted
pub fn run_wayland(config: Config, store: Box<dyn KeyValueStore>) -> Result<()> {
    let mut backend = wayland::WaylandBackend::new(config, store)?;
    backend.run()
}
