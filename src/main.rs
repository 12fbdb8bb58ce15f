use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use sketchpad::{
    backend,
    config::Config,
    storage::{self, FileStore, KeyValueStore, MemoryStore},
};
use std::path::{Path, PathBuf};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SKETCHPAD_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "sketchpad")]
#[command(version = VERSION, about = "Freehand drawing canvas for Wayland desktops")]
struct Cli {
    /// Show where the saved canvas lives and what it contains, then exit
    #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["clear_storage", "export_saved"])]
    storage_info: bool,

    /// Delete the saved canvas, then exit
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "export_saved")]
    clear_storage: bool,

    /// Write the saved canvas to a PNG file, then exit
    #[arg(long, value_name = "PATH")]
    export_saved: Option<PathBuf>,

    /// Keep saves in memory for this session only
    #[arg(long, action = ArgAction::SetTrue)]
    ephemeral: bool,

    /// Write a documented config file to ~/.config/sketchpad/config.toml, then exit
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load config: {}. Using defaults.", e);
            Config::default()
        }
    };

    if cli.storage_info {
        return print_storage_info(&file_store(&config)?, &config.storage.key);
    }
    if cli.clear_storage {
        return clear_storage(&mut file_store(&config)?, &config.storage.key);
    }
    if let Some(target) = cli.export_saved.as_deref() {
        return export_saved(&file_store(&config)?, &config.storage.key, target);
    }

    if std::env::var("WAYLAND_DISPLAY").is_err() {
        log::error!("WAYLAND_DISPLAY not set - this application requires Wayland.");
        return Err(anyhow::anyhow!("Wayland environment required"));
    }

    let store: Box<dyn KeyValueStore> = if cli.ephemeral {
        log::info!("Ephemeral session: saves are kept in memory only");
        Box::new(MemoryStore::new())
    } else {
        match config.storage.resolved_directory() {
            Some(dir) => {
                log::info!("Saved canvas lives in {}", dir.display());
                Box::new(FileStore::new(dir))
            }
            None => {
                log::warn!("No data directory found; saves will not outlive this session");
                Box::new(MemoryStore::new())
            }
        }
    };

    backend::run_wayland(config, store)?;
    log::info!("Sketchpad closed.");
    Ok(())
}

fn file_store(config: &Config) -> Result<FileStore> {
    let dir = config
        .storage
        .resolved_directory()
        .context("Could not determine data directory; set storage.directory in the config")?;
    Ok(FileStore::new(dir))
}

fn print_storage_info(store: &FileStore, key: &str) -> Result<()> {
    let info = storage::inspect_snapshot(store, key)?;

    println!("Store file: {}", info.store_path.display());
    println!("Key: {}", info.key);
    if !info.exists {
        println!("Saved canvas: none (store file does not exist)");
        return Ok(());
    }

    if let Some(size) = info.size_bytes {
        println!("File size: {} bytes", size);
    }
    if let Some(modified) = info.modified {
        let local: chrono::DateTime<chrono::Local> = modified.into();
        println!("Last saved: {}", local.format("%Y-%m-%d %H:%M:%S"));
    }

    match (info.png_bytes, info.dimensions) {
        (Some(png_bytes), Some((width, height))) => {
            println!(
                "Saved canvas: {}x{} PNG ({} bytes, {} bytes encoded)",
                width,
                height,
                png_bytes,
                info.value_bytes.unwrap_or(0)
            );
        }
        (Some(png_bytes), None) => {
            println!("Saved canvas: PNG of unknown size ({} bytes)", png_bytes);
        }
        _ => println!("Saved canvas: none"),
    }
    Ok(())
}

fn clear_storage(store: &mut FileStore, key: &str) -> Result<()> {
    if storage::clear_snapshot(store, key)? {
        println!("Removed saved canvas from {}", store.path().display());
    } else {
        println!("No saved canvas to remove");
    }
    Ok(())
}

fn export_saved(store: &FileStore, key: &str, target: &Path) -> Result<()> {
    let png = storage::load_snapshot(store, key)
        .with_context(|| format!("Failed to read {}", store.path().display()))?
        .with_context(|| format!("No saved image under '{}'", key))?;

    std::fs::write(target, &png)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    println!("Exported saved canvas to {}", target.display());
    Ok(())
}
