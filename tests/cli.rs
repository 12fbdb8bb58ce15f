use assert_cmd::Command;
use predicates::prelude::*;
use sketchpad::draw::{BLUE, Surface};
use sketchpad::storage::{self, FileStore};
use tempfile::TempDir;

fn sketchpad_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sketchpad").expect("binary exists");
    cmd.env_remove("WAYLAND_DISPLAY")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"));
    cmd
}

fn seed_saved_canvas(home: &TempDir) -> Vec<u8> {
    let surface = Surface::new().unwrap();
    surface.fill(BLUE).unwrap();
    let png = surface.encode_png().unwrap();

    let mut store = FileStore::new(home.path().join("data").join("sketchpad"));
    storage::store_snapshot(&mut store, storage::DEFAULT_SNAPSHOT_KEY, &png).unwrap();
    png
}

#[test]
fn sketchpad_help_prints_usage() {
    let home = TempDir::new().unwrap();
    sketchpad_cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Freehand drawing canvas for Wayland desktops",
        ));
}

#[test]
fn window_requires_wayland_env() {
    let home = TempDir::new().unwrap();
    sketchpad_cmd(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wayland environment required"));
}

#[test]
fn storage_info_reports_missing_store() {
    let home = TempDir::new().unwrap();
    sketchpad_cmd(&home)
        .arg("--storage-info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Key: canvasDoc"))
        .stdout(predicate::str::contains("Saved canvas: none"));
}

#[test]
fn storage_info_reports_saved_dimensions() {
    let home = TempDir::new().unwrap();
    seed_saved_canvas(&home);
    sketchpad_cmd(&home)
        .arg("--storage-info")
        .assert()
        .success()
        .stdout(predicate::str::contains("600x250 PNG"));
}

#[test]
fn export_saved_fails_without_a_save() {
    let home = TempDir::new().unwrap();
    let target = home.path().join("out.png");
    sketchpad_cmd(&home)
        .arg("--export-saved")
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No saved image"));
    assert!(!target.exists());
}

#[test]
fn export_saved_writes_the_stored_png() {
    let home = TempDir::new().unwrap();
    let png = seed_saved_canvas(&home);
    let target = home.path().join("out.png");

    sketchpad_cmd(&home)
        .arg("--export-saved")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported saved canvas"));
    assert_eq!(std::fs::read(&target).unwrap(), png);
}

#[test]
fn clear_storage_removes_the_save() {
    let home = TempDir::new().unwrap();
    seed_saved_canvas(&home);

    sketchpad_cmd(&home)
        .arg("--clear-storage")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed saved canvas"));
    sketchpad_cmd(&home)
        .arg("--clear-storage")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved canvas to remove"));
}
