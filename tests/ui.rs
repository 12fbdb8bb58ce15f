use cairo::{Context, ImageSurface};
use sketchpad::config::KeybindingsConfig;
use sketchpad::draw::{ImageLoader, RED};
use sketchpad::input::{ColorField, DrawingView, Key, ViewOptions};
use sketchpad::storage::MemoryStore;
use sketchpad::ui::{self, Layout};

fn make_view(runtime: &tokio::runtime::Runtime) -> DrawingView {
    let action_map = KeybindingsConfig::default().build_action_map().unwrap();
    let mut view = DrawingView::new(
        Box::new(MemoryStore::new()),
        ImageLoader::new(runtime.handle()),
        action_map,
        ViewOptions::default(),
    );
    view.attach_surface().unwrap();
    view
}

fn surface_with_context(width: i32, height: i32) -> (ImageSurface, Context) {
    let surface = ImageSurface::create(cairo::Format::ARgb32, width, height).unwrap();
    let ctx = Context::new(&surface).unwrap();
    (surface, ctx)
}

fn surface_has_pixels(surface: &mut ImageSurface) -> bool {
    surface
        .data()
        .map(|data| data.iter().any(|byte| *byte != 0))
        .unwrap_or(false)
}

/// Reads one pixel as (r, g, b, a), assuming a little-endian host.
fn pixel_at(surface: &mut ImageSurface, x: f64, y: f64) -> [u8; 4] {
    let stride = surface.stride() as usize;
    let data = surface.data().unwrap();
    let offset = y as usize * stride + x as usize * 4;
    [data[offset + 2], data[offset + 1], data[offset], data[offset + 3]]
}

#[test]
fn render_window_draws_content() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let view = make_view(&runtime);
    let layout = Layout::compute(800, 480);
    let palette = ui::palette(&[]);

    let (mut surface, ctx) = surface_with_context(800, 480);
    ui::render_window(&ctx, &layout, &view, &palette);
    drop(ctx);
    assert!(surface_has_pixels(&mut surface));
}

#[test]
fn canvas_region_shows_the_buffer() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut view = make_view(&runtime);
    view.set_background(RED);
    let layout = Layout::compute(800, 480);

    let (mut surface, ctx) = surface_with_context(800, 480);
    ui::render_canvas(&ctx, &layout, &view);
    drop(ctx);

    let (cx, cy) = layout.canvas.center();
    assert_eq!(pixel_at(&mut surface, cx, cy), [255, 0, 0, 255]);
}

#[test]
fn open_dialog_dims_the_window() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut view = make_view(&runtime);
    let layout = Layout::compute(800, 480);
    let palette = ui::palette(&[]);

    let (mut plain, ctx) = surface_with_context(800, 480);
    ui::render_window(&ctx, &layout, &view, &palette);
    drop(ctx);

    view.save();
    assert!(view.dialog().is_some());
    let (mut dimmed, ctx) = surface_with_context(800, 480);
    ui::render_window(&ctx, &layout, &view, &palette);
    drop(ctx);

    // A corner outside the dialog panel gets darker.
    let before = pixel_at(&mut plain, 2.0, 2.0);
    let after = pixel_at(&mut dimmed, 2.0, 2.0);
    assert!(after[0] < before[0]);
}

#[test]
fn render_actions_draws_every_button() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut view = make_view(&runtime);
    view.toggle_eraser();
    let layout = Layout::compute(800, 480);

    let (mut surface, ctx) = surface_with_context(800, 480);
    ui::render_actions(&ctx, &layout, &view);
    drop(ctx);

    for (action, rect) in &layout.actions {
        let (x, y) = (rect.x + 2.0, rect.y + 2.0);
        assert_eq!(
            pixel_at(&mut surface, x, y)[3],
            255,
            "{:?} button should be painted",
            action
        );
    }
}

#[test]
fn hex_field_in_edit_mode_is_drawn_as_an_input() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut view = make_view(&runtime);
    let layout = Layout::compute(800, 480);
    let palette = ui::palette(&[]);
    let hex = layout.background_hex;
    let (x, y) = (hex.x + hex.width - 6.0, hex.y + hex.height / 2.0);

    let (mut idle, ctx) = surface_with_context(800, 480);
    ui::render_toolbar(&ctx, &layout, &view, &palette);
    drop(ctx);
    assert_eq!(pixel_at(&mut idle, x, y)[3], 0);

    view.begin_hex_entry(ColorField::Background);
    view.on_key_press(Key::Char('f'));
    let (mut editing, ctx) = surface_with_context(800, 480);
    ui::render_toolbar(&ctx, &layout, &view, &palette);
    drop(ctx);
    assert_eq!(pixel_at(&mut editing, x, y), [255, 255, 255, 255]);
}
