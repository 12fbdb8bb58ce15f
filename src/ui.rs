//! Window layout and rendering: toolbars, the canvas region, action buttons, dialogs.
//!
//! [`Layout`] is pure geometry computed from the window size; the `render_*`
//! functions paint onto any Cairo context so they can be exercised against an
//! `ImageSurface` in tests.

use crate::config::Action;
use crate::draw::{CANVAS_HEIGHT, CANVAS_WIDTH, Color, LineWidth, NAMED_PALETTE, WIDTH_PRESETS};
use crate::input::{ColorField, Dialog, DrawingView};

// ============================================================================
// UI Layout Constants (not configurable)
// ============================================================================

/// Minimum size requested from the compositor. Smaller configures still lay out,
/// with a shrunken canvas.
pub const MIN_WINDOW_WIDTH: u32 = 640;
pub const MIN_WINDOW_HEIGHT: u32 = 420;

const PADDING: f64 = 12.0;
/// Height of the "Text Color" / "Background" / "Line Width" captions
const LABEL_HEIGHT: f64 = 20.0;
/// Height of one row of toolbar controls
const ROW_HEIGHT: f64 = 22.0;
/// Rows of controls under each caption
const CONTROL_ROWS: usize = 3;
/// Gap between adjacent controls
const GAP: f64 = 4.0;
const SWATCH_MAX: f64 = 22.0;
const ACTION_BUTTON_WIDTH: f64 = 92.0;
const ACTION_BUTTON_HEIGHT: f64 = 40.0;
const DIALOG_WIDTH: f64 = 340.0;
const DIALOG_HEIGHT: f64 = 140.0;
const DIALOG_BUTTON_WIDTH: f64 = 90.0;
const DIALOG_BUTTON_HEIGHT: f64 = 32.0;

const UI_FONT: &str = "Sans 10";
const UI_FONT_BOLD: &str = "Sans Bold 10";

const WINDOW_BG: [f64; 3] = [0.953, 0.957, 0.965];
const LABEL_TEXT: [f64; 3] = [0.15, 0.15, 0.15];
const BORDER: [f64; 3] = [0.72, 0.72, 0.72];
const SELECTED_BORDER: [f64; 3] = [0.1, 0.1, 0.1];
const ERASER_ACTIVE: [f64; 3] = [1.0, 0.753, 0.796];
const ERASER_IDLE: [f64; 3] = [0.502, 0.502, 0.502];

/// Toolbar buttons along the bottom edge, in display order.
pub const ACTION_BUTTONS: [(Action, &str); 5] = [
    (Action::ClearCanvas, "Clear"),
    (Action::Save, "Save"),
    (Action::Retrieve, "Retrieve"),
    (Action::Undo, "Undo"),
    (Action::ToggleEraser, "Eraser"),
];

/// Axis-aligned rectangle in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    fn path(&self, ctx: &cairo::Context) {
        ctx.rectangle(self.x, self.y, self.width, self.height);
    }
}

/// What a window position points at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiTarget {
    Canvas,
    StrokeSwatch(usize),
    BackgroundSwatch(usize),
    /// A picker's hex value field, which accepts any typed color
    HexField(ColorField),
    Width(LineWidth),
    Action(Action),
    DialogOk,
    DialogCancel,
}

/// Geometry of the modal dialog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialogLayout {
    pub panel: Rect,
    pub ok: Rect,
    pub cancel: Rect,
    /// OK button position when there is no Cancel
    pub ok_alone: Rect,
}

/// Positions of every control for one window size.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub stroke_group: Rect,
    pub background_group: Rect,
    pub width_group: Rect,
    pub stroke_swatches: Vec<Rect>,
    pub background_swatches: Vec<Rect>,
    /// Rectangle the current stroke color's hex value is shown in
    pub stroke_hex: Rect,
    pub background_hex: Rect,
    pub width_buttons: Vec<(LineWidth, Rect)>,
    pub canvas: Rect,
    pub actions: Vec<(Action, Rect)>,
    pub dialog: DialogLayout,
}

impl Layout {
    /// Layout with the built-in palette only.
    pub fn compute(width: u32, height: u32) -> Self {
        Self::with_palette(width, height, NAMED_PALETTE.len())
    }

    /// Layout for a palette of `swatch_count` colors.
    ///
    /// Windows below the minimum size keep their size; the canvas region
    /// shrinks down to a single pixel and controls may be cut off.
    pub fn with_palette(width: u32, height: u32, swatch_count: usize) -> Self {
        let width = width.max(1) as f64;
        let height = height.max(1) as f64;

        let group_width = ((width - PADDING * 4.0) / 3.0).max(1.0);
        let group_height = LABEL_HEIGHT + ROW_HEIGHT * CONTROL_ROWS as f64;
        let group = |index: usize| {
            Rect::new(
                PADDING + index as f64 * (group_width + PADDING),
                PADDING,
                group_width,
                group_height,
            )
        };
        let stroke_group = group(0);
        let background_group = group(1);
        let width_group = group(2);

        let (stroke_swatches, stroke_hex) = swatch_grid(stroke_group, swatch_count);
        let (background_swatches, background_hex) = swatch_grid(background_group, swatch_count);

        let cell_width = ((group_width - GAP * 2.0) / 3.0).max(1.0);
        let width_buttons = WIDTH_PRESETS
            .iter()
            .enumerate()
            .filter_map(|(i, px)| {
                let rect = Rect::new(
                    width_group.x + (i % 3) as f64 * (cell_width + GAP),
                    width_group.y + LABEL_HEIGHT + (i / 3) as f64 * ROW_HEIGHT,
                    cell_width,
                    ROW_HEIGHT - 2.0,
                );
                LineWidth::from_px(*px).map(|w| (w, rect))
            })
            .collect();

        let bottom_bar_top = height - PADDING - ACTION_BUTTON_HEIGHT;
        let canvas_top = stroke_group.y + group_height + PADDING;
        let canvas = Rect::new(
            PADDING,
            canvas_top,
            (width - PADDING * 2.0).max(1.0),
            (bottom_bar_top - PADDING - canvas_top).max(1.0),
        );

        let buttons_width = ACTION_BUTTONS.len() as f64 * ACTION_BUTTON_WIDTH
            + (ACTION_BUTTONS.len() - 1) as f64 * GAP;
        let buttons_left = (width - buttons_width) / 2.0;
        let actions = ACTION_BUTTONS
            .iter()
            .enumerate()
            .map(|(i, (action, _))| {
                (
                    *action,
                    Rect::new(
                        buttons_left + i as f64 * (ACTION_BUTTON_WIDTH + GAP),
                        bottom_bar_top,
                        ACTION_BUTTON_WIDTH,
                        ACTION_BUTTON_HEIGHT,
                    ),
                )
            })
            .collect();

        let panel = Rect::new(
            (width - DIALOG_WIDTH) / 2.0,
            (height - DIALOG_HEIGHT) / 2.0,
            DIALOG_WIDTH,
            DIALOG_HEIGHT,
        );
        let button_y = panel.y + panel.height - PADDING - DIALOG_BUTTON_HEIGHT;
        let right = panel.x + panel.width - PADDING;
        let dialog = DialogLayout {
            panel,
            ok: Rect::new(
                right - DIALOG_BUTTON_WIDTH * 2.0 - GAP * 2.0,
                button_y,
                DIALOG_BUTTON_WIDTH,
                DIALOG_BUTTON_HEIGHT,
            ),
            cancel: Rect::new(
                right - DIALOG_BUTTON_WIDTH,
                button_y,
                DIALOG_BUTTON_WIDTH,
                DIALOG_BUTTON_HEIGHT,
            ),
            ok_alone: Rect::new(
                right - DIALOG_BUTTON_WIDTH,
                button_y,
                DIALOG_BUTTON_WIDTH,
                DIALOG_BUTTON_HEIGHT,
            ),
        };

        Self {
            width,
            height,
            stroke_group,
            background_group,
            width_group,
            stroke_swatches,
            background_swatches,
            stroke_hex,
            background_hex,
            width_buttons,
            canvas,
            actions,
            dialog,
        }
    }

    /// Maps a window position to the control under it.
    ///
    /// While a dialog is open only its buttons respond.
    pub fn hit_test(&self, x: f64, y: f64, dialog: Option<&Dialog>) -> Option<UiTarget> {
        if let Some(dialog) = dialog {
            return if dialog.has_cancel() {
                if self.dialog.ok.contains(x, y) {
                    Some(UiTarget::DialogOk)
                } else if self.dialog.cancel.contains(x, y) {
                    Some(UiTarget::DialogCancel)
                } else {
                    None
                }
            } else if self.dialog.ok_alone.contains(x, y) {
                Some(UiTarget::DialogOk)
            } else {
                None
            };
        }

        if self.canvas.contains(x, y) {
            return Some(UiTarget::Canvas);
        }
        if let Some(i) = self.stroke_swatches.iter().position(|r| r.contains(x, y)) {
            return Some(UiTarget::StrokeSwatch(i));
        }
        if let Some(i) = self.background_swatches.iter().position(|r| r.contains(x, y)) {
            return Some(UiTarget::BackgroundSwatch(i));
        }
        if self.stroke_hex.contains(x, y) {
            return Some(UiTarget::HexField(ColorField::Stroke));
        }
        if self.background_hex.contains(x, y) {
            return Some(UiTarget::HexField(ColorField::Background));
        }
        if let Some((width, _)) = self.width_buttons.iter().find(|(_, r)| r.contains(x, y)) {
            return Some(UiTarget::Width(*width));
        }
        self.actions
            .iter()
            .find(|(_, r)| r.contains(x, y))
            .map(|(action, _)| UiTarget::Action(*action))
    }

    /// Converts a window position to coordinates relative to the canvas region.
    pub fn canvas_local(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.canvas.x, y - self.canvas.y)
    }
}

/// Lays swatches out in two rows under the caption, hex value in the third row.
fn swatch_grid(group: Rect, count: usize) -> (Vec<Rect>, Rect) {
    let top = group.y + LABEL_HEIGHT;
    let hex = Rect::new(group.x, top + ROW_HEIGHT * 2.0, group.width, ROW_HEIGHT - 2.0);
    if count == 0 {
        return (Vec::new(), hex);
    }

    let columns = count.div_ceil(2);
    let size = ((group.width - GAP * (columns as f64 - 1.0)) / columns as f64)
        .min(SWATCH_MAX)
        .max(4.0);
    let swatches = (0..count)
        .map(|i| {
            Rect::new(
                group.x + (i % columns) as f64 * (size + GAP),
                top + (i / columns) as f64 * ROW_HEIGHT,
                size,
                size.min(ROW_HEIGHT - 2.0),
            )
        })
        .collect();
    (swatches, hex)
}

/// The palette shown in both color pickers: named colors, then configured extras.
pub fn palette(extra: &[Color]) -> Vec<Color> {
    NAMED_PALETTE
        .iter()
        .map(|(_, color)| *color)
        .chain(extra.iter().copied())
        .collect()
}

// ============================================================================
// Rendering
// ============================================================================

fn set_rgb(ctx: &cairo::Context, [r, g, b]: [f64; 3]) {
    ctx.set_source_rgb(r, g, b);
}

/// Draws `text` vertically centered in `rect`; `centered` also centers it
/// horizontally.
fn draw_text(
    ctx: &cairo::Context,
    text: &str,
    font: &str,
    rect: Rect,
    centered: bool,
    rgb: [f64; 3],
) {
    let layout = pangocairo::functions::create_layout(ctx);
    let font_desc = pango::FontDescription::from_string(font);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);

    let (_, logical) = layout.extents();
    let text_width = logical.width() as f64 / pango::SCALE as f64;
    let text_height = logical.height() as f64 / pango::SCALE as f64;
    let x = if centered {
        rect.x + (rect.width - text_width) / 2.0
    } else {
        rect.x
    };
    let y = rect.y + (rect.height - text_height) / 2.0;

    set_rgb(ctx, rgb);
    ctx.move_to(x, y);
    pangocairo::functions::show_layout(ctx, &layout);
}

fn outline(ctx: &cairo::Context, rect: Rect, width: f64, rgb: [f64; 3]) {
    set_rgb(ctx, rgb);
    ctx.set_line_width(width);
    ctx.rectangle(
        rect.x + width / 2.0,
        rect.y + width / 2.0,
        rect.width - width,
        rect.height - width,
    );
    let _ = ctx.stroke();
}

fn swatch_row(
    ctx: &cairo::Context,
    swatches: &[Rect],
    hex_rect: Rect,
    palette: &[Color],
    current: Color,
    typing: Option<String>,
) {
    for (rect, color) in swatches.iter().zip(palette) {
        color.set_source(ctx);
        rect.path(ctx);
        let _ = ctx.fill();
        if color.to_hex() == current.to_hex() {
            outline(ctx, *rect, 2.0, SELECTED_BORDER);
        } else {
            outline(ctx, *rect, 1.0, BORDER);
        }
    }

    // Current value chip followed by its hex string
    let chip = Rect::new(hex_rect.x, hex_rect.y + 2.0, hex_rect.height - 4.0, hex_rect.height - 4.0);
    current.set_source(ctx);
    chip.path(ctx);
    let _ = ctx.fill();
    outline(ctx, chip, 1.0, BORDER);

    let text_rect = Rect::new(
        chip.x + chip.width + GAP * 2.0,
        hex_rect.y,
        hex_rect.width - chip.width - GAP * 2.0,
        hex_rect.height,
    );
    match typing {
        Some(value) => {
            let field = Rect::new(
                text_rect.x - GAP,
                text_rect.y,
                text_rect.width + GAP,
                text_rect.height,
            );
            set_rgb(ctx, [1.0, 1.0, 1.0]);
            field.path(ctx);
            let _ = ctx.fill();
            outline(ctx, field, 1.0, SELECTED_BORDER);
            draw_text(ctx, &format!("{value}_"), UI_FONT, text_rect, false, LABEL_TEXT);
        }
        None => draw_text(ctx, &current.to_hex(), UI_FONT, text_rect, false, LABEL_TEXT),
    }
}

/// Renders the three toolbar inputs: stroke color, background color, line width.
pub fn render_toolbar(ctx: &cairo::Context, layout: &Layout, view: &DrawingView, palette: &[Color]) {
    ctx.save().ok();

    for (group, caption) in [
        (layout.stroke_group, "Text Color"),
        (layout.background_group, "Background"),
        (layout.width_group, "Line Width"),
    ] {
        let caption_rect = Rect::new(group.x, group.y, group.width, LABEL_HEIGHT);
        draw_text(ctx, caption, UI_FONT_BOLD, caption_rect, true, LABEL_TEXT);
    }

    let typing = |field: ColorField| {
        view.hex_entry()
            .filter(|entry| entry.field == field)
            .map(|entry| entry.display())
    };
    swatch_row(
        ctx,
        &layout.stroke_swatches,
        layout.stroke_hex,
        palette,
        view.stroke_color(),
        typing(ColorField::Stroke),
    );
    swatch_row(
        ctx,
        &layout.background_swatches,
        layout.background_hex,
        palette,
        view.background(),
        typing(ColorField::Background),
    );

    for (width, rect) in &layout.width_buttons {
        let selected = *width == view.line_width();
        set_rgb(ctx, if selected { [0.82, 0.87, 0.97] } else { [1.0, 1.0, 1.0] });
        rect.path(ctx);
        let _ = ctx.fill();
        outline(
            ctx,
            *rect,
            if selected { 2.0 } else { 1.0 },
            if selected { SELECTED_BORDER } else { BORDER },
        );
        draw_text(ctx, &width.to_string(), UI_FONT, *rect, true, LABEL_TEXT);
    }

    ctx.restore().ok();
}

/// Blits the canvas buffer stretched over the canvas region.
pub fn render_canvas(ctx: &cairo::Context, layout: &Layout, view: &DrawingView) {
    let rect = layout.canvas;
    ctx.save().ok();

    match view.surface() {
        Some(surface) => {
            rect.path(ctx);
            ctx.clip();
            ctx.translate(rect.x, rect.y);
            ctx.scale(
                rect.width / CANVAS_WIDTH as f64,
                rect.height / CANVAS_HEIGHT as f64,
            );
            if let Err(err) = ctx.set_source_surface(surface.image(), 0.0, 0.0) {
                log::warn!("Failed to use canvas as source: {}", err);
            } else {
                ctx.source().set_filter(cairo::Filter::Good);
                let _ = ctx.paint();
            }
        }
        None => {
            set_rgb(ctx, [1.0, 1.0, 1.0]);
            rect.path(ctx);
            let _ = ctx.fill();
        }
    }

    ctx.restore().ok();
    outline(ctx, rect, 1.0, BORDER);
}

fn action_fill(action: Action, eraser_active: bool) -> [f64; 3] {
    match action {
        Action::ClearCanvas => [0.098, 0.529, 0.329],
        Action::Save => [0.863, 0.208, 0.271],
        Action::Retrieve => [1.0, 0.757, 0.027],
        Action::Undo => [0.051, 0.792, 0.941],
        _ if eraser_active => ERASER_ACTIVE,
        _ => ERASER_IDLE,
    }
}

/// Renders the Clear, Save, Retrieve, Undo and Eraser buttons.
pub fn render_actions(ctx: &cairo::Context, layout: &Layout, view: &DrawingView) {
    ctx.save().ok();

    for ((action, rect), (_, label)) in layout.actions.iter().zip(ACTION_BUTTONS.iter()) {
        let is_eraser = *action == Action::ToggleEraser;
        if is_eraser && view.is_eraser() {
            // Drop shadow: 2px offset, soft edge
            for (spread, alpha) in [(5.0, 0.12), (3.0, 0.2), (1.0, 0.35)] {
                ctx.set_source_rgba(0.0, 0.0, 0.0, alpha);
                ctx.rectangle(
                    rect.x + 2.0 - spread / 2.0,
                    rect.y + 2.0 - spread / 2.0,
                    rect.width + spread,
                    rect.height + spread,
                );
                let _ = ctx.fill();
            }
        }

        set_rgb(ctx, action_fill(*action, view.is_eraser()));
        rect.path(ctx);
        let _ = ctx.fill();

        let text = if matches!(action, Action::Retrieve) {
            [0.1, 0.1, 0.1]
        } else {
            [1.0, 1.0, 1.0]
        };
        draw_text(ctx, label, UI_FONT_BOLD, *rect, true, text);
    }

    ctx.restore().ok();
}

/// Draws the dialog centered over a dimmed window.
pub fn render_dialog(ctx: &cairo::Context, layout: &Layout, dialog: &Dialog) {
    ctx.save().ok();

    ctx.set_source_rgba(0.0, 0.0, 0.0, 0.45);
    ctx.rectangle(0.0, 0.0, layout.width, layout.height);
    let _ = ctx.fill();

    let panel = layout.dialog.panel;
    set_rgb(ctx, [1.0, 1.0, 1.0]);
    panel.path(ctx);
    let _ = ctx.fill();
    outline(ctx, panel, 1.0, BORDER);

    let message_rect = Rect::new(
        panel.x + PADDING * 2.0,
        panel.y + PADDING,
        panel.width - PADDING * 4.0,
        panel.height - DIALOG_BUTTON_HEIGHT - PADDING * 3.0,
    );
    draw_text(ctx, dialog.message(), "Sans 12", message_rect, false, LABEL_TEXT);

    let mut buttons = Vec::with_capacity(2);
    if dialog.has_cancel() {
        buttons.push((layout.dialog.ok, "OK", true));
        buttons.push((layout.dialog.cancel, "Cancel", false));
    } else {
        buttons.push((layout.dialog.ok_alone, "OK", true));
    }
    for (rect, label, primary) in buttons {
        set_rgb(ctx, if primary { [0.051, 0.431, 0.992] } else { [0.9, 0.9, 0.9] });
        rect.path(ctx);
        let _ = ctx.fill();
        let text = if primary { [1.0, 1.0, 1.0] } else { LABEL_TEXT };
        draw_text(ctx, label, UI_FONT_BOLD, rect, true, text);
    }

    ctx.restore().ok();
}

/// Paints the whole window.
pub fn render_window(ctx: &cairo::Context, layout: &Layout, view: &DrawingView, palette: &[Color]) {
    set_rgb(ctx, WINDOW_BG);
    let _ = ctx.paint();

    render_toolbar(ctx, layout, view, palette);
    render_canvas(ctx, layout, view);
    render_actions(ctx, layout, view);
    if let Some(dialog) = view.dialog() {
        render_dialog(ctx, layout, dialog);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_windows_keep_their_size() {
        let layout = Layout::compute(MIN_WINDOW_WIDTH / 2, MIN_WINDOW_HEIGHT / 2);
        assert_eq!(layout.width, (MIN_WINDOW_WIDTH / 2) as f64);
        assert_eq!(layout.height, (MIN_WINDOW_HEIGHT / 2) as f64);

        let canvas = layout.canvas;
        assert!(canvas.width > 0.0 && canvas.height > 0.0);
        assert!(canvas.x + canvas.width <= layout.width);
        assert!(canvas.y + canvas.height <= layout.height);
        let (cx, cy) = canvas.center();
        assert_eq!(layout.hit_test(cx, cy, None), Some(UiTarget::Canvas));
    }

    #[test]
    fn tiny_windows_keep_a_one_pixel_canvas() {
        let layout = Layout::compute(10, 10);
        assert_eq!((layout.width, layout.height), (10.0, 10.0));
        assert!(layout.canvas.width >= 1.0);
        assert!(layout.canvas.height >= 1.0);
        assert!(layout.width_buttons.iter().all(|(_, r)| r.width >= 1.0));
    }

    #[test]
    fn canvas_fills_space_between_bars() {
        let layout = Layout::compute(1200, 900);
        assert!(layout.canvas.y > layout.stroke_group.y + layout.stroke_group.height);
        let (_, first_action) = layout.actions[0];
        assert!(layout.canvas.y + layout.canvas.height < first_action.y);
        assert_eq!(layout.canvas.width, 1200.0 - 2.0 * PADDING);
    }

    #[test]
    fn hit_test_finds_each_control() {
        let layout = Layout::compute(800, 600);

        let (cx, cy) = layout.canvas.center();
        assert_eq!(layout.hit_test(cx, cy, None), Some(UiTarget::Canvas));

        for (i, rect) in layout.stroke_swatches.iter().enumerate() {
            let (x, y) = rect.center();
            assert_eq!(layout.hit_test(x, y, None), Some(UiTarget::StrokeSwatch(i)));
        }
        for (i, rect) in layout.background_swatches.iter().enumerate() {
            let (x, y) = rect.center();
            assert_eq!(layout.hit_test(x, y, None), Some(UiTarget::BackgroundSwatch(i)));
        }
        let (x, y) = layout.stroke_hex.center();
        assert_eq!(
            layout.hit_test(x, y, None),
            Some(UiTarget::HexField(ColorField::Stroke))
        );
        let (x, y) = layout.background_hex.center();
        assert_eq!(
            layout.hit_test(x, y, None),
            Some(UiTarget::HexField(ColorField::Background))
        );
        assert_eq!(layout.width_buttons.len(), WIDTH_PRESETS.len());
        for (width, rect) in &layout.width_buttons {
            let (x, y) = rect.center();
            assert_eq!(layout.hit_test(x, y, None), Some(UiTarget::Width(*width)));
        }
        for (action, rect) in &layout.actions {
            let (x, y) = rect.center();
            assert_eq!(layout.hit_test(x, y, None), Some(UiTarget::Action(*action)));
        }
        assert_eq!(layout.hit_test(1.0, 1.0, None), None);
    }

    #[test]
    fn dialog_captures_hits() {
        let layout = Layout::compute(800, 600);
        let confirm = Dialog::ConfirmSave { png: Vec::new() };
        let alert = Dialog::Alert {
            message: Dialog::NO_SAVED_IMAGE.to_string(),
        };

        let (cx, cy) = layout.canvas.center();
        assert_eq!(layout.hit_test(cx, cy, Some(&confirm)), None);

        let (x, y) = layout.dialog.ok.center();
        assert_eq!(layout.hit_test(x, y, Some(&confirm)), Some(UiTarget::DialogOk));
        let (x, y) = layout.dialog.cancel.center();
        assert_eq!(layout.hit_test(x, y, Some(&confirm)), Some(UiTarget::DialogCancel));
        // Alerts only have OK, placed where Cancel would be.
        assert_eq!(layout.hit_test(x, y, Some(&alert)), Some(UiTarget::DialogOk));
    }

    #[test]
    fn extra_palette_colors_get_swatches() {
        let extra = [Color::from_rgb8(1, 2, 3), Color::from_rgb8(4, 5, 6)];
        let colors = palette(&extra);
        assert_eq!(colors.len(), 10);
        let layout = Layout::with_palette(800, 600, colors.len());
        assert_eq!(layout.stroke_swatches.len(), 10);
        assert!(layout.stroke_swatches.iter().all(|r| {
            r.x + r.width <= layout.stroke_group.x + layout.stroke_group.width + 0.001
        }));
    }

    #[test]
    fn canvas_local_is_relative_to_region() {
        let layout = Layout::compute(800, 600);
        assert_eq!(
            layout.canvas_local(layout.canvas.x + 5.0, layout.canvas.y + 7.0),
            (5.0, 7.0)
        );
    }
}
