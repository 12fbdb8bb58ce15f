//! Drawing view state: the canvas buffer and everything that mutates it.

use crate::config::{Action, KeyBinding};
use crate::draw::{
    BLACK, Color, History, ImageLoader, LineWidth, Snapshot, Surface, SurfaceError, WHITE,
};
use crate::export::DownloadConfig;
use crate::input::modifiers::Modifiers;
use crate::storage::{DEFAULT_SNAPSHOT_KEY, KeyValueStore};
use std::collections::HashMap;
use std::path::PathBuf;

/// Pointer state machine for the canvas.
#[derive(Debug, Default)]
pub enum DrawingState {
    /// No button held over the canvas
    #[default]
    Idle,
    /// A stroke is in progress
    Drawing {
        /// Buffer-space points of the current path, starting at pointer-down
        points: Vec<(f64, f64)>,
    },
}

/// Modal dialog owned by the view.
#[derive(Debug)]
pub enum Dialog {
    /// Save confirmation carrying the PNG encoded when Save was pressed.
    ConfirmSave { png: Vec<u8> },
    /// Informational alert with a single OK button.
    Alert { message: String },
}

impl Dialog {
    pub const CONFIRM_SAVE_TEXT: &'static str = "Click OK to download";
    pub const NO_SAVED_IMAGE: &'static str = "No Saved Image";

    pub fn message(&self) -> &str {
        match self {
            Dialog::ConfirmSave { .. } => Self::CONFIRM_SAVE_TEXT,
            Dialog::Alert { message } => message,
        }
    }

    /// Whether the dialog offers a Cancel button next to OK.
    pub fn has_cancel(&self) -> bool {
        matches!(self, Dialog::ConfirmSave { .. })
    }
}

/// One of the two color pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorField {
    Stroke,
    Background,
}

/// A hex color being typed into a picker's value field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexEntry {
    pub field: ColorField,
    /// Hex digits typed so far, lowercase and without the leading `#`
    pub digits: String,
}

impl HexEntry {
    /// `#rrggbb` has six digits; `#rgb` shorthand is also accepted on commit.
    pub const MAX_DIGITS: usize = 6;

    /// The value as shown in the field while typing.
    pub fn display(&self) -> String {
        format!("#{}", self.digits)
    }
}

/// Outcome of a background operation the user should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The download was written to this path.
    Downloaded(PathBuf),
    /// Persisting or downloading failed.
    SaveFailed(String),
    /// The persisted snapshot could not be read or decoded.
    RetrieveFailed(String),
    /// A stroke finished but its undo snapshot could not be captured.
    SnapshotFailed(String),
}

impl Notice {
    pub fn summary(&self) -> &'static str {
        match self {
            Notice::Downloaded(_) => "Canvas Saved",
            Notice::SaveFailed(_) => "Save Failed",
            Notice::RetrieveFailed(_) => "Retrieve Failed",
            Notice::SnapshotFailed(_) => "Undo Unavailable",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Notice::Downloaded(path) => format!("Downloaded to {}", path.display()),
            Notice::SaveFailed(msg) | Notice::RetrieveFailed(msg) | Notice::SnapshotFailed(msg) => {
                msg.clone()
            }
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::Downloaded(_))
    }
}

/// Settings the view takes from configuration.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Key the snapshot is persisted under
    pub storage_key: String,
    /// Where Save writes the download
    pub download: DownloadConfig,
    /// Ask before saving; when false Save acts as if OK was clicked
    pub confirm_save: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            download: DownloadConfig::default(),
            confirm_save: true,
        }
    }
}

/// The drawing view: a fixed-size raster canvas plus the UI state around it.
///
/// Pointer events arrive in display coordinates relative to the canvas
/// region and are scaled to buffer coordinates per axis. Every operation is
/// a silent no-op until [`attach_surface`](Self::attach_surface) has run.
pub struct DrawingView {
    pub(super) surface: Option<Surface>,
    pub(super) history: History,
    pub(super) stroke_color: Color,
    pub(super) background: Color,
    pub(super) line_width: LineWidth,
    pub(super) eraser: bool,
    /// Current pointer state machine
    pub state: DrawingState,
    /// Displayed size of the canvas region, if different from the buffer
    pub(super) display_size: Option<(f64, f64)>,
    pub(super) loader: ImageLoader,
    pub(super) store: Box<dyn KeyValueStore>,
    pub(super) options: ViewOptions,
    pub(super) dialog: Option<Dialog>,
    pub(super) hex_entry: Option<HexEntry>,
    pub(super) notices: Vec<Notice>,
    /// Current modifier key state
    pub modifiers: Modifiers,
    action_map: HashMap<KeyBinding, Action>,
    /// Whether the user asked to quit
    pub should_exit: bool,
    /// Whether the window needs to be repainted
    pub needs_redraw: bool,
}

impl DrawingView {
    /// Creates an unmounted view with default colors and width.
    pub fn new(
        store: Box<dyn KeyValueStore>,
        loader: ImageLoader,
        action_map: HashMap<KeyBinding, Action>,
        options: ViewOptions,
    ) -> Self {
        Self {
            surface: None,
            history: History::new(),
            stroke_color: BLACK,
            background: WHITE,
            line_width: LineWidth::DEFAULT,
            eraser: false,
            state: DrawingState::Idle,
            display_size: None,
            loader,
            store,
            options,
            dialog: None,
            hex_entry: None,
            notices: Vec::new(),
            modifiers: Modifiers::new(),
            action_map,
            should_exit: false,
            needs_redraw: true,
        }
    }

    /// Creates the canvas buffer and paints it with the current background.
    pub fn attach_surface(&mut self) -> Result<(), SurfaceError> {
        let surface = Surface::new()?;
        surface.fill(self.background)?;
        log::info!(
            "Canvas mounted ({}x{}, background {})",
            surface.width(),
            surface.height(),
            self.background.to_hex()
        );
        self.surface = Some(surface);
        self.history.clear();
        self.state = DrawingState::Idle;
        self.needs_redraw = true;
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Mutable access for pixel inspection.
    pub fn surface_mut(&mut self) -> Option<&mut Surface> {
        self.surface.as_mut()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn line_width(&self) -> LineWidth {
        self.line_width
    }

    pub fn is_eraser(&self) -> bool {
        self.eraser
    }

    /// True while a stroke is in progress.
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawingState::Drawing { .. })
    }

    /// The color strokes are painted with right now.
    pub fn effective_stroke_color(&self) -> Color {
        if self.eraser {
            self.background
        } else {
            self.stroke_color
        }
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    /// The hex value being typed, if a picker's field is in edit mode.
    pub fn hex_entry(&self) -> Option<&HexEntry> {
        self.hex_entry.as_ref()
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// The store the snapshot is persisted in.
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Drains pending user-facing notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(super) fn push_notice(&mut self, notice: Notice) {
        if notice.is_error() {
            log::warn!("{}: {}", notice.summary(), notice.body());
        } else {
            log::info!("{}: {}", notice.summary(), notice.body());
        }
        self.notices.push(notice);
    }

    /// Records the displayed size of the canvas region.
    ///
    /// Non-positive sizes are ignored.
    pub fn set_display_size(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.display_size = Some((width, height));
        }
    }

    /// Scales a display-space position to buffer coordinates, per axis.
    pub fn to_buffer_coords(&self, x: f64, y: f64) -> (f64, f64) {
        let Some(surface) = &self.surface else {
            return (x, y);
        };
        match self.display_size {
            Some((dw, dh)) => (
                x * surface.width() as f64 / dw,
                y * surface.height() as f64 / dh,
            ),
            None => (x, y),
        }
    }

    /// Sets the stroke color. The buffer is untouched.
    pub fn set_stroke_color(&mut self, color: Color) {
        if self.stroke_color != color {
            log::debug!("Stroke color {}", color.to_hex());
            self.stroke_color = color;
            self.needs_redraw = true;
        }
    }

    /// Changes the background, repainting the whole buffer and dropping history.
    ///
    /// Selecting the color that is already active changes nothing.
    pub fn set_background(&mut self, color: Color) {
        if self.background == color {
            return;
        }
        self.background = color;
        self.repaint_background();
    }

    pub(super) fn repaint_background(&mut self) {
        self.needs_redraw = true;
        let Some(surface) = &self.surface else {
            return;
        };
        if let Err(err) = surface.fill(self.background) {
            log::warn!("Failed to fill background: {}", err);
        }
        log::debug!(
            "Background {} applied, discarding {} undo entries",
            self.background.to_hex(),
            self.history.len()
        );
        self.history.clear();
    }

    /// Puts a picker's value field into edit mode.
    ///
    /// An entry already open in the other field is committed first; the same
    /// field keeps what was typed so far.
    pub fn begin_hex_entry(&mut self, field: ColorField) {
        if self.hex_entry.as_ref().is_some_and(|entry| entry.field == field) {
            return;
        }
        self.commit_hex_entry();
        log::debug!("Editing {:?} color value", field);
        self.hex_entry = Some(HexEntry {
            field,
            digits: String::new(),
        });
        self.needs_redraw = true;
    }

    /// Appends a typed character. Anything but a hex digit is ignored.
    pub(super) fn push_hex_digit(&mut self, c: char) {
        let Some(entry) = &mut self.hex_entry else {
            return;
        };
        if c.is_ascii_hexdigit() && entry.digits.len() < HexEntry::MAX_DIGITS {
            entry.digits.push(c.to_ascii_lowercase());
            self.needs_redraw = true;
        }
    }

    pub(super) fn pop_hex_digit(&mut self) {
        if let Some(entry) = &mut self.hex_entry
            && entry.digits.pop().is_some()
        {
            self.needs_redraw = true;
        }
    }

    /// Leaves edit mode, applying the typed value to its picker if it parses.
    ///
    /// The background goes through [`set_background`](Self::set_background),
    /// so a new value repaints the buffer and drops history.
    pub fn commit_hex_entry(&mut self) {
        let Some(entry) = self.hex_entry.take() else {
            return;
        };
        self.needs_redraw = true;
        if entry.digits.is_empty() {
            return;
        }
        let Some(color) = Color::from_hex(&entry.digits) else {
            log::warn!("Ignoring invalid color value '{}'", entry.display());
            return;
        };
        match entry.field {
            ColorField::Stroke => self.set_stroke_color(color),
            ColorField::Background => self.set_background(color),
        }
    }

    /// Leaves edit mode without changing any color.
    pub fn cancel_hex_entry(&mut self) {
        if self.hex_entry.take().is_some() {
            self.needs_redraw = true;
        }
    }

    /// Sets the line width. The buffer is untouched.
    pub fn set_line_width(&mut self, width: LineWidth) {
        if self.line_width != width {
            log::debug!("Line width {}", width);
            self.line_width = width;
            self.needs_redraw = true;
        }
    }

    pub fn toggle_eraser(&mut self) {
        self.eraser = !self.eraser;
        log::debug!("Eraser {}", if self.eraser { "on" } else { "off" });
        self.needs_redraw = true;
    }

    /// Captures the buffer as an undo snapshot.
    pub(super) fn push_snapshot(&mut self) {
        let Some(surface) = &self.surface else {
            return;
        };
        match surface.encode_png() {
            Ok(png) => {
                self.history.push(Snapshot::new(png));
                log::debug!(
                    "Snapshot {} captured ({} bytes held)",
                    self.history.len(),
                    self.history.total_bytes()
                );
            }
            Err(err) => self.push_notice(Notice::SnapshotFailed(err.to_string())),
        }
    }

    /// Looks up the action bound to `key_str` under the current modifiers.
    ///
    /// Symbol keys that need Shift to type (like `+`) also match bindings
    /// written without Shift.
    pub(super) fn find_action(&self, key_str: &str) -> Option<Action> {
        let Modifiers { ctrl, shift, alt } = self.modifiers;
        let lookup = |shift: bool| {
            self.action_map
                .iter()
                .find(|(binding, _)| binding.matches(key_str, ctrl, shift, alt))
                .map(|(_, action)| *action)
        };

        lookup(shift).or_else(|| {
            let is_symbol = key_str.chars().count() == 1
                && key_str.chars().all(|c| !c.is_alphanumeric());
            if shift && is_symbol {
                lookup(false)
            } else {
                None
            }
        })
    }
}
