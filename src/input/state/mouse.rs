use crate::input::events::MouseButton;

use super::{DrawingState, DrawingView};

impl DrawingView {
    /// Processes a button press over the canvas region.
    ///
    /// `x`/`y` are display coordinates relative to the canvas origin. Only the
    /// left button starts a stroke; nothing is painted until the pointer moves.
    pub fn on_pointer_down(&mut self, button: MouseButton, x: f64, y: f64) {
        if button != MouseButton::Left || self.dialog.is_some() || self.surface.is_none() {
            return;
        }

        let point = self.to_buffer_coords(x, y);
        log::debug!("Stroke started at ({:.1}, {:.1})", point.0, point.1);
        self.state = DrawingState::Drawing {
            points: vec![point],
        };
    }

    /// Extends the active stroke to the pointer and strokes the path.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        let point = self.to_buffer_coords(x, y);
        let color = self.effective_stroke_color();
        let width = self.line_width.as_f64();

        let DrawingState::Drawing { points } = &mut self.state else {
            return;
        };
        let Some(surface) = &self.surface else {
            return;
        };

        points.push(point);
        if let Err(err) = surface.stroke_path(points, color, width) {
            log::warn!("Failed to stroke path: {}", err);
        }
        self.needs_redraw = true;
    }

    /// Ends the active stroke and records an undo snapshot.
    pub fn on_pointer_up(&mut self, button: MouseButton) {
        if button == MouseButton::Left {
            self.finish_stroke();
        }
    }

    /// The pointer left the canvas region; ends the stroke like a release.
    pub fn on_pointer_leave(&mut self) {
        self.finish_stroke();
    }

    fn finish_stroke(&mut self) {
        if let DrawingState::Drawing { points } = std::mem::take(&mut self.state) {
            log::debug!("Stroke finished with {} points", points.len());
            self.push_snapshot();
            self.needs_redraw = true;
        }
    }

    /// Scroll over the window steps through the width presets.
    pub fn on_scroll(&mut self, delta: f64) {
        if delta < 0.0 {
            self.set_line_width(self.line_width.next());
        } else if delta > 0.0 {
            self.set_line_width(self.line_width.prev());
        }
    }
}
