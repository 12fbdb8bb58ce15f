use crate::config::Action;
use crate::draw::{BLACK, LineWidth, LoadOutcome, LoadPurpose, WHITE};
use crate::export;
use crate::input::events::Key;
use crate::storage::{self, data_url};

use super::{Dialog, DrawingState, DrawingView, Notice};

impl DrawingView {
    /// Resets the canvas and every setting to its default.
    ///
    /// Stroke becomes black, background white, width 1px; history is
    /// discarded. The eraser flag is left as is.
    pub fn clear(&mut self) {
        if self.surface.is_none() {
            return;
        }
        log::info!("Clearing canvas");
        self.hex_entry = None;
        self.state = DrawingState::Idle;
        self.stroke_color = BLACK;
        self.line_width = LineWidth::DEFAULT;
        self.background = WHITE;
        self.repaint_background();
    }

    /// Encodes the canvas and asks for confirmation before saving it.
    pub fn save(&mut self) {
        let Some(surface) = &self.surface else {
            return;
        };
        let png = match surface.encode_png() {
            Ok(png) => png,
            Err(err) => {
                self.push_notice(Notice::SaveFailed(format!("Could not encode canvas: {err}")));
                return;
            }
        };

        if self.options.confirm_save {
            self.dialog = Some(Dialog::ConfirmSave { png });
            self.needs_redraw = true;
        } else {
            self.persist_and_download(&png);
        }
    }

    /// OK on the open dialog.
    pub fn confirm_dialog(&mut self) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        self.needs_redraw = true;
        if let Dialog::ConfirmSave { png } = dialog {
            self.persist_and_download(&png);
        }
    }

    /// Cancel on the open dialog. A cancelled save writes nothing.
    pub fn dismiss_dialog(&mut self) {
        if self.dialog.take().is_some() {
            self.needs_redraw = true;
        }
    }

    /// Overwrites the persisted slot, then writes the download.
    fn persist_and_download(&mut self, png: &[u8]) {
        let key = self.options.storage_key.clone();
        if let Err(err) = storage::store_snapshot(self.store.as_mut(), &key, png) {
            self.push_notice(Notice::SaveFailed(format!("Could not store canvas: {err}")));
        }

        match export::save_download(png, &self.options.download) {
            Ok(path) => self.push_notice(Notice::Downloaded(path)),
            Err(err) => self.push_notice(Notice::SaveFailed(err.to_string())),
        }
    }

    /// Starts restoring the persisted snapshot, or alerts if there is none.
    pub fn retrieve(&mut self) {
        if self.surface.is_none() {
            return;
        }

        let stored = match self.store.get_item(&self.options.storage_key) {
            Ok(stored) => stored,
            Err(err) => {
                self.push_notice(Notice::RetrieveFailed(err.to_string()));
                return;
            }
        };

        let Some(url) = stored.filter(|value| !value.is_empty()) else {
            log::info!("Nothing stored under '{}'", self.options.storage_key);
            self.dialog = Some(Dialog::Alert {
                message: Dialog::NO_SAVED_IMAGE.to_string(),
            });
            self.needs_redraw = true;
            return;
        };

        match data_url::decode_png(&url) {
            Ok(png) => self.loader.request(LoadPurpose::Retrieve, png),
            Err(err) => self.push_notice(Notice::RetrieveFailed(err.to_string())),
        }
    }

    /// Drops the latest snapshot and restores the canvas to the one before.
    ///
    /// With no earlier snapshot the canvas is filled with the background.
    pub fn undo(&mut self) {
        if self.surface.is_none() {
            return;
        }
        let previous = match self.history.undo() {
            None => return,
            Some(previous) => previous.map(|snapshot| snapshot.as_bytes().to_vec()),
        };

        match previous {
            Some(png) => self.loader.request(LoadPurpose::Undo, png),
            None => {
                if let Some(surface) = &self.surface
                    && let Err(err) = surface.fill(self.background)
                {
                    log::warn!("Failed to fill background: {}", err);
                }
            }
        }
        self.needs_redraw = true;
    }

    /// Applies every decode that has finished. Returns how many were applied.
    pub fn pump_loads(&mut self) -> usize {
        let mut applied = 0;
        while let Some(outcome) = self.loader.try_take_result() {
            self.apply_load(outcome);
            applied += 1;
        }
        applied
    }

    /// Blocks until every requested decode has been applied.
    pub fn finish_pending_loads(&mut self) {
        while let Some(outcome) = self.loader.blocking_take_result() {
            self.apply_load(outcome);
        }
    }

    /// Number of decodes requested but not yet applied.
    pub fn pending_loads(&self) -> usize {
        self.loader.in_flight()
    }

    fn apply_load(&mut self, outcome: LoadOutcome) {
        let LoadOutcome { purpose, result } = outcome;
        let Some(surface) = &self.surface else {
            return;
        };

        let drawn = result.and_then(|image| surface.draw_scaled(image));
        match (drawn, purpose) {
            (Ok(()), LoadPurpose::Retrieve) => log::info!("Saved canvas restored"),
            (Ok(()), LoadPurpose::Undo) => log::debug!("Undo applied"),
            (Err(err), LoadPurpose::Retrieve) => {
                self.push_notice(Notice::RetrieveFailed(format!("Could not decode image: {err}")))
            }
            (Err(err), LoadPurpose::Undo) => log::warn!("Failed to redraw undo snapshot: {}", err),
        }
        self.needs_redraw = true;
    }

    /// Processes a key press event.
    ///
    /// While a dialog is open Return confirms it, Escape cancels it and all
    /// other keys are swallowed. While a color value is being typed, keys edit
    /// it instead of triggering bindings.
    pub fn on_key_press(&mut self, key: Key) {
        match key {
            Key::Shift => {
                self.modifiers.shift = true;
                return;
            }
            Key::Ctrl => {
                self.modifiers.ctrl = true;
                return;
            }
            Key::Alt => {
                self.modifiers.alt = true;
                return;
            }
            _ => {}
        }

        if self.dialog.is_some() {
            match key {
                Key::Return | Key::Space => self.confirm_dialog(),
                Key::Escape => self.dismiss_dialog(),
                _ => {}
            }
            return;
        }

        if self.hex_entry.is_some() {
            match key {
                Key::Char(c) => self.push_hex_digit(c),
                Key::Backspace | Key::Delete => self.pop_hex_digit(),
                Key::Return | Key::Tab => self.commit_hex_entry(),
                Key::Escape => self.cancel_hex_entry(),
                _ => {}
            }
            return;
        }

        let Some(key_str) = key.binding_name() else {
            return;
        };
        if let Some(action) = self.find_action(&key_str) {
            self.handle_action(action);
        }
    }

    /// Processes a key release event.
    pub fn on_key_release(&mut self, key: Key) {
        match key {
            Key::Shift => self.modifiers.shift = false,
            Key::Ctrl => self.modifiers.ctrl = false,
            Key::Alt => self.modifiers.alt = false,
            _ => {}
        }
    }

    /// Runs a bound or clicked action.
    pub fn handle_action(&mut self, action: Action) {
        log::debug!("Action {:?}", action);
        match action {
            Action::Exit => self.should_exit = true,
            Action::ClearCanvas => self.clear(),
            Action::Save => self.save(),
            Action::Retrieve => self.retrieve(),
            Action::Undo => self.undo(),
            Action::ToggleEraser => self.toggle_eraser(),
            Action::IncreaseWidth => self.set_line_width(self.line_width.next()),
            Action::DecreaseWidth => self.set_line_width(self.line_width.prev()),
        }
    }
}
