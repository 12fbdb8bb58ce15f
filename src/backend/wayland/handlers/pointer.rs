// Feeds pointer events (motion/buttons/scroll) into the window state so strokes and
// toolbar clicks reach the drawing view.
use log::debug;
use smithay_client_toolkit::seat::pointer::{
    BTN_LEFT, BTN_MIDDLE, BTN_RIGHT, PointerEvent, PointerEventKind, PointerHandler,
};
use wayland_client::{Connection, QueueHandle, protocol::wl_pointer};

use crate::input::MouseButton;

use super::super::state::WaylandState;

impl PointerHandler for WaylandState {
    fn pointer_frame(
        &mut self,
        conn: &Connection,
        _qh: &QueueHandle<Self>,
        _pointer: &wl_pointer::WlPointer,
        events: &[PointerEvent],
    ) {
        for event in events {
            let (x, y) = event.position;
            match event.kind {
                PointerEventKind::Enter { .. } => {
                    debug!("Pointer entered at ({:.1}, {:.1})", x, y);
                    self.reset_cursor();
                    self.pointer_position = (x, y);
                }
                PointerEventKind::Leave { .. } => {
                    debug!("Pointer left window");
                    self.view.on_pointer_leave();
                }
                PointerEventKind::Motion { .. } => {
                    self.handle_motion(x, y);
                }
                PointerEventKind::Press { button, .. } => {
                    debug!("Button {} pressed at ({:.1}, {:.1})", button, x, y);
                    let Some(mb) = map_button(button) else {
                        continue;
                    };
                    self.pointer_position = (x, y);
                    self.handle_press(mb, x, y);
                }
                PointerEventKind::Release { button, .. } => {
                    debug!("Button {} released", button);
                    let Some(mb) = map_button(button) else {
                        continue;
                    };
                    self.view.on_pointer_up(mb);
                }
                PointerEventKind::Axis { vertical, .. } => {
                    let scroll_direction = if vertical.discrete != 0 {
                        vertical.discrete
                    } else if vertical.absolute.abs() > 0.1 {
                        if vertical.absolute > 0.0 { 1 } else { -1 }
                    } else {
                        0
                    };

                    if scroll_direction != 0 {
                        self.view.on_scroll(scroll_direction as f64);
                        debug!("Line width now {}", self.view.line_width());
                    }
                }
            }
        }

        self.update_cursor(conn);
    }
}

fn map_button(button: u32) -> Option<MouseButton> {
    match button {
        BTN_LEFT => Some(MouseButton::Left),
        BTN_MIDDLE => Some(MouseButton::Middle),
        BTN_RIGHT => Some(MouseButton::Right),
        _ => None,
    }
}
