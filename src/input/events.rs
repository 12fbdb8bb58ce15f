//! Generic input event types for cross-backend compatibility.

/// Generic key representation for cross-backend compatibility.
///
/// Backend implementations map their native key codes to these generic
/// key values for unified input handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Regular character key (a-z, 0-9, symbols)
    Char(char),
    /// Escape key (also cancels an open dialog)
    Escape,
    /// Return/Enter key (also confirms an open dialog)
    Return,
    Backspace,
    Delete,
    Tab,
    Space,
    /// Shift modifier
    Shift,
    /// Ctrl modifier
    Ctrl,
    /// Alt modifier
    Alt,
    /// Unmapped or unrecognized key
    Unknown,
}

impl Key {
    /// Name used to look the key up in the keybinding map.
    pub fn binding_name(self) -> Option<String> {
        let name = match self {
            Key::Char(c) => return Some(c.to_lowercase().to_string()),
            Key::Escape => "escape",
            Key::Return => "return",
            Key::Backspace => "backspace",
            Key::Delete => "delete",
            Key::Tab => "tab",
            Key::Space => "space",
            Key::Shift | Key::Ctrl | Key::Alt | Key::Unknown => return None,
        };
        Some(name.to_string())
    }
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (draws and activates controls)
    Left,
    Right,
    Middle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_names_are_lowercase() {
        assert_eq!(Key::Char('S').binding_name().as_deref(), Some("s"));
        assert_eq!(Key::Escape.binding_name().as_deref(), Some("escape"));
        assert_eq!(Key::Ctrl.binding_name(), None);
    }
}
