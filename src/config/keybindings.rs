//! Keybinding configuration types and parsing.
//!
//! Every toolbar control has a keyboard equivalent. Bindings are configured
//! per action in the `[keybindings]` table and compiled into a lookup map at
//! startup.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All possible actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Exit,

    // Toolbar actions
    ClearCanvas,
    Save,
    Retrieve,
    Undo,
    ToggleEraser,

    // Line width presets
    IncreaseWidth,
    DecreaseWidth,
}

/// A single keybinding: a key name with optional modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyBinding {
    /// Parse a keybinding string like "Ctrl+Shift+S" or "Escape".
    /// Modifiers can appear in any order and spaces around '+' are ignored.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty keybinding string".to_string());
        }

        let normalized = s.replace(" + ", "+").replace("+ ", "+").replace(" +", "+");

        let mut ctrl = false;
        let mut shift = false;
        let mut alt = false;
        let mut key_parts = Vec::new();

        for part in normalized.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "shift" => shift = true,
                "alt" => alt = true,
                _ => key_parts.push(part),
            }
        }

        if key_parts.is_empty() {
            return Err(format!("No key specified in: {}", s));
        }

        // "Ctrl++" splits into trailing empty parts; the key is '+'
        let key = key_parts.join("+");
        let key = if key.is_empty() { "+".to_string() } else { key };

        Ok(Self {
            key: key.to_lowercase(),
            ctrl,
            shift,
            alt,
        })
    }

    /// Check if this keybinding matches the current input state.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool, alt: bool) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == ctrl
            && self.shift == shift
            && self.alt == alt
    }
}

/// Configuration for all keybindings.
///
/// Each action can have multiple keybindings:
/// ```toml
/// [keybindings]
/// save = ["Ctrl+S"]
/// undo = ["Ctrl+Z", "U"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeybindingsConfig {
    #[serde(default = "default_exit")]
    pub exit: Vec<String>,

    #[serde(default = "default_clear_canvas")]
    pub clear_canvas: Vec<String>,

    #[serde(default = "default_save")]
    pub save: Vec<String>,

    #[serde(default = "default_retrieve")]
    pub retrieve: Vec<String>,

    #[serde(default = "default_undo")]
    pub undo: Vec<String>,

    #[serde(default = "default_toggle_eraser")]
    pub toggle_eraser: Vec<String>,

    #[serde(default = "default_increase_width")]
    pub increase_width: Vec<String>,

    #[serde(default = "default_decrease_width")]
    pub decrease_width: Vec<String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            exit: default_exit(),
            clear_canvas: default_clear_canvas(),
            save: default_save(),
            retrieve: default_retrieve(),
            undo: default_undo(),
            toggle_eraser: default_toggle_eraser(),
            increase_width: default_increase_width(),
            decrease_width: default_decrease_width(),
        }
    }
}

impl KeybindingsConfig {
    /// Build a lookup map from keybindings to actions.
    /// Returns an error if any keybinding string is invalid or if duplicates are detected.
    pub fn build_action_map(&self) -> Result<HashMap<KeyBinding, Action>, String> {
        let mut map = HashMap::new();

        let groups: [(&[String], Action); 8] = [
            (&self.exit, Action::Exit),
            (&self.clear_canvas, Action::ClearCanvas),
            (&self.save, Action::Save),
            (&self.retrieve, Action::Retrieve),
            (&self.undo, Action::Undo),
            (&self.toggle_eraser, Action::ToggleEraser),
            (&self.increase_width, Action::IncreaseWidth),
            (&self.decrease_width, Action::DecreaseWidth),
        ];

        for (bindings, action) in groups {
            for binding_str in bindings {
                let binding = KeyBinding::parse(binding_str)?;
                if let Some(existing_action) = map.insert(binding, action) {
                    return Err(format!(
                        "Duplicate keybinding '{}' assigned to both {:?} and {:?}",
                        binding_str, existing_action, action
                    ));
                }
            }
        }

        Ok(map)
    }
}

// =============================================================================
// Default keybinding functions
// =============================================================================

fn default_exit() -> Vec<String> {
    vec!["Escape".to_string(), "Ctrl+Q".to_string()]
}

fn default_clear_canvas() -> Vec<String> {
    vec!["Ctrl+N".to_string()]
}

fn default_save() -> Vec<String> {
    vec!["Ctrl+S".to_string()]
}

fn default_retrieve() -> Vec<String> {
    vec!["Ctrl+O".to_string()]
}

fn default_undo() -> Vec<String> {
    vec!["Ctrl+Z".to_string()]
}

fn default_toggle_eraser() -> Vec<String> {
    vec!["E".to_string()]
}

fn default_increase_width() -> Vec<String> {
    vec!["+".to_string(), "=".to_string()]
}

fn default_decrease_width() -> Vec<String> {
    vec!["-".to_string(), "_".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let binding = KeyBinding::parse("Escape").unwrap();
        assert_eq!(binding.key, "escape");
        assert!(!binding.ctrl);
        assert!(!binding.shift);
        assert!(!binding.alt);
    }

    #[test]
    fn test_parse_ctrl_key() {
        let binding = KeyBinding::parse("Ctrl+S").unwrap();
        assert_eq!(binding.key, "s");
        assert!(binding.ctrl);
        assert!(!binding.shift);
    }

    #[test]
    fn test_parse_plus_key() {
        let binding = KeyBinding::parse("Ctrl++").unwrap();
        assert_eq!(binding.key, "+");
        assert!(binding.ctrl);
        assert_eq!(KeyBinding::parse("+").unwrap().key, "+");
    }

    #[test]
    fn test_parse_errors() {
        assert!(KeyBinding::parse("").is_err());
        assert!(KeyBinding::parse("Ctrl+Shift").is_err());
    }

    #[test]
    fn test_parse_with_spaces_and_order() {
        let a = KeyBinding::parse("Ctrl + Shift + O").unwrap();
        let b = KeyBinding::parse("shift+ctrl+o").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_matches() {
        let binding = KeyBinding::parse("Ctrl+Z").unwrap();
        assert!(binding.matches("z", true, false, false));
        assert!(binding.matches("Z", true, false, false));
        assert!(!binding.matches("z", false, false, false));
        assert!(!binding.matches("z", true, true, false));
        assert!(!binding.matches("y", true, false, false));
    }

    #[test]
    fn test_build_action_map_defaults() {
        let map = KeybindingsConfig::default().build_action_map().unwrap();

        let ctrl_s = KeyBinding::parse("Ctrl+S").unwrap();
        assert_eq!(map.get(&ctrl_s), Some(&Action::Save));

        let eraser = KeyBinding::parse("e").unwrap();
        assert_eq!(map.get(&eraser), Some(&Action::ToggleEraser));

        let escape = KeyBinding::parse("Escape").unwrap();
        assert_eq!(map.get(&escape), Some(&Action::Exit));
    }

    #[test]
    fn test_duplicate_keybinding_detection() {
        let mut config = KeybindingsConfig::default();
        config.save = vec!["Ctrl+Z".to_string()];

        let err = config.build_action_map().unwrap_err();
        assert!(err.contains("Duplicate keybinding"));
        assert!(err.contains("Ctrl+Z"));
    }

    #[test]
    fn test_duplicate_with_different_case_and_order() {
        let mut config = KeybindingsConfig::default();
        config.retrieve = vec!["Shift+Ctrl+R".to_string()];
        config.clear_canvas = vec!["ctrl+shift+r".to_string()];
        assert!(config.build_action_map().is_err());
    }
}
