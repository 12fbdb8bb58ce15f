//! Configuration enum types.

use crate::draw::{Color, color::name_to_color};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - a named color, a hex string or RGB values.
///
/// # Examples
/// ```toml
/// # Named color or hex string
/// palette = ["red", "#20b2aa"]
///
/// # Custom RGB color (0-255 per component)
/// palette = [[255, 128, 0]]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color (red, green, blue, yellow, orange, pink, white, black) or `#rrggbb`
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the specification to a [`Color`], or `None` for unknown names.
    pub fn to_color(&self) -> Option<Color> {
        match self {
            ColorSpec::Name(name) if name.trim_start().starts_with('#') => Color::from_hex(name),
            ColorSpec::Name(name) => name_to_color(name),
            ColorSpec::Rgb([r, g, b]) => Some(Color::from_rgb8(*r, *g, *b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{ORANGE, RED};

    #[test]
    fn named_and_hex_colors_resolve() {
        assert_eq!(ColorSpec::Name("red".into()).to_color(), Some(RED));
        assert_eq!(ColorSpec::Name("Orange".into()).to_color(), Some(ORANGE));
        assert_eq!(
            ColorSpec::Name("#00ff00".into()).to_color().map(|c| c.to_hex()),
            Some("#00ff00".to_string())
        );
    }

    #[test]
    fn rgb_triplets_resolve() {
        let color = ColorSpec::Rgb([255, 0, 0]).to_color().unwrap();
        assert_eq!(color.to_hex(), "#ff0000");
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        assert_eq!(ColorSpec::Name("chartreuse-ish".into()).to_color(), None);
        assert_eq!(ColorSpec::Name("00ff00".into()).to_color(), None);
    }
}
