//! Line-width presets offered by the width selector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The preset widths, in buffer pixels, in selector order.
pub const WIDTH_PRESETS: [u32; 9] = [1, 2, 3, 5, 10, 20, 30, 40, 50];

/// A stroke width restricted to one of [`WIDTH_PRESETS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct LineWidth(u32);

impl LineWidth {
    /// The thinnest preset, selected on startup and after clear.
    pub const DEFAULT: LineWidth = LineWidth(1);

    /// Returns the width if `px` is one of the presets.
    pub fn from_px(px: u32) -> Option<Self> {
        WIDTH_PRESETS.contains(&px).then_some(Self(px))
    }

    /// Width in pixels.
    pub fn px(self) -> u32 {
        self.0
    }

    /// Width as a Cairo line width.
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// Position of this width in [`WIDTH_PRESETS`].
    pub fn index(self) -> usize {
        WIDTH_PRESETS
            .iter()
            .position(|p| *p == self.0)
            .unwrap_or_default()
    }

    /// Next larger preset, saturating at the largest.
    pub fn next(self) -> Self {
        let idx = (self.index() + 1).min(WIDTH_PRESETS.len() - 1);
        Self(WIDTH_PRESETS[idx])
    }

    /// Next smaller preset, saturating at the smallest.
    pub fn prev(self) -> Self {
        Self(WIDTH_PRESETS[self.index().saturating_sub(1)])
    }

    /// All presets as widths.
    pub fn all() -> impl Iterator<Item = LineWidth> {
        WIDTH_PRESETS.into_iter().map(LineWidth)
    }
}

impl Default for LineWidth {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for LineWidth {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_px(value)
            .ok_or_else(|| format!("{value}px is not a preset width {WIDTH_PRESETS:?}"))
    }
}

impl From<LineWidth> for u32 {
    fn from(width: LineWidth) -> Self {
        width.0
    }
}

impl fmt::Display for LineWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_presets_are_accepted() {
        assert!(LineWidth::from_px(5).is_some());
        assert!(LineWidth::from_px(4).is_none());
        assert!(LineWidth::try_from(0).is_err());
    }

    #[test]
    fn stepping_saturates_at_both_ends() {
        assert_eq!(LineWidth::DEFAULT.prev(), LineWidth::DEFAULT);
        let max = LineWidth::from_px(50).unwrap();
        assert_eq!(max.next(), max);
        assert_eq!(LineWidth::from_px(3).unwrap().next().px(), 5);
        assert_eq!(LineWidth::from_px(10).unwrap().prev().px(), 5);
    }

    #[test]
    fn display_matches_selector_labels() {
        let labels: Vec<String> = LineWidth::all().map(|w| w.to_string()).collect();
        assert_eq!(labels.first().map(String::as_str), Some("1px"));
        assert_eq!(labels.last().map(String::as_str), Some("50px"));
        assert_eq!(labels.len(), 9);
    }
}
