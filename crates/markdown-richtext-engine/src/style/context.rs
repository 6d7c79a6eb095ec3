use serde::{Deserialize, Serialize};

use super::{Color, FontRef};
use crate::highlight::ScopeStyleSheet;

/// Per-render style configuration. Read-only for the duration of a render and
/// safe to share between renders running on different threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// When true, root-level lists get one extra indent level.
    pub indent_root_lists: bool,
    /// Width of one indent level, in pixels.
    pub indent_size: f32,
    /// Base font size for body text.
    pub font_size: f32,
    pub font_color: Color,
    /// Opacity applied to code backgrounds (0..=1).
    pub code_background_opacity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_font: Option<FontRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_font: Option<FontRef>,
    /// Colors for highlighted code, keyed by scope name.
    pub code_theme: ScopeStyleSheet,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            indent_root_lists: true,
            indent_size: 16.0,
            font_size: 14.0,
            font_color: Color::WHITE,
            code_background_opacity: 0.1,
            text_font: None,
            code_font: None,
            code_theme: ScopeStyleSheet::default(),
        }
    }
}
