use super::{RenderStyle, TextStyle};

/// The kinds of text the renderer asks styles for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    Text,
    Code,
    Heading(u8),
}

/// Resolves the style for each kind of text from the render configuration.
///
/// Hosts can swap in their own cascade; [`DefaultTextStyleProvider`] derives
/// everything from [`RenderStyle`].
pub trait TextStyleProvider: Send + Sync {
    fn default_text_style(&self, style: &RenderStyle) -> TextStyle;
    fn code_text_style(&self, style: &RenderStyle) -> TextStyle;
    fn heading_text_style(&self, style: &RenderStyle, level: u8) -> TextStyle;

    fn resolve(&self, kind: StyleKind, style: &RenderStyle) -> TextStyle {
        match kind {
            StyleKind::Text => self.default_text_style(style),
            StyleKind::Code => self.code_text_style(style),
            StyleKind::Heading(level) => self.heading_text_style(style, level),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTextStyleProvider;

const CODE_SCALE: f32 = 0.875;

/// Font size multiplier for a heading level. Levels past 5 use body size.
pub fn heading_scale(level: u8) -> f32 {
    match level {
        1 => 2.250,
        2 => 1.875,
        3 => 1.500,
        4 => 1.250,
        5 => 1.125,
        _ => 1.0,
    }
}

impl TextStyleProvider for DefaultTextStyleProvider {
    fn default_text_style(&self, style: &RenderStyle) -> TextStyle {
        TextStyle {
            font_size: Some(style.font_size),
            color: Some(style.font_color),
            font: style.text_font.clone(),
            ..TextStyle::default()
        }
    }

    fn code_text_style(&self, style: &RenderStyle) -> TextStyle {
        self.default_text_style(style).merge(&TextStyle {
            font_size: Some(style.font_size * CODE_SCALE),
            font: style.code_font.clone(),
            ..TextStyle::default()
        })
    }

    fn heading_text_style(&self, style: &RenderStyle, level: u8) -> TextStyle {
        self.default_text_style(style).merge(&TextStyle {
            font_size: Some(style.font_size * heading_scale(level)),
            ..TextStyle::default()
        })
    }
}
