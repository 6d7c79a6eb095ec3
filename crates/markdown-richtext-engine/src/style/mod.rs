//! # Style Model
//!
//! Text styles are records of optional fields that cascade by right-biased
//! merge: `base.merge(&over)` keeps every field `over` leaves unset. Styles are
//! never mutated once built; resolution always produces a fresh value.
//!
//! A style renders itself as markup with [`TextStyle::begin`] and
//! [`TextStyle::end`]. Tags nest in a fixed order (color, bold, italic, size,
//! font) and `end` closes them in exact reverse, so any pair of calls is
//! well-formed on its own.

pub mod color;
pub mod context;
pub mod provider;

pub use color::{Color, ColorParseError};
pub use context::RenderStyle;
pub use provider::{DefaultTextStyleProvider, StyleKind, TextStyleProvider, heading_scale};

use serde::{Deserialize, Serialize};

/// A named font asset. Loading the asset is up to the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontRef(String);

impl FontRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<FontRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
}

impl TextStyle {
    /// Right-biased merge: fields set on `other` win, the rest come from `self`.
    pub fn merge(&self, other: &TextStyle) -> TextStyle {
        TextStyle {
            font: other.font.clone().or_else(|| self.font.clone()),
            font_size: other.font_size.or(self.font_size),
            color: other.color.or(self.color),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
        }
    }

    pub fn is_bold(&self) -> bool {
        self.bold == Some(true)
    }

    pub fn is_italic(&self) -> bool {
        self.italic == Some(true)
    }

    pub fn begin(&self) -> String {
        let mut out = String::new();
        self.write_begin(&mut out);
        out
    }

    pub fn end(&self) -> String {
        let mut out = String::new();
        self.write_end(&mut out);
        out
    }

    pub fn write_begin(&self, out: &mut String) {
        if let Some(color) = self.color {
            out.push_str(&format!("<color={color}>"));
        }
        if self.is_bold() {
            out.push_str("<b>");
        }
        if self.is_italic() {
            out.push_str("<i>");
        }
        if let Some(size) = self.font_size {
            out.push_str(&format!("<size={size}>"));
        }
        if let Some(font) = &self.font {
            out.push_str(&format!("<font=\"{}\">", font.name()));
        }
    }

    pub fn write_end(&self, out: &mut String) {
        if self.font.is_some() {
            out.push_str("</font>");
        }
        if self.font_size.is_some() {
            out.push_str("</size>");
        }
        if self.is_italic() {
            out.push_str("</i>");
        }
        if self.is_bold() {
            out.push_str("</b>");
        }
        if self.color.is_some() {
            out.push_str("</color>");
        }
    }

    /// Wraps `text` in this style's begin/end markup.
    pub fn wrap(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 32);
        self.write_begin(&mut out);
        out.push_str(text);
        self.write_end(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn full_style() -> TextStyle {
        TextStyle {
            font: Some(FontRef::new("Mono")),
            font_size: Some(12.0),
            color: Some(Color::rgb(0xFF, 0, 0)),
            bold: Some(true),
            italic: Some(true),
        }
    }

    #[test]
    fn merge_prefers_override_fields() {
        let base = full_style();
        let over = TextStyle {
            font_size: Some(20.0),
            bold: Some(false),
            ..TextStyle::default()
        };

        let merged = base.merge(&over);

        assert_eq!(merged.font_size, Some(20.0));
        assert_eq!(merged.bold, Some(false));
        assert_eq!(merged.italic, Some(true));
        assert_eq!(merged.font, Some(FontRef::new("Mono")));
        assert_eq!(merged.color, Some(Color::rgb(0xFF, 0, 0)));
    }

    #[rstest]
    #[case(TextStyle::default())]
    #[case(full_style())]
    #[case(TextStyle { font_size: Some(14.0), color: Some(Color::WHITE), ..TextStyle::default() })]
    fn merging_an_empty_style_is_identity(#[case] style: TextStyle) {
        assert_eq!(style.merge(&TextStyle::default()), style);
        assert_eq!(TextStyle::default().merge(&style), style);
    }

    #[test]
    fn markup_nests_in_fixed_order() {
        let style = full_style();

        assert_eq!(
            style.begin(),
            "<color=#FF0000FF><b><i><size=12><font=\"Mono\">"
        );
        assert_eq!(style.end(), "</font></size></i></b></color>");
    }

    #[test]
    fn unset_and_false_flags_emit_nothing() {
        let style = TextStyle {
            bold: Some(false),
            italic: None,
            ..TextStyle::default()
        };

        assert_eq!(style.begin(), "");
        assert_eq!(style.end(), "");
        assert_eq!(style.wrap("plain"), "plain");
    }

    #[test]
    fn fractional_sizes_keep_their_precision() {
        let style = TextStyle {
            font_size: Some(12.25),
            ..TextStyle::default()
        };
        assert_eq!(style.wrap("x"), "<size=12.25>x</size>");
    }
}
