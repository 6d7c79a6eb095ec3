use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::style::{Color, TextStyle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
    pub bold: bool,
    pub italic: bool,
}

impl ScopeStyle {
    pub fn foreground(color: Color) -> Self {
        Self {
            foreground: Some(color),
            ..Self::default()
        }
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            color: self.foreground,
            bold: self.bold.then_some(true),
            italic: self.italic.then_some(true),
            ..TextStyle::default()
        }
    }
}

/// Maps scope names to styles.
///
/// Lookup falls back through dotted prefixes, so an entry for `keyword` also
/// styles `keyword.control.rust` unless a longer entry exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeStyleSheet {
    styles: BTreeMap<String, ScopeStyle>,
}

impl ScopeStyleSheet {
    pub fn empty() -> Self {
        Self {
            styles: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, style: ScopeStyle) -> Self {
        self.insert(name, style);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, style: ScopeStyle) {
        self.styles.insert(name.into(), style);
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<&ScopeStyle> {
        let mut key = name;
        loop {
            if let Some(style) = self.styles.get(key) {
                return Some(style);
            }
            match key.rfind('.') {
                Some(dot) => key = &key[..dot],
                None => return None,
            }
        }
    }
}

/// A light theme in the spirit of common IDE defaults.
impl Default for ScopeStyleSheet {
    fn default() -> Self {
        Self::empty()
            .with("comment", ScopeStyle::foreground(Color::rgb(0x00, 0x80, 0x00)))
            .with("keyword", ScopeStyle::foreground(Color::rgb(0x00, 0x00, 0xFF)))
            .with("storage", ScopeStyle::foreground(Color::rgb(0x00, 0x00, 0xFF)))
            .with("constant.language", ScopeStyle::foreground(Color::rgb(0x00, 0x00, 0xFF)))
            .with("constant.numeric", ScopeStyle::foreground(Color::rgb(0x09, 0x86, 0x58)))
            .with("string", ScopeStyle::foreground(Color::rgb(0xA3, 0x15, 0x15)))
            .with("entity.name.function", ScopeStyle::foreground(Color::rgb(0x79, 0x5E, 0x26)))
            .with("entity.name.type", ScopeStyle::foreground(Color::rgb(0x26, 0x7F, 0x99)))
            .with("support.type", ScopeStyle::foreground(Color::rgb(0x26, 0x7F, 0x99)))
            .with("variable.parameter", ScopeStyle::foreground(Color::rgb(0x00, 0x10, 0x80)))
            .with("entity.name.tag", ScopeStyle::foreground(Color::rgb(0x80, 0x00, 0x00)))
            .with("markup.bold", ScopeStyle { bold: true, ..ScopeStyle::default() })
            .with("markup.italic", ScopeStyle { italic: true, ..ScopeStyle::default() })
    }
}
