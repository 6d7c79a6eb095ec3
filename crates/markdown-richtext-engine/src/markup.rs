//! Inline markup vocabulary shared by the renderer and the consumers.

use std::borrow::Cow;

/// Explicit vertical space between blocks. Never collapsed.
pub const VERTICAL_SPACE: &str = "<br>";

pub const INDENT_CLOSE: &str = "</indent>";

/// Zero-width tag placed after a literal `<` so it can't open a tag.
const LT_ESCAPE: &str = "<<space=0>";

/// Escapes text for inclusion in markup. Escaping is not idempotent: apply it
/// exactly once, at the boundary where raw text enters.
pub fn escape(text: &str) -> Cow<'_, str> {
    if text.contains('<') {
        Cow::Owned(text.replace('<', LT_ESCAPE))
    } else {
        Cow::Borrowed(text)
    }
}

pub fn indent_open(pixels: f32) -> String {
    format!("<indent={pixels}px>")
}
