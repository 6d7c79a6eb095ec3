use super::{RichTextConsumer, RichTextRenderer};
use crate::document::{Inline, Link};
use crate::style::Color;

/// The markup tag for an emphasis run, if the delimiter/count pair has one.
pub fn emphasis_tag(delimiter: char, count: u8) -> Option<&'static str> {
    match (delimiter, count) {
        ('*', 2) => Some("b"),
        ('*', 1) => Some("i"),
        ('_', 2) => Some("u"),
        ('_', 1) => Some("i"),
        ('~', 2) => Some("s"),
        ('~', 1) => Some("sub"),
        ('^', 1) => Some("sup"),
        _ => None,
    }
}

impl<C: RichTextConsumer> RichTextRenderer<'_, C> {
    pub(super) fn render_inlines(&mut self, inlines: &[Inline]) {
        for (index, inline) in inlines.iter().enumerate() {
            let is_last = index + 1 == inlines.len();
            self.render_inline(inline, is_last);
        }
    }

    fn render_inline(&mut self, inline: &Inline, is_last: bool) {
        match inline {
            Inline::Literal(text) => self.write(text),
            Inline::Emphasis {
                delimiter,
                count,
                children,
            } => self.render_emphasis(*delimiter, *count, children),
            Inline::CodeSpan(code) => self.render_code_span(code),
            Inline::Link(link) => self.render_link(link),
            Inline::LineBreak { hard } => {
                if is_last {
                    return;
                }
                self.write(if *hard { "\n" } else { " " });
            }
        }
    }

    fn render_emphasis(&mut self, delimiter: char, count: u8, children: &[Inline]) {
        match emphasis_tag(delimiter, count) {
            Some(tag) => {
                self.write(&format!("<{tag}>"));
                self.render_inlines(children);
                self.write(&format!("</{tag}>"));
            }
            None => self.render_inlines(children),
        }
    }

    fn render_code_span(&mut self, code: &str) {
        let style = self.ctx.code_text_style();
        let mark = style
            .color
            .unwrap_or(Color::BLACK)
            .with_alpha_scaled(self.ctx.style.code_background_opacity);

        self.write(&format!("<mark={mark}> "));
        self.write(&style.begin());
        self.write_escaped(code);
        self.write(&style.end());
        self.write(" </mark>");
    }

    fn render_link(&mut self, link: &Link) {
        // A raw `"` would end the attribute; everything else is written as is.
        let href = link.href().replace('"', "%22");
        self.write(&format!("<a href=\"{href}\">"));
        self.render_inlines(&link.children);
        self.write("</a>");
    }
}
