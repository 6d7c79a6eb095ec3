use log::warn;

use crate::markup::{self, INDENT_CLOSE, VERTICAL_SPACE};
use crate::render::{RenderContext, RenderError, RichTextConsumer};

/// Builds one rich-text string from render events.
///
/// Tracks whether the cursor sits on a fresh line so block boundaries never
/// produce blank lines, and the indent depth so every indent tag knows its
/// absolute width.
#[derive(Debug)]
pub struct RichTextAccumulator {
    buffer: String,
    indent_level: usize,
    fresh_line: bool,
    /// The last indent was opened without a prefix; the next one may share
    /// its line.
    silent_indent: bool,
}

impl Default for RichTextAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl RichTextAccumulator {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            fresh_line: true,
            silent_indent: false,
        }
    }

    /// The markup built so far.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    fn append(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.fresh_line = false;
    }

    fn append_line(&mut self, text: &str) {
        self.buffer.push_str(text.trim_end());
        self.buffer.push('\n');
        self.fresh_line = true;
    }

    /// Tags don't move the cursor off a fresh line.
    fn append_meta(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn ensure_line(&mut self, force: bool) {
        if self.buffer.is_empty() || (self.fresh_line && !force) || self.buffer.ends_with('\n') {
            return;
        }
        self.buffer.push('\n');
        self.fresh_line = true;
    }

    fn trim_right(&mut self) {
        let trimmed = self.buffer.trim_end().len();
        self.buffer.truncate(trimmed);
    }

    fn close_indent(&mut self) {
        self.indent_level -= 1;
        self.trim_right();
        self.append_meta(INDENT_CLOSE);
    }
}

impl RichTextConsumer for RichTextAccumulator {
    type Output = String;

    fn accept_code_block(&mut self, _ctx: &RenderContext<'_>, rich_text: &str) {
        if rich_text.is_empty() {
            return;
        }
        self.append_line(rich_text);
    }

    fn accept_text_block(&mut self, ctx: &RenderContext<'_>, rich_text: &str) {
        let style = ctx.default_text_style();
        let mut inner = String::with_capacity(rich_text.len() + 32);
        style.write_begin(&mut inner);
        inner.push_str(rich_text.trim());
        style.write_end(&mut inner);
        self.append_line(&inner);
    }

    fn begin_indent(&mut self, ctx: &RenderContext<'_>, prefix: Option<&str>) {
        if self.silent_indent {
            self.silent_indent = false;
        } else if !self.buffer.ends_with("\n<br>") {
            self.ensure_line(true);
        }

        self.indent_level += 1;
        match prefix {
            Some(prefix) => self.append(prefix),
            None => self.silent_indent = true,
        }
        let width = self.indent_level as f32 * ctx.style.indent_size;
        self.append_meta(&markup::indent_open(width));
    }

    fn end_indent(&mut self, _ctx: &RenderContext<'_>) -> Result<(), RenderError> {
        if self.indent_level == 0 {
            return Err(RenderError::UnbalancedIndent);
        }
        self.close_indent();
        Ok(())
    }

    fn ensure_vertical_space(&mut self, _ctx: &RenderContext<'_>) {
        self.append_meta(VERTICAL_SPACE);
    }

    fn hint_newline(&mut self, _ctx: &RenderContext<'_>) {
        self.ensure_line(true);
    }

    fn finalize(mut self, _ctx: &RenderContext<'_>) -> String {
        if self.indent_level > 0 {
            warn!("closing {} indent(s) left open at finalize", self.indent_level);
            while self.indent_level > 0 {
                self.close_indent();
            }
        }

        self.trim_right();
        while let Some(len) = self.buffer.strip_suffix(VERTICAL_SPACE).map(str::len) {
            self.buffer.truncate(len);
            self.trim_right();
        }

        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer
    }
}
