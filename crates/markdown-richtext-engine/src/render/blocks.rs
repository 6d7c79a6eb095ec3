use log::{debug, trace};

use super::{RenderError, RichTextConsumer, RichTextRenderer};
use crate::document::{Block, CodeBlock, Inline, List};
use crate::highlight::{HighlightError, highlight_to_rich_text};
use crate::style::StyleKind;

const BULLET: &str = "• ";

impl<C: RichTextConsumer> RichTextRenderer<'_, C> {
    pub(super) fn render_block(&mut self, block: &Block) -> Result<(), RenderError> {
        match block {
            Block::Paragraph(inlines) => self.render_paragraph(inlines),
            Block::Heading { level, inlines } => self.render_heading(*level, inlines),
            Block::List(list) => self.render_list(list),
            Block::CodeBlock(code) => {
                self.render_code_block(code);
                Ok(())
            }
            Block::BlockQuote(children) => self.render_block_quote(children),
        }
    }

    fn render_blocks(&mut self, blocks: &[Block]) -> Result<(), RenderError> {
        for block in blocks {
            self.render_block(block)?;
        }
        Ok(())
    }

    fn render_paragraph(&mut self, inlines: &[Inline]) -> Result<(), RenderError> {
        trace!("paragraph (implicit: {})", self.implicit_paragraph);
        if self.implicit_paragraph {
            self.render_inlines(inlines);
            return Ok(());
        }
        self.ensure_line();
        self.render_inlines(inlines);
        self.ensure_line();
        self.vertical_space();
        Ok(())
    }

    fn render_heading(&mut self, level: u8, inlines: &[Inline]) -> Result<(), RenderError> {
        trace!("heading level {level}");
        let style = self.ctx.resolve(StyleKind::Heading(level));
        self.ensure_line();
        self.write(&style.begin());
        self.render_inlines(inlines);
        self.write(&style.end());
        self.ensure_line();
        self.vertical_space();
        Ok(())
    }

    fn render_list(&mut self, list: &List) -> Result<(), RenderError> {
        trace!("list of {} items (ordered: {})", list.items.len(), list.ordered);
        let was_implicit = self.implicit_paragraph;
        self.implicit_paragraph = true;

        let wrap_root = !was_implicit && self.ctx.style.indent_root_lists;
        if wrap_root {
            self.begin_indent(None);
        }

        for item in &list.items {
            let prefix = if list.ordered {
                format!("{}. ", item.order)
            } else {
                BULLET.to_string()
            };
            self.begin_indent(Some(&prefix));
            self.render_blocks(&item.blocks)?;
            self.end_indent()?;
        }

        self.implicit_paragraph = was_implicit;
        if !was_implicit {
            if wrap_root {
                self.end_indent()?;
            }
            self.hint_newline();
            self.vertical_space();
        }
        Ok(())
    }

    fn render_code_block(&mut self, code: &CodeBlock) {
        trace!("code block ({:?})", code.language);
        let standalone = !self.implicit_paragraph;
        if standalone {
            self.push_as_text_block();
        }

        let source = code.source();
        self.ensure_line();
        match self.highlighted(code.language.as_deref(), &source) {
            Some(rich_text) => self.write(&rich_text),
            None => self.write_escaped(&source),
        }
        self.ensure_line();

        if standalone {
            self.push_as_code_block();
        }
    }

    /// Projected markup for `source`, or `None` when it should be written plain.
    fn highlighted(&self, language: Option<&str>, source: &str) -> Option<String> {
        let language = language?;
        let highlighter = self.ctx.highlighter?;
        match highlight_to_rich_text(highlighter, language, source, &self.ctx.style.code_theme) {
            Ok(rich_text) => Some(rich_text),
            Err(HighlightError::UnknownLanguage(language)) => {
                debug!("no highlighting for unknown language `{language}`");
                None
            }
            Err(err) => {
                debug!("falling back to plain code: {err}");
                None
            }
        }
    }

    fn render_block_quote(&mut self, children: &[Block]) -> Result<(), RenderError> {
        trace!("block quote");
        self.begin_indent(None);
        self.render_blocks(children)?;
        self.end_indent()?;
        self.ensure_line();
        Ok(())
    }
}
