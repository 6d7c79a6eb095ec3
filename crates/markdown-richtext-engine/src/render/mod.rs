//! # Render Walker
//!
//! [`RichTextRenderer`] walks a [`Document`] once and drives a
//! [`RichTextConsumer`] through a small event vocabulary:
//!
//! ```text
//! accept_text_block(markup)   ← a flushed run of paragraph/heading/list text
//! accept_code_block(markup)   ← a top-level code block, exported on its own
//! begin_indent(prefix?)       ← list item (prefix = gutter text) or quote
//! end_indent                  ← matching close
//! ensure_vertical_space       ← spacing after paragraphs, headings, lists
//! hint_newline                ← force a break after a list
//! finalize                    ← close anything still open, produce output
//! ```
//!
//! Inline content is written into a pending buffer; structural events flush it
//! to the consumer first. The same walk produces a flat markup string
//! ([`crate::flat::RichTextAccumulator`]) or a node tree
//! ([`crate::tree::TreeBuilder`]), depending on the consumer.
//!
//! ## Modules
//!
//! - **`blocks`**: block handlers (paragraph, heading, list, code, quote)
//! - **`inlines`**: inline handlers (literal, emphasis, code span, link, break)

mod blocks;
mod inlines;

pub use inlines::emphasis_tag;

use std::mem;
use thiserror::Error;

use crate::document::Document;
use crate::highlight::Highlighter;
use crate::markup;
use crate::style::{DefaultTextStyleProvider, RenderStyle, StyleKind, TextStyle, TextStyleProvider};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("end_indent called with no open indent")]
    UnbalancedIndent,
}

/// Read-only configuration shared by the walker and its consumer.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub style: &'a RenderStyle,
    pub text_styles: &'a dyn TextStyleProvider,
    pub highlighter: Option<&'a dyn Highlighter>,
}

impl<'a> RenderContext<'a> {
    pub fn new(style: &'a RenderStyle) -> Self {
        Self {
            style,
            text_styles: &DefaultTextStyleProvider,
            highlighter: None,
        }
    }

    pub fn resolve(&self, kind: StyleKind) -> TextStyle {
        self.text_styles.resolve(kind, self.style)
    }

    pub fn default_text_style(&self) -> TextStyle {
        self.resolve(StyleKind::Text)
    }

    pub fn code_text_style(&self) -> TextStyle {
        self.resolve(StyleKind::Code)
    }
}

/// Sink for render events. See the module docs for the event vocabulary.
pub trait RichTextConsumer {
    type Output;

    fn accept_code_block(&mut self, ctx: &RenderContext<'_>, rich_text: &str);
    fn accept_text_block(&mut self, ctx: &RenderContext<'_>, rich_text: &str);
    fn begin_indent(&mut self, ctx: &RenderContext<'_>, prefix: Option<&str>);
    fn end_indent(&mut self, ctx: &RenderContext<'_>) -> Result<(), RenderError>;
    fn ensure_vertical_space(&mut self, ctx: &RenderContext<'_>);

    fn hint_newline(&mut self, _ctx: &RenderContext<'_>) {}

    /// Closes any structure still open and produces the output.
    fn finalize(self, ctx: &RenderContext<'_>) -> Self::Output;
}

pub struct RichTextRenderer<'a, C> {
    consumer: C,
    ctx: RenderContext<'a>,
    /// Pending inline markup not yet handed to the consumer.
    writer: String,
    fresh_line: bool,
    implicit_paragraph: bool,
}

impl<'a, C: RichTextConsumer> RichTextRenderer<'a, C> {
    pub fn new(consumer: C, style: &'a RenderStyle) -> Self {
        Self {
            consumer,
            ctx: RenderContext::new(style),
            writer: String::new(),
            fresh_line: true,
            implicit_paragraph: false,
        }
    }

    pub fn with_text_styles(mut self, text_styles: &'a dyn TextStyleProvider) -> Self {
        self.ctx.text_styles = text_styles;
        self
    }

    pub fn with_highlighter(mut self, highlighter: &'a dyn Highlighter) -> Self {
        self.ctx.highlighter = Some(highlighter);
        self
    }

    pub fn render(mut self, document: &Document) -> Result<C::Output, RenderError> {
        for block in &document.blocks {
            self.render_block(block)?;
        }
        self.push_as_text_block();
        Ok(self.consumer.finalize(&self.ctx))
    }

    fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.writer.push_str(text);
        self.fresh_line = text.ends_with('\n');
    }

    fn write_line(&mut self, text: &str) {
        self.writer.push_str(text);
        self.writer.push('\n');
        self.fresh_line = true;
    }

    fn write_escaped(&mut self, text: &str) {
        let escaped = markup::escape(text);
        self.write(&escaped);
    }

    fn ensure_line(&mut self) {
        if !self.fresh_line {
            self.write_line("");
        }
    }

    fn take_pending(&mut self) -> String {
        self.fresh_line = true;
        mem::take(&mut self.writer)
    }

    fn push_as_text_block(&mut self) {
        let text = self.take_pending();
        if text.trim().is_empty() {
            return;
        }
        self.consumer.accept_text_block(&self.ctx, &text);
    }

    fn push_as_code_block(&mut self) {
        let text = self.take_pending();
        self.consumer.accept_code_block(&self.ctx, &text);
    }

    fn begin_indent(&mut self, prefix: Option<&str>) {
        self.push_as_text_block();
        self.consumer.begin_indent(&self.ctx, prefix);
    }

    fn end_indent(&mut self) -> Result<(), RenderError> {
        self.push_as_text_block();
        self.consumer.end_indent(&self.ctx)
    }

    fn vertical_space(&mut self) {
        self.push_as_text_block();
        self.consumer.ensure_vertical_space(&self.ctx);
    }

    fn hint_newline(&mut self) {
        self.consumer.hint_newline(&self.ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, CodeBlock, Inline, Link, List, ListItem};
    use crate::highlight::{HighlightError, Scope, ScopeStyle, ScopeStyleSheet};
    use crate::style::Color;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Text(String),
        Code(String),
        Begin(Option<String>),
        End,
        Space,
        Newline,
    }

    /// Records events and checks indent balance, like a real consumer would.
    #[derive(Default)]
    struct RecordingConsumer {
        events: Vec<Event>,
        depth: usize,
    }

    impl RichTextConsumer for RecordingConsumer {
        type Output = Vec<Event>;

        fn accept_code_block(&mut self, _ctx: &RenderContext<'_>, rich_text: &str) {
            self.events.push(Event::Code(rich_text.to_string()));
        }

        fn accept_text_block(&mut self, _ctx: &RenderContext<'_>, rich_text: &str) {
            self.events.push(Event::Text(rich_text.to_string()));
        }

        fn begin_indent(&mut self, _ctx: &RenderContext<'_>, prefix: Option<&str>) {
            self.depth += 1;
            self.events.push(Event::Begin(prefix.map(str::to_string)));
        }

        fn end_indent(&mut self, _ctx: &RenderContext<'_>) -> Result<(), RenderError> {
            self.depth = self.depth.checked_sub(1).ok_or(RenderError::UnbalancedIndent)?;
            self.events.push(Event::End);
            Ok(())
        }

        fn ensure_vertical_space(&mut self, _ctx: &RenderContext<'_>) {
            self.events.push(Event::Space);
        }

        fn hint_newline(&mut self, _ctx: &RenderContext<'_>) {
            self.events.push(Event::Newline);
        }

        fn finalize(self, _ctx: &RenderContext<'_>) -> Vec<Event> {
            assert_eq!(self.depth, 0, "indents left open at finalize");
            self.events
        }
    }

    fn record(blocks: Vec<Block>) -> Vec<Event> {
        let style = RenderStyle::default();
        RichTextRenderer::new(RecordingConsumer::default(), &style)
            .render(&Document::new(blocks))
            .unwrap()
    }

    fn text(s: &str) -> Event {
        Event::Text(s.to_string())
    }

    fn paragraph(s: &str) -> Block {
        Block::Paragraph(vec![Inline::literal(s)])
    }

    fn item(order: u64, blocks: Vec<Block>) -> ListItem {
        ListItem { order, blocks }
    }

    fn render_inlines(inlines: Vec<Inline>) -> String {
        match record(vec![Block::Paragraph(inlines)]).into_iter().next() {
            Some(Event::Text(text)) => text,
            other => panic!("expected a text block, got {other:?}"),
        }
    }

    struct FixedHighlighter(Result<Vec<Scope>, ()>);

    impl Highlighter for FixedHighlighter {
        fn highlight(&self, language: &str, _source: &str) -> Result<Vec<Scope>, HighlightError> {
            self.0
                .clone()
                .map_err(|_| HighlightError::Failed(format!("{language} exploded")))
        }
    }

    #[test]
    fn paragraphs_flush_with_vertical_space() {
        let events = record(vec![paragraph("one"), paragraph("two")]);

        assert_eq!(
            events,
            vec![text("one\n"), Event::Space, text("two\n"), Event::Space]
        );
    }

    #[test]
    fn heading_wraps_inlines_in_heading_style() {
        let events = record(vec![Block::Heading {
            level: 1,
            inlines: vec![Inline::literal("Title")],
        }]);

        assert_eq!(
            events,
            vec![
                text("<color=#FFFFFFFF><size=31.5>Title</size></color>\n"),
                Event::Space
            ]
        );
    }

    #[test]
    fn ordered_list_prefixes_follow_item_order() {
        let list = Block::List(List {
            ordered: true,
            items: vec![
                item(1, vec![paragraph("a")]),
                item(2, vec![paragraph("b")]),
                item(3, vec![paragraph("c")]),
            ],
        });

        let prefixes: Vec<_> = record(vec![list])
            .into_iter()
            .filter_map(|e| match e {
                Event::Begin(Some(prefix)) => Some(prefix),
                _ => None,
            })
            .collect();

        assert_eq!(prefixes, vec!["1. ", "2. ", "3. "]);
    }

    #[test]
    fn root_list_is_wrapped_in_silent_indent() {
        let list = Block::List(List {
            ordered: false,
            items: vec![item(1, vec![paragraph("a"), paragraph("b")])],
        });

        assert_eq!(
            record(vec![list]),
            vec![
                Event::Begin(None),
                Event::Begin(Some("• ".into())),
                text("ab"),
                Event::End,
                Event::End,
                Event::Newline,
                Event::Space,
            ]
        );
    }

    #[test]
    fn root_list_indent_can_be_disabled() {
        let style = RenderStyle {
            indent_root_lists: false,
            ..RenderStyle::default()
        };
        let list = Block::List(List {
            ordered: false,
            items: vec![item(1, vec![paragraph("a")])],
        });

        let events = RichTextRenderer::new(RecordingConsumer::default(), &style)
            .render(&Document::new(vec![list]))
            .unwrap();

        assert_eq!(
            events,
            vec![
                Event::Begin(Some("• ".into())),
                text("a"),
                Event::End,
                Event::Newline,
                Event::Space,
            ]
        );
    }

    #[test]
    fn nested_list_does_not_add_root_indent_or_spacing() {
        let inner = Block::List(List {
            ordered: false,
            items: vec![item(1, vec![paragraph("child")])],
        });
        let outer = Block::List(List {
            ordered: false,
            items: vec![item(1, vec![paragraph("parent"), inner])],
        });

        assert_eq!(
            record(vec![outer]),
            vec![
                Event::Begin(None),
                Event::Begin(Some("• ".into())),
                text("parent"),
                Event::Begin(Some("• ".into())),
                text("child"),
                Event::End,
                Event::End,
                Event::End,
                Event::Newline,
                Event::Space,
            ]
        );
    }

    #[test]
    fn block_quote_indents_without_prefix() {
        let quote = Block::BlockQuote(vec![paragraph("quoted")]);

        assert_eq!(
            record(vec![quote]),
            vec![Event::Begin(None), text("quoted\n"), Event::Space, Event::End]
        );
    }

    #[test]
    fn top_level_code_block_is_exported_after_pending_text() {
        let blocks = vec![
            Block::List(List {
                ordered: false,
                items: vec![item(1, vec![paragraph("before")])],
            }),
            Block::CodeBlock(CodeBlock {
                lines: vec!["a < b".into()],
                language: None,
            }),
        ];

        assert_eq!(
            record(blocks),
            vec![
                Event::Begin(None),
                Event::Begin(Some("• ".into())),
                text("before"),
                Event::End,
                Event::End,
                Event::Newline,
                Event::Space,
                Event::Code("a <<space=0> b\n".into()),
            ]
        );
    }

    #[test]
    fn code_block_inside_list_stays_in_item_text() {
        let list = Block::List(List {
            ordered: false,
            items: vec![item(
                1,
                vec![
                    paragraph("run"),
                    Block::CodeBlock(CodeBlock {
                        lines: vec!["make".into()],
                        language: None,
                    }),
                ],
            )],
        });

        let events = record(vec![list]);
        assert!(events.contains(&text("run\nmake\n")));
        assert!(!events.iter().any(|e| matches!(e, Event::Code(_))));
    }

    #[test]
    fn known_language_is_projected_through_theme() {
        let style = RenderStyle {
            code_theme: ScopeStyleSheet::empty()
                .with("keyword", ScopeStyle::foreground(Color::rgb(0, 0, 0xFF))),
            ..RenderStyle::default()
        };
        let highlighter = FixedHighlighter(Ok(vec![Scope::new("keyword", 0, 2)]));
        let block = Block::CodeBlock(CodeBlock {
            lines: vec!["fn x".into()],
            language: Some("rust".into()),
        });

        let events = RichTextRenderer::new(RecordingConsumer::default(), &style)
            .with_highlighter(&highlighter)
            .render(&Document::new(vec![block]))
            .unwrap();

        assert_eq!(
            events,
            vec![Event::Code("<color=#0000FFFF>fn</color> x\n".into())]
        );
    }

    #[rstest]
    #[case::highlighter_fails(Some(FixedHighlighter(Err(()))), Some("rust"))]
    #[case::no_highlighter(None, Some("rust"))]
    #[case::no_language(Some(FixedHighlighter(Ok(vec![Scope::new("keyword", 0, 1)]))), None)]
    fn code_falls_back_to_escaped_text(
        #[case] highlighter: Option<FixedHighlighter>,
        #[case] language: Option<&str>,
    ) {
        let style = RenderStyle::default();
        let block = Block::CodeBlock(CodeBlock {
            lines: vec!["<tag>".into(), "x".into()],
            language: language.map(str::to_string),
        });

        let mut renderer = RichTextRenderer::new(RecordingConsumer::default(), &style);
        if let Some(highlighter) = &highlighter {
            renderer = renderer.with_highlighter(highlighter);
        }
        let events = renderer.render(&Document::new(vec![block])).unwrap();

        assert_eq!(events, vec![Event::Code("<<space=0>tag>\nx\n".into())]);
    }

    #[rstest]
    #[case('*', 2, Some("b"))]
    #[case('*', 1, Some("i"))]
    #[case('_', 2, Some("u"))]
    #[case('_', 1, Some("i"))]
    #[case('~', 2, Some("s"))]
    #[case('~', 1, Some("sub"))]
    #[case('^', 1, Some("sup"))]
    #[case('^', 2, None)]
    #[case('*', 3, None)]
    #[case('=', 2, None)]
    fn emphasis_maps_delimiters_to_tags(
        #[case] delimiter: char,
        #[case] count: u8,
        #[case] tag: Option<&str>,
    ) {
        let rendered = render_inlines(vec![Inline::emphasis(
            delimiter,
            count,
            vec![Inline::literal("x")],
        )]);

        let expected = match tag {
            Some(tag) => format!("<{tag}>x</{tag}>\n"),
            None => "x\n".to_string(),
        };
        assert_eq!(rendered, expected);
    }

    #[test]
    fn code_span_is_marked_and_escaped() {
        let rendered = render_inlines(vec![Inline::CodeSpan("Vec<u8>".into())]);

        assert_eq!(
            rendered,
            concat!(
                "<mark=#FFFFFF1A> <color=#FFFFFFFF><size=12.25>",
                "Vec<<space=0>u8>",
                "</size></color> </mark>\n",
            )
        );
    }

    #[test]
    fn link_prefers_dynamic_url_and_encodes_quotes() {
        let link = Link::new("https://static.example", vec![Inline::literal("docs")])
            .with_dynamic_url(|| "https://example.com/?a=\"b\"".to_string());

        let rendered = render_inlines(vec![Inline::Link(link)]);

        assert_eq!(rendered, "<a href=\"https://example.com/?a=%22b%22\">docs</a>\n");
    }

    #[test]
    fn link_query_string_is_written_raw() {
        let link = Link::new("https://x.com/?a=1&b=2<3>", vec![Inline::literal("q")]);

        let rendered = render_inlines(vec![Inline::Link(link)]);

        assert_eq!(rendered, "<a href=\"https://x.com/?a=1&b=2<3>\">q</a>\n");
    }

    #[test]
    fn line_breaks_render_unless_last() {
        let rendered = render_inlines(vec![
            Inline::literal("a"),
            Inline::LineBreak { hard: false },
            Inline::literal("b"),
            Inline::LineBreak { hard: true },
            Inline::literal("c"),
            Inline::LineBreak { hard: true },
        ]);

        assert_eq!(rendered, "a b\nc\n");
    }

    #[test]
    fn literals_are_written_verbatim() {
        let rendered = render_inlines(vec![Inline::literal("already <<space=0>escaped")]);
        assert_eq!(rendered, "already <<space=0>escaped\n");
    }

    #[test]
    fn whitespace_only_text_is_not_flushed() {
        assert_eq!(record(vec![paragraph("   ")]), vec![Event::Space]);
    }

    #[test]
    fn unbalanced_end_indent_is_reported() {
        let style = RenderStyle::default();
        let ctx = RenderContext::new(&style);
        let mut consumer = RecordingConsumer::default();

        assert_eq!(consumer.end_indent(&ctx), Err(RenderError::UnbalancedIndent));
    }
}
