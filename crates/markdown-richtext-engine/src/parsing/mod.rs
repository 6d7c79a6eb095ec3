//! # Markdown Parsing
//!
//! Converts Markdown text into a [`Document`] using `pulldown-cmark`.
//!
//! pulldown-cmark emits a flat stream of `Start`/`End` events. The processor
//! keeps a stack of open frames, one per unfinished container, and folds each
//! frame into its parent when its `End` arrives:
//!
//! ```text
//! - a *b*              Start(List)     [root, list]
//!                      Start(Item)     [root, list, item]
//!                      Text("a ")      [root, list, item, paragraph*]
//!                      Start(Emph)     [root, list, item, paragraph*, emph]
//!                      Text("b")       ...
//!                      End(Emph)       [root, list, item, paragraph*]
//!                      End(Item)       [root, list]            (paragraph* closed first)
//!                      End(List)       [root]
//! ```
//!
//! Tight list items carry their text without a `Paragraph` wrapper; the
//! processor opens an implicit paragraph (`*` above) for such text and closes
//! it at the next block boundary.
//!
//! pulldown-cmark doesn't say which character delimited an emphasis run, so
//! the processor reads it from the source at the event's start offset.
//!
//! Literal text is escaped here, once, so the renderer can write it verbatim.
//! Code spans and code blocks keep their raw text. Constructs the document
//! model has no place for (HTML blocks, rules, footnotes, metadata) are
//! dropped; inline HTML is kept as escaped text and images contribute their
//! alt text.

use log::trace;
use std::ops::Range;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::document::{Block, CodeBlock, Document, Inline, Link, List, ListItem};
use crate::markup;

/// Parses Markdown into a [`Document`].
pub fn parse_document(markdown: &str) -> Document {
    let options =
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_SUPERSCRIPT | Options::ENABLE_SUBSCRIPT;
    let mut processor = DocumentProcessor::new(markdown);
    for (event, range) in Parser::new_ext(markdown, options).into_offset_iter() {
        processor.process_event(event, range);
    }
    processor.finalize()
}

/// Replaces literal `\n` escape sequences with real newlines.
///
/// Useful when Markdown arrives through a channel that can't carry line
/// breaks, such as a single-line attribute value.
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

#[derive(Debug)]
enum Frame {
    Root(Vec<Block>),
    BlockQuote(Vec<Block>),
    List {
        ordered: bool,
        start: u64,
        items: Vec<ListItem>,
    },
    Item(Vec<Block>),
    Paragraph {
        inlines: Vec<Inline>,
        implicit: bool,
    },
    Heading {
        level: u8,
        inlines: Vec<Inline>,
    },
    CodeBlock {
        language: Option<String>,
        source: String,
    },
    Emphasis {
        delimiter: char,
        count: u8,
        children: Vec<Inline>,
    },
    Link {
        url: String,
        children: Vec<Inline>,
    },
    /// Inline container whose children are spliced into the parent (image alt text).
    Transparent(Vec<Inline>),
    /// Container the document model can't represent; swallows its content.
    Skipped,
}

/// What a frame turns into once closed.
enum Closed {
    Block(Block),
    Item(ListItem),
    Inline(Inline),
    Inlines(Vec<Inline>),
    Nothing,
}

impl Frame {
    fn accepts_blocks(&self) -> bool {
        matches!(self, Frame::Root(_) | Frame::BlockQuote(_) | Frame::Item(_))
    }

    fn inlines_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match self {
            Frame::Paragraph { inlines, .. } | Frame::Heading { inlines, .. } => Some(inlines),
            Frame::Emphasis { children, .. }
            | Frame::Link { children, .. }
            | Frame::Transparent(children) => Some(children),
            _ => None,
        }
    }

    fn close(self) -> Closed {
        match self {
            Frame::BlockQuote(blocks) => Closed::Block(Block::BlockQuote(blocks)),
            Frame::List { ordered, items, .. } => {
                Closed::Block(Block::List(List { ordered, items }))
            }
            // Order is assigned by the parent list.
            Frame::Item(blocks) => Closed::Item(ListItem { order: 0, blocks }),
            Frame::Paragraph { inlines, .. } => Closed::Block(Block::Paragraph(inlines)),
            Frame::Heading { level, inlines } => Closed::Block(Block::Heading { level, inlines }),
            Frame::CodeBlock { language, source } => Closed::Block(Block::CodeBlock(CodeBlock {
                lines: source.lines().map(str::to_string).collect(),
                language,
            })),
            Frame::Emphasis {
                delimiter,
                count,
                children,
            } => Closed::Inline(Inline::emphasis(delimiter, count, children)),
            Frame::Link { url, children } => Closed::Inline(Inline::Link(Link::new(url, children))),
            Frame::Transparent(children) => Closed::Inlines(children),
            Frame::Root(_) | Frame::Skipped => Closed::Nothing,
        }
    }
}

fn is_inline_tag(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis
            | Tag::Strong
            | Tag::Strikethrough
            | Tag::Superscript
            | Tag::Subscript
            | Tag::Link { .. }
            | Tag::Image { .. }
    )
}

fn is_inline_end(tag: &TagEnd) -> bool {
    matches!(
        tag,
        TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Superscript
            | TagEnd::Subscript
            | TagEnd::Link
            | TagEnd::Image
    )
}

/// Folds pulldown-cmark events into a [`Document`]; see the module docs.
struct DocumentProcessor<'s> {
    /// The Markdown being parsed; event ranges index into it.
    source: &'s str,
    /// Open frames; index 0 is the root and is never popped before `finalize`.
    frames: Vec<Frame>,
}

impl<'s> DocumentProcessor<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            frames: vec![Frame::Root(Vec::new())],
        }
    }

    fn process_event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start(tag, range.start),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push_inline(Inline::CodeSpan(code.into_string())),
            Event::InlineMath(math) | Event::DisplayMath(math) => self.push_literal(&math),
            Event::InlineHtml(html) => self.push_literal(&html),
            Event::SoftBreak => self.push_inline(Inline::LineBreak { hard: false }),
            Event::HardBreak => self.push_inline(Inline::LineBreak { hard: true }),
            Event::Rule => self.close_implicit_paragraph(),
            Event::Html(_) | Event::FootnoteReference(_) | Event::TaskListMarker(_) => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>, offset: usize) {
        if !is_inline_tag(&tag) {
            self.close_implicit_paragraph();
        }
        trace!("start {tag:?}");

        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph {
                inlines: Vec::new(),
                implicit: false,
            },
            Tag::Heading { level, .. } => Frame::Heading {
                level: level as u8,
                inlines: Vec::new(),
            },
            Tag::BlockQuote(_) => Frame::BlockQuote(Vec::new()),
            Tag::CodeBlock(kind) => Frame::CodeBlock {
                language: match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_string)
                    }
                    CodeBlockKind::Indented => None,
                },
                source: String::new(),
            },
            Tag::List(start) => Frame::List {
                ordered: start.is_some(),
                start: start.unwrap_or(1),
                items: Vec::new(),
            },
            Tag::Item => Frame::Item(Vec::new()),
            Tag::Emphasis => self.emphasis(self.delimiter_at(offset), 1),
            Tag::Strong => self.emphasis(self.delimiter_at(offset), 2),
            Tag::Strikethrough => self.emphasis('~', 2),
            Tag::Subscript => self.emphasis('~', 1),
            Tag::Superscript => self.emphasis('^', 1),
            Tag::Link { dest_url, .. } => {
                self.ensure_inline_frame();
                Frame::Link {
                    url: dest_url.into_string(),
                    children: Vec::new(),
                }
            }
            Tag::Image { .. } => {
                self.ensure_inline_frame();
                Frame::Transparent(Vec::new())
            }
            _ => Frame::Skipped,
        };
        self.frames.push(frame);
    }

    /// The emphasis delimiter that opens at `offset`: `_` or `*`.
    fn delimiter_at(&self, offset: usize) -> char {
        match self.source.as_bytes().get(offset) {
            Some(b'_') => '_',
            _ => '*',
        }
    }

    fn emphasis(&mut self, delimiter: char, count: u8) -> Frame {
        self.ensure_inline_frame();
        Frame::Emphasis {
            delimiter,
            count,
            children: Vec::new(),
        }
    }

    fn end(&mut self, tag: TagEnd) {
        if !is_inline_end(&tag) {
            self.close_implicit_paragraph();
        }
        trace!("end {tag:?}");
        self.close_top();
    }

    fn text(&mut self, text: &str) {
        if let Some(Frame::CodeBlock { source, .. }) = self.frames.last_mut() {
            source.push_str(text);
            return;
        }
        self.push_literal(text);
    }

    fn push_literal(&mut self, raw: &str) {
        self.push_inline(Inline::Literal(markup::escape(raw).into_owned()));
    }

    /// Opens an implicit paragraph when inline content lands directly in a
    /// block container (tight list items).
    fn ensure_inline_frame(&mut self) {
        if self.frames.last().is_some_and(Frame::accepts_blocks) {
            self.frames.push(Frame::Paragraph {
                inlines: Vec::new(),
                implicit: true,
            });
        }
    }

    fn close_implicit_paragraph(&mut self) {
        if matches!(self.frames.last(), Some(Frame::Paragraph { implicit: true, .. })) {
            self.close_top();
        }
    }

    fn push_inline(&mut self, inline: Inline) {
        self.ensure_inline_frame();
        let Some(inlines) = self.frames.last_mut().and_then(Frame::inlines_mut) else {
            return;
        };
        if let (Inline::Literal(text), Some(Inline::Literal(last))) =
            (&inline, inlines.last_mut())
        {
            last.push_str(text);
            return;
        }
        inlines.push(inline);
    }

    fn push_block(&mut self, block: Block) {
        if let Some(Frame::Root(blocks) | Frame::BlockQuote(blocks) | Frame::Item(blocks)) =
            self.frames.last_mut()
        {
            blocks.push(block);
        }
    }

    /// Pops the top frame and folds it into its parent. The root is never popped.
    fn close_top(&mut self) {
        if self.frames.len() <= 1 {
            return;
        }
        let Some(frame) = self.frames.pop() else {
            return;
        };
        match frame.close() {
            Closed::Block(block) => self.push_block(block),
            Closed::Item(mut item) => {
                if let Some(Frame::List { start, items, .. }) = self.frames.last_mut() {
                    item.order = *start + items.len() as u64;
                    items.push(item);
                }
            }
            Closed::Inline(inline) => self.push_inline(inline),
            Closed::Inlines(inlines) => {
                for inline in inlines {
                    self.push_inline(inline);
                }
            }
            Closed::Nothing => {}
        }
    }

    fn finalize(mut self) -> Document {
        while self.frames.len() > 1 {
            self.close_top();
        }
        match self.frames.pop() {
            Some(Frame::Root(blocks)) => Document::new(blocks),
            _ => Document::default(),
        }
    }
}
