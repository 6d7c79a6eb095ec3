//! # markdown-richtext engine
//!
//! Renders a Markdown document either into one flat rich-text markup string
//! or into a tree of UI nodes. Both outputs come from the same walk:
//!
//! ```text
//! markdown ─▶ parsing ─▶ Document ─▶ RichTextRenderer ─▶ RichTextConsumer
//!                                         │                ├─ RichTextAccumulator ─▶ String
//!                                         │                └─ TreeBuilder<F>      ─▶ F::Node
//!                                         └─ highlight (code blocks)
//! ```

pub mod document;
pub mod flat;
pub mod highlight;
pub mod markup;
pub mod parsing;
pub mod render;
pub mod style;
pub mod tree;

// Re-export key types for easier usage
pub use document::{Block, CodeBlock, Document, DynamicUrl, Inline, Link, List, ListItem};
pub use flat::RichTextAccumulator;
pub use highlight::{
    HighlightError, Highlighter, Scope, ScopeStyle, ScopeStyleSheet, SyntectHighlighter,
};
pub use parsing::{parse_document, unescape_newlines};
pub use render::{RenderContext, RenderError, RichTextConsumer, RichTextRenderer};
pub use style::{Color, FontRef, RenderStyle, StyleKind, TextStyle, TextStyleProvider};
pub use tree::ui::{DefaultNodeFactory, TreeLayout, UiNode};
pub use tree::{NodeFactory, TreeBuilder};

/// Parses `markdown` and renders it as flat rich text, highlighting fenced
/// code with the shared syntect highlighter.
pub fn to_rich_text(markdown: &str, style: &RenderStyle) -> Result<String, RenderError> {
    let document = parse_document(markdown);
    RichTextRenderer::new(RichTextAccumulator::new(), style)
        .with_highlighter(SyntectHighlighter::shared())
        .render(&document)
}

/// Parses `markdown` and builds a node tree with `factory`.
pub fn to_tree<F: NodeFactory>(
    markdown: &str,
    style: &RenderStyle,
    factory: F,
) -> Result<F::Node, RenderError> {
    let document = parse_document(markdown);
    RichTextRenderer::new(TreeBuilder::new(factory), style)
        .with_highlighter(SyntectHighlighter::shared())
        .render(&document)
}
