//! # Node Tree Output
//!
//! [`TreeBuilder`] turns render events into a tree of host nodes. It keeps a
//! stack of open frames; the bottom one is the root and is never popped.
//!
//! ```text
//! event                  stack (top right)        effect
//! accept_text_block      [root]                   root += text_block
//! begin_indent("• ")     [root, indent]           push frame
//! accept_text_block      [root, indent]           indent += text_block
//! end_indent             [root]                   root += indent_container(children, "• ")
//! finalize               []                       compose(root children)
//! ```
//!
//! Nodes are created by a [`NodeFactory`], so the same builder can target any
//! widget toolkit. [`ui::DefaultNodeFactory`] builds toolkit-neutral
//! [`ui::UiNode`]s.

pub mod ui;

use log::warn;

use crate::render::{RenderContext, RenderError, RichTextConsumer};

/// Creates host nodes for the tree builder.
pub trait NodeFactory {
    type Node;

    fn compose(&self, ctx: &RenderContext<'_>, blocks: Vec<Self::Node>) -> Self::Node;
    fn text_block(&self, ctx: &RenderContext<'_>, rich_text: &str) -> Self::Node;
    fn code_block(&self, ctx: &RenderContext<'_>, rich_text: &str) -> Self::Node;
    fn indent_container(
        &self,
        ctx: &RenderContext<'_>,
        blocks: Vec<Self::Node>,
        prefix: Option<&str>,
    ) -> Self::Node;
    fn vertical_spacer(&self, ctx: &RenderContext<'_>) -> Self::Node;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FrameKind {
    Compose,
    Indent { prefix: Option<String> },
}

#[derive(Debug)]
struct BlockFrame<N> {
    kind: FrameKind,
    blocks: Vec<N>,
}

impl<N> BlockFrame<N> {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            blocks: Vec::new(),
        }
    }

    fn close<F>(self, ctx: &RenderContext<'_>, factory: &F) -> N
    where
        F: NodeFactory<Node = N>,
    {
        match self.kind {
            FrameKind::Compose => factory.compose(ctx, self.blocks),
            FrameKind::Indent { prefix } => {
                factory.indent_container(ctx, self.blocks, prefix.as_deref())
            }
        }
    }
}

/// Frame-stack consumer producing one `F::Node` tree per render.
pub struct TreeBuilder<F: NodeFactory> {
    factory: F,
    frames: Vec<BlockFrame<F::Node>>,
}

impl<F: NodeFactory> TreeBuilder<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            frames: vec![BlockFrame::new(FrameKind::Compose)],
        }
    }

    /// Number of open frames, root included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn push_node(&mut self, node: F::Node) {
        // The root frame is only removed by `finalize`, which consumes `self`.
        if let Some(frame) = self.frames.last_mut() {
            frame.blocks.push(node);
        }
    }

    /// Pops the top frame into its parent. Fails without popping when the top
    /// is the root, or when `indent_only` is set and the top is not an indent.
    fn close_frame(&mut self, ctx: &RenderContext<'_>, indent_only: bool) -> bool {
        if self.frames.len() <= 1 {
            return false;
        }
        let is_indent = self
            .frames
            .last()
            .is_some_and(|frame| matches!(frame.kind, FrameKind::Indent { .. }));
        if indent_only && !is_indent {
            return false;
        }
        let Some(frame) = self.frames.pop() else {
            return false;
        };
        let node = frame.close(ctx, &self.factory);
        self.push_node(node);
        true
    }
}

impl<F: NodeFactory> RichTextConsumer for TreeBuilder<F> {
    type Output = F::Node;

    fn accept_code_block(&mut self, ctx: &RenderContext<'_>, rich_text: &str) {
        let node = self.factory.code_block(ctx, rich_text);
        self.push_node(node);
    }

    fn accept_text_block(&mut self, ctx: &RenderContext<'_>, rich_text: &str) {
        let node = self.factory.text_block(ctx, rich_text.trim());
        self.push_node(node);
    }

    fn begin_indent(&mut self, _ctx: &RenderContext<'_>, prefix: Option<&str>) {
        self.frames.push(BlockFrame::new(FrameKind::Indent {
            prefix: prefix.map(str::to_string),
        }));
    }

    fn end_indent(&mut self, ctx: &RenderContext<'_>) -> Result<(), RenderError> {
        if self.close_frame(ctx, true) {
            Ok(())
        } else {
            Err(RenderError::UnbalancedIndent)
        }
    }

    fn ensure_vertical_space(&mut self, ctx: &RenderContext<'_>) {
        let node = self.factory.vertical_spacer(ctx);
        self.push_node(node);
    }

    fn finalize(mut self, ctx: &RenderContext<'_>) -> F::Node {
        if self.frames.len() > 1 {
            warn!("closing {} frame(s) left open at finalize", self.frames.len() - 1);
        }
        while self.close_frame(ctx, false) {}

        let blocks = self.frames.pop().map(|root| root.blocks).unwrap_or_default();
        self.factory.compose(ctx, blocks)
    }
}
