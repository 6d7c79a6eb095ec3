//! Toolkit-neutral UI nodes and the default factory that builds them.
//!
//! A host maps each [`UiNode`] onto its own widgets: containers become boxes
//! with the given [`BoxLayout`], labels become rich-text labels.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

use super::NodeFactory;
use crate::render::RenderContext;
use crate::style::{Color, TextStyle};

pub const RICH_TEXT_CONTAINER: &str = "RichTextContainer";
pub const TEXT_CONTENT: &str = "TextContent";
pub const CODE_BLOCK: &str = "CodeBlock";
pub const CODE_CONTENT: &str = "CodeContent";
pub const INDENT_CONTAINER: &str = "IndentContainer";
pub const INDENT_PREFIX: &str = "IndentPrefix";
pub const VERTICAL_SPACER: &str = "VerticalSpacer";

/// Gap between the prefix text and the indented content.
const PREFIX_GAP: f32 = 4.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Edges {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn left(left: f32) -> Self {
        Self::new(left, 0.0, 0.0, 0.0)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxLayout {
    pub padding: Edges,
    pub border_radius: f32,
    pub background: Option<Color>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Taken out of flow and pinned to the parent's top-left corner.
    pub absolute: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiNode {
    Container {
        name: &'static str,
        layout: BoxLayout,
        children: Vec<UiNode>,
    },
    Label {
        name: &'static str,
        text: String,
        style: TextStyle,
        layout: BoxLayout,
    },
}

impl UiNode {
    pub fn name(&self) -> &'static str {
        match self {
            UiNode::Container { name, .. } | UiNode::Label { name, .. } => *name,
        }
    }

    pub fn children(&self) -> &[UiNode] {
        match self {
            UiNode::Container { children, .. } => children,
            UiNode::Label { .. } => &[],
        }
    }

    pub fn layout(&self) -> &BoxLayout {
        match self {
            UiNode::Container { layout, .. } | UiNode::Label { layout, .. } => layout,
        }
    }

    /// Indented one-node-per-line dump, handy for debugging and the CLI.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize) -> fmt::Result {
        write!(out, "{:indent$}{}", "", self.name(), indent = depth * 2)?;
        if let UiNode::Label { text, .. } = self {
            write!(out, " {text:?}")?;
        }
        write_layout(out, self.layout())?;
        writeln!(out)?;
        for child in self.children() {
            child.write_outline(out, depth + 1)?;
        }
        Ok(())
    }
}

fn write_layout(out: &mut String, layout: &BoxLayout) -> fmt::Result {
    let padding = layout.padding;
    if !padding.is_zero() {
        write!(
            out,
            " padding={} {} {} {}",
            padding.left, padding.top, padding.right, padding.bottom
        )?;
    }
    if layout.border_radius > 0.0 {
        write!(out, " radius={}", layout.border_radius)?;
    }
    if let Some(background) = layout.background {
        write!(out, " background={background}")?;
    }
    if let Some(width) = layout.width {
        write!(out, " width={width}")?;
    }
    if let Some(height) = layout.height {
        write!(out, " height={height}")?;
    }
    if layout.absolute {
        out.push_str(" absolute");
    }
    Ok(())
}

/// Layout knobs for [`DefaultNodeFactory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeLayout {
    /// Height of the spacer between blocks.
    pub vertical_spacing: f32,
    /// Code block background. Defaults to the code text color at
    /// `code_background_opacity`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_block_color: Option<Color>,
    pub code_block_border_radius: f32,
    pub code_block_padding: Edges,
    /// Replaces the resolved code style for code block text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_block_text_style: Option<TextStyle>,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            vertical_spacing: 8.0,
            code_block_color: None,
            code_block_border_radius: 8.0,
            code_block_padding: Edges::new(8.0, 4.0, 8.0, 4.0),
            code_block_text_style: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DefaultNodeFactory {
    layout: TreeLayout,
}

impl DefaultNodeFactory {
    pub fn new(layout: TreeLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &TreeLayout {
        &self.layout
    }
}

impl NodeFactory for DefaultNodeFactory {
    type Node = UiNode;

    fn compose(&self, _ctx: &RenderContext<'_>, blocks: Vec<UiNode>) -> UiNode {
        UiNode::Container {
            name: RICH_TEXT_CONTAINER,
            layout: BoxLayout::default(),
            children: blocks,
        }
    }

    fn text_block(&self, ctx: &RenderContext<'_>, rich_text: &str) -> UiNode {
        UiNode::Label {
            name: TEXT_CONTENT,
            text: rich_text.to_string(),
            style: ctx.default_text_style(),
            layout: BoxLayout::default(),
        }
    }

    fn code_block(&self, ctx: &RenderContext<'_>, rich_text: &str) -> UiNode {
        let style = match &self.layout.code_block_text_style {
            Some(style) => style.clone(),
            None => ctx.code_text_style(),
        };
        let background = self.layout.code_block_color.unwrap_or_else(|| {
            style
                .color
                .unwrap_or(Color::BLACK)
                .with_alpha_scaled(ctx.style.code_background_opacity)
        });

        let content = UiNode::Label {
            name: CODE_CONTENT,
            text: rich_text.to_string(),
            style,
            layout: BoxLayout::default(),
        };
        UiNode::Container {
            name: CODE_BLOCK,
            layout: BoxLayout {
                padding: self.layout.code_block_padding,
                border_radius: self.layout.code_block_border_radius,
                background: Some(background),
                ..BoxLayout::default()
            },
            children: vec![content],
        }
    }

    fn indent_container(
        &self,
        ctx: &RenderContext<'_>,
        blocks: Vec<UiNode>,
        prefix: Option<&str>,
    ) -> UiNode {
        let indent = ctx.style.indent_size;
        let mut children = Vec::with_capacity(blocks.len() + 1);
        if let Some(prefix) = prefix {
            let style = TextStyle {
                color: Some(ctx.default_text_style().color.unwrap_or(Color::WHITE)),
                ..TextStyle::default()
            };
            children.push(UiNode::Label {
                name: INDENT_PREFIX,
                text: prefix.to_string(),
                style,
                layout: BoxLayout {
                    padding: Edges::new(0.0, 0.0, PREFIX_GAP, 0.0),
                    width: Some(indent),
                    absolute: true,
                    ..BoxLayout::default()
                },
            });
        }
        children.extend(blocks);

        UiNode::Container {
            name: INDENT_CONTAINER,
            layout: BoxLayout {
                padding: Edges::left(indent),
                ..BoxLayout::default()
            },
            children,
        }
    }

    fn vertical_spacer(&self, _ctx: &RenderContext<'_>) -> UiNode {
        UiNode::Container {
            name: VERTICAL_SPACER,
            layout: BoxLayout {
                height: Some(self.layout.vertical_spacing),
                ..BoxLayout::default()
            },
            children: Vec::new(),
        }
    }
}
