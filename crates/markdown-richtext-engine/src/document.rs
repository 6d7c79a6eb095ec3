//! # Document Model
//!
//! The read-only tree the renderer walks. Block and inline kinds are closed
//! enums so the renderer can dispatch with an exhaustive `match`.
//!
//! [`Inline::Literal`] text is markup-safe: whoever builds the tree escapes it
//! once (see [`crate::markup::escape`]) and the renderer writes it verbatim.
//! [`Inline::CodeSpan`] and [`CodeBlock`] hold raw source and are escaped at
//! render time.

use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Heading { level: u8, inlines: Vec<Inline> },
    List(List),
    CodeBlock(CodeBlock),
    BlockQuote(Vec<Block>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// 1-based position as numbered by the parser.
    pub order: u64,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeBlock {
    pub lines: Vec<String>,
    /// Fence info word, e.g. `rust`.
    pub language: Option<String>,
}

impl CodeBlock {
    /// All lines joined, each terminated by `\n`.
    pub fn source(&self) -> String {
        let mut source = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            source.push_str(line);
            source.push('\n');
        }
        source
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Literal(String),
    Emphasis {
        delimiter: char,
        count: u8,
        children: Vec<Inline>,
    },
    CodeSpan(String),
    Link(Link),
    LineBreak {
        hard: bool,
    },
}

impl Inline {
    pub fn literal(text: impl Into<String>) -> Self {
        Inline::Literal(text.into())
    }

    pub fn emphasis(delimiter: char, count: u8, children: Vec<Inline>) -> Self {
        Inline::Emphasis {
            delimiter,
            count,
            children,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub url: String,
    /// Computes the target at render time; takes precedence over `url`.
    pub dynamic_url: Option<DynamicUrl>,
    pub children: Vec<Inline>,
}

impl Link {
    pub fn new(url: impl Into<String>, children: Vec<Inline>) -> Self {
        Self {
            url: url.into(),
            dynamic_url: None,
            children,
        }
    }

    pub fn with_dynamic_url(
        mut self,
        resolve: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.dynamic_url = Some(DynamicUrl(Arc::new(resolve)));
        self
    }

    pub fn href(&self) -> String {
        match &self.dynamic_url {
            Some(dynamic) => dynamic.resolve(),
            None => self.url.clone(),
        }
    }
}

/// URL callback attached to a [`Link`], invoked synchronously while rendering.
#[derive(Clone)]
pub struct DynamicUrl(Arc<dyn Fn() -> String + Send + Sync>);

impl DynamicUrl {
    pub fn resolve(&self) -> String {
        (self.0)()
    }
}

/// Two resolvers are equal only if they are the same closure.
impl PartialEq for DynamicUrl {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for DynamicUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DynamicUrl(..)")
    }
}
