//! # Code Highlighting
//!
//! Highlighting is split at a narrow boundary:
//!
//! - a [`Highlighter`] turns source text into a forest of [`Scope`]s
//!   (byte ranges tagged with a scope name, arbitrarily nested)
//! - the projector ([`project_scopes`]) turns that forest into inline markup,
//!   looking each scope name up in a [`ScopeStyleSheet`]
//!
//! ```text
//! "let x = 1;"  →  Highlighter  →  [Scope(storage 0..3), Scope(constant.numeric 8..9)]
//!               →  project_scopes  →  "<color=#0000FFFF>let</color> x = <color=…>1</color>;"
//! ```
//!
//! Callers treat every [`HighlightError`] as recoverable: the code is written
//! escaped and unstyled instead.

pub mod projector;
pub mod syntax;
pub mod theme;

pub use projector::project_scopes;
pub use syntax::SyntectHighlighter;
pub use theme::{ScopeStyle, ScopeStyleSheet};

use thiserror::Error;

/// A highlighted span of source text. Offsets are byte offsets.
///
/// Children lie inside the parent's span; siblings may overlap each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub start: usize,
    pub length: usize,
    pub name: String,
    pub children: Vec<Scope>,
}

impl Scope {
    pub fn new(name: impl Into<String>, start: usize, length: usize) -> Self {
        Self {
            start,
            length,
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Scope>) -> Self {
        self.children = children;
        self
    }

    pub fn end(&self) -> usize {
        self.start.saturating_add(self.length)
    }
}

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("no syntax known for language `{0}`")]
    UnknownLanguage(String),
    #[error("highlighting failed: {0}")]
    Failed(String),
}

pub trait Highlighter: Send + Sync {
    fn highlight(&self, language: &str, source: &str) -> Result<Vec<Scope>, HighlightError>;
}

/// Highlights `source` and projects the scopes into markup in one step.
pub fn highlight_to_rich_text(
    highlighter: &dyn Highlighter,
    language: &str,
    source: &str,
    sheet: &ScopeStyleSheet,
) -> Result<String, HighlightError> {
    let scopes = highlighter.highlight(language, source)?;
    Ok(project_scopes(source, &scopes, sheet))
}
