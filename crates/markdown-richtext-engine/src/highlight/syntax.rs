//! [`Highlighter`] backed by syntect's bundled Sublime syntaxes.
//!
//! syntect reports, per line, a list of scope-stack operations at byte
//! offsets. Pushes open a scope and pops close the most recent one, which
//! folds directly into a nested [`Scope`] forest.

use std::sync::LazyLock;
use syntect::parsing::{ClearAmount, ParseState, ScopeStackOp, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::{HighlightError, Highlighter, Scope};

static SHARED: LazyLock<SyntectHighlighter> = LazyLock::new(SyntectHighlighter::default);

pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
}

impl SyntectHighlighter {
    pub fn new(syntaxes: SyntaxSet) -> Self {
        Self { syntaxes }
    }

    /// Process-wide instance with the default syntaxes, loaded on first use.
    pub fn shared() -> &'static SyntectHighlighter {
        &SHARED
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new(SyntaxSet::load_defaults_newlines())
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, language: &str, source: &str) -> Result<Vec<Scope>, HighlightError> {
        let syntax = self
            .syntaxes
            .find_syntax_by_token(language)
            .ok_or_else(|| HighlightError::UnknownLanguage(language.to_string()))?;

        let mut state = ParseState::new(syntax);
        let mut forest = ScopeForestBuilder::default();
        let mut line_start = 0;

        for line in LinesWithEndings::from(source) {
            let ops = state
                .parse_line(line, &self.syntaxes)
                .map_err(|e| HighlightError::Failed(e.to_string()))?;
            for (index, op) in ops {
                forest.apply(line_start + index, op);
            }
            line_start += line.len();
        }

        Ok(forest.finish(source.len()))
    }
}

struct OpenScope {
    start: usize,
    name: String,
    children: Vec<Scope>,
}

#[derive(Default)]
struct ScopeForestBuilder {
    open: Vec<OpenScope>,
    roots: Vec<Scope>,
}

impl ScopeForestBuilder {
    fn apply(&mut self, offset: usize, op: ScopeStackOp) {
        match op {
            ScopeStackOp::Push(scope) => self.open.push(OpenScope {
                start: offset,
                name: scope.build_string(),
                children: Vec::new(),
            }),
            ScopeStackOp::Pop(count) => self.close(offset, count),
            // Cleared scopes are treated as closed; the matching Restore has
            // nothing left to reopen.
            ScopeStackOp::Clear(ClearAmount::TopN(count)) => self.close(offset, count),
            ScopeStackOp::Clear(ClearAmount::All) => self.close(offset, self.open.len()),
            ScopeStackOp::Restore | ScopeStackOp::Noop => {}
        }
    }

    fn close(&mut self, offset: usize, count: usize) {
        for _ in 0..count {
            let Some(open) = self.open.pop() else {
                return;
            };
            let length = offset.saturating_sub(open.start);
            if length == 0 && open.children.is_empty() {
                continue;
            }

            let scope = Scope {
                start: open.start,
                length,
                name: open.name,
                children: open.children,
            };
            match self.open.last_mut() {
                Some(parent) => parent.children.push(scope),
                None => self.roots.push(scope),
            }
        }
    }

    fn finish(mut self, end: usize) -> Vec<Scope> {
        let remaining = self.open.len();
        self.close(end, remaining);
        self.roots
    }
}
