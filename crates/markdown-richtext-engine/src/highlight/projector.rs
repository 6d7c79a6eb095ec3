//! Projects a scope forest onto its source text as inline markup.
//!
//! Every scope contributes an open insertion at its start and a close
//! insertion at its end, collected depth-first as `[open, children…, close]`.
//! A *stable* sort on offset alone then orders them: ties keep collection
//! order, so an outer scope opens before an inner one at the same offset and
//! a parent never closes before a child opens. Sibling scopes starting at the
//! same offset keep the order the highlighter gave them.
//!
//! Each gap between two insertions is written in the style of the innermost
//! scope still open at that point.

use crate::markup;

use super::{Scope, ScopeStyleSheet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    Open,
    Close,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TextInsertion<'s> {
    pub offset: usize,
    pub edge: Edge,
    /// Pairs an open insertion with its close.
    pub id: usize,
    pub name: &'s str,
}

pub fn project_scopes(source: &str, scopes: &[Scope], sheet: &ScopeStyleSheet) -> String {
    let insertions = collect_insertions(scopes);

    let mut out = String::with_capacity(source.len() * 2);
    let mut active: Vec<(usize, &str)> = Vec::new();
    let mut offset = 0;

    for insertion in &insertions {
        let index = floor_char_boundary(source, insertion.offset).max(offset);
        if index > offset {
            append_span(&mut out, &source[offset..index], active.last(), sheet);
            offset = index;
        }

        match insertion.edge {
            Edge::Open => active.push((insertion.id, insertion.name)),
            Edge::Close => {
                if let Some(pos) = active.iter().rposition(|(id, _)| *id == insertion.id) {
                    active.remove(pos);
                }
            }
        }
    }

    // A lone carriage return after the last insertion would render as an
    // orphan blank line.
    let remaining = &source[offset..];
    if remaining != "\r" {
        append_span(&mut out, remaining, active.last(), sheet);
    }

    out
}

pub(crate) fn collect_insertions(scopes: &[Scope]) -> Vec<TextInsertion<'_>> {
    let mut insertions = Vec::new();
    let mut next_id = 0;
    for scope in scopes {
        push_insertions(scope, &mut insertions, &mut next_id);
    }
    insertions.sort_by_key(|insertion| insertion.offset);
    insertions
}

fn push_insertions<'s>(scope: &'s Scope, out: &mut Vec<TextInsertion<'s>>, next_id: &mut usize) {
    let id = *next_id;
    *next_id += 1;

    out.push(TextInsertion {
        offset: scope.start,
        edge: Edge::Open,
        id,
        name: &scope.name,
    });
    for child in &scope.children {
        push_insertions(child, out, next_id);
    }
    out.push(TextInsertion {
        offset: scope.end(),
        edge: Edge::Close,
        id,
        name: &scope.name,
    });
}

fn append_span(
    out: &mut String,
    text: &str,
    scope: Option<&(usize, &str)>,
    sheet: &ScopeStyleSheet,
) {
    if text.is_empty() {
        return;
    }
    let text = markup::escape(text);

    match scope.and_then(|(_, name)| sheet.lookup(name)) {
        Some(style) => {
            let style = style.text_style();
            style.write_begin(out);
            out.push_str(&text);
            style.write_end(out);
        }
        None => out.push_str(&text),
    }
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut index = index;
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
