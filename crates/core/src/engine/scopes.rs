//! Per-line structural index
//!
//! For every line the index records which scopes contain it, the header
//! interval of the scope starting on it and the syntax nodes starting on
//! it. Tables carry one slot past the last line because Tree-sitter reports
//! the end of a newline-terminated file as row `line_count`.

use super::lines::LineStore;
use super::syntax::{NodeId, SyntaxArena};
use std::collections::BTreeSet;
use std::ops::Range;

/// Half-open range of lines introducing a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSpan {
    pub start: usize,
    pub end: usize,
}

impl HeaderSpan {
    fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lines(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Largest node seen so far starting on a line
#[derive(Debug, Clone, Copy)]
struct HeaderCandidate {
    size: usize,
    start: usize,
    end: usize,
}

/// Read-only structural index over the lines of one file
#[derive(Debug, Clone)]
pub struct ScopeIndex {
    scopes: Vec<BTreeSet<usize>>,
    headers: Vec<HeaderSpan>,
    nodes: Vec<Vec<NodeId>>,
    scope_ends: Vec<usize>,
}

impl ScopeIndex {
    /// Index `arena` for a file of `line_count` lines, capping headers at
    /// `header_max` lines.
    pub fn build(arena: &SyntaxArena, line_count: usize, header_max: usize) -> Self {
        let slots = line_count + 1;
        let mut scopes = vec![BTreeSet::new(); slots];
        let mut nodes: Vec<Vec<NodeId>> = vec![Vec::new(); slots];
        let mut candidates: Vec<Option<HeaderCandidate>> = vec![None; slots];
        let mut scope_ends: Vec<usize> = (0..slots).collect();

        for id in arena.descendants(arena.root()) {
            let node = arena.node(id);
            let start = node.start_row;
            if start >= slots {
                continue;
            }

            nodes[start].push(id);
            scope_ends[start] = scope_ends[start].max(node.end_row);

            // Strictly larger only: equal spans keep the first node in pre-order
            let size = node.span();
            if size > 0 && candidates[start].map_or(true, |c| size > c.size) {
                candidates[start] = Some(HeaderCandidate {
                    size,
                    start,
                    end: node.end_row,
                });
            }

            let last = node.end_row.min(slots - 1);
            for line in start..=last {
                scopes[line].insert(start);
            }
        }

        let headers = candidates
            .iter()
            .enumerate()
            .map(|(line, candidate)| match candidate {
                Some(c) => HeaderSpan {
                    start: c.start,
                    end: c.end.min(c.start.saturating_add(header_max)),
                },
                None => HeaderSpan::single(line),
            })
            .collect();

        let index = Self {
            scopes,
            headers,
            nodes,
            scope_ends,
        };
        tracing::debug!(
            lines = line_count,
            nodes = arena.len(),
            owners = index.scope_owner_count(),
            "built scope index"
        );
        index
    }

    /// Number of table slots (`line_count + 1`)
    pub fn slots(&self) -> usize {
        self.scopes.len()
    }

    /// Scope-owner lines whose scope contains `line`
    pub fn scopes(&self, line: usize) -> Option<&BTreeSet<usize>> {
        self.scopes.get(line)
    }

    /// Header interval of the scope starting on `line`
    pub fn header(&self, line: usize) -> HeaderSpan {
        self.headers
            .get(line)
            .copied()
            .unwrap_or_else(|| HeaderSpan::single(line))
    }

    /// Syntax nodes starting on `line`
    pub fn nodes(&self, line: usize) -> &[NodeId] {
        self.nodes.get(line).map_or(&[], Vec::as_slice)
    }

    /// Last row of the largest scope starting on `line`, or `line` itself
    pub fn last_line_of_scope(&self, line: usize) -> usize {
        self.scope_ends.get(line).copied().unwrap_or(line)
    }

    /// Whether a node with a non-zero row span starts on `line`
    pub fn is_scope_owner(&self, line: usize) -> bool {
        self.last_line_of_scope(line) > line
    }

    fn scope_owner_count(&self) -> usize {
        (0..self.slots()).filter(|l| self.is_scope_owner(*l)).count()
    }

    /// Human-readable trace: scope set, line index and text for each line
    pub fn describe(&self, lines: &LineStore) -> String {
        let rendered: Vec<String> = (0..lines.len())
            .map(|i| {
                let owners: Vec<usize> = self
                    .scopes(i)
                    .map(|set| set.iter().copied().collect())
                    .unwrap_or_default();
                format!("{:?}", owners)
            })
            .collect();
        let width = rendered.iter().map(String::len).max().unwrap_or(0);

        let mut output = String::new();
        for (i, (scope_str, line)) in rendered.iter().zip(lines.iter()).enumerate() {
            output.push_str(&format!("{:<width$} {:>3} {}\n", scope_str, i, line));
        }
        output
    }
}
