//! Context expansion
//!
//! Grows the set of lines to show from the lines of interest: padding, the
//! closing line of the file, headers of enclosing scopes, a bounded preview
//! of scopes opened on a line of interest, the top margin, and finally gap
//! closing. Every pass only adds lines.

use super::context::TreeContext;
use super::syntax::NodeId;
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Scopes spanning fewer extra lines than this are revealed whole
const SMALL_SCOPE_LINES: usize = 5;
const PREVIEW_FRACTION: f64 = 0.10;
const MIN_PREVIEW_LINES: usize = 5;
const MAX_PREVIEW_LINES: usize = 25;

/// Lines a descendant preview may add for a scope spanning `size` extra lines
pub fn preview_budget(size: usize) -> usize {
    let scaled = (size as f64 * PREVIEW_FRACTION).round() as usize;
    scaled.clamp(MIN_PREVIEW_LINES, MAX_PREVIEW_LINES)
}

impl TreeContext {
    /// Expand the current lines of interest into the lines to show. Does
    /// nothing while there are no lines of interest.
    pub fn expand_context(&mut self) {
        if self.lines_of_interest.is_empty() {
            return;
        }

        let before = self.show_lines.len();
        let interest: Vec<usize> = self.lines_of_interest.iter().copied().collect();
        let line_count = self.lines.len();

        self.show_lines.extend(interest.iter().copied());

        let pad = self.options.loi_pad;
        if pad > 0 {
            for &line in &interest {
                let start = line.saturating_sub(pad);
                let end = line.saturating_add(pad).saturating_add(1).min(line_count);
                self.show_lines.extend(start..end);
            }
        }

        if self.options.last_line && line_count > 0 {
            let bottom = line_count - 1;
            self.show_lines.insert(bottom);
            self.add_parent_scopes(bottom);
        }

        if self.options.parent_context {
            for &line in &interest {
                self.add_parent_scopes(line);
            }
        }

        if self.options.child_context {
            for &line in &interest {
                self.add_child_context(line);
            }
        }

        if self.options.margin > 0 {
            self.show_lines.extend(0..self.options.margin.min(line_count));
        }

        self.close_small_gaps();

        tracing::debug!(
            file = %self.filename,
            interest = interest.len(),
            added = self.show_lines.len() - before,
            showing = self.show_lines.len(),
            "expanded context"
        );
    }

    /// Reveal the headers of every scope enclosing `line`
    fn add_parent_scopes(&mut self, line: usize) {
        let mut revealed = BTreeSet::new();
        self.collect_parent_scopes(line, &mut revealed);
        self.show_lines.extend(revealed);
    }

    /// Header lines of the scopes enclosing `line`, and with `last_line`
    /// also those enclosing each scope's closing line. Lines already
    /// expanded are skipped.
    fn collect_parent_scopes(&mut self, line: usize, out: &mut BTreeSet<usize>) {
        let line_count = self.lines.len();
        let mut worklist = vec![line];

        while let Some(current) = worklist.pop() {
            if !self.done_parent_scopes.insert(current) {
                continue;
            }
            let Some(owners) = self.index.scopes(current) else {
                continue;
            };

            for &owner in owners {
                let header = self.index.header(owner);
                if header.start > 0 || self.options.top_of_file_parent_scope {
                    out.extend(header.lines().filter(|l| *l < line_count));
                }
                if self.options.last_line {
                    worklist.push(self.index.last_line_of_scope(owner));
                }
            }
        }
    }

    /// Preview the structure of scopes starting on `line`: small scopes in
    /// full, larger ones through the headers of their biggest descendants.
    fn add_child_context(&mut self, line: usize) {
        if !self.done_child_scopes.insert(line) || self.index.nodes(line).is_empty() {
            return;
        }

        let line_count = self.lines.len();
        let last = self.index.last_line_of_scope(line);
        let size = last - line;

        if size < SMALL_SCOPE_LINES {
            let end = (last + 1).min(line_count);
            self.show_lines.extend(line..end);
            return;
        }

        let budget = preview_budget(size);

        let mut descendants: Vec<NodeId> = self
            .index
            .nodes(line)
            .iter()
            .flat_map(|id| self.arena.descendants(*id))
            .collect();
        // Stable: equal spans stay in pre-order
        descendants.sort_by_key(|id| Reverse(self.arena.node(*id).span()));

        let mut added = 0;
        for id in descendants {
            if added >= budget {
                break;
            }

            let mut revealed = BTreeSet::new();
            self.collect_parent_scopes(self.arena.node(id).start_row, &mut revealed);
            for l in revealed {
                if added >= budget {
                    break;
                }
                if self.show_lines.insert(l) {
                    added += 1;
                }
            }
        }
    }

    /// Attach blank lines following shown lines, then fill one-line gaps.
    ///
    /// Blank lines go first: a gap opened by an attached blank is filled in
    /// the same pass, so running this again finds nothing to add.
    fn close_small_gaps(&mut self) {
        let line_count = self.lines.len();

        let blanks: Vec<usize> = self
            .show_lines
            .iter()
            .copied()
            .filter(|&i| i + 1 < line_count && !self.lines.is_blank(i) && self.lines.is_blank(i + 1))
            .map(|i| i + 1)
            .collect();
        self.show_lines.extend(blanks);

        let gaps: Vec<usize> = self
            .show_lines
            .iter()
            .zip(self.show_lines.iter().skip(1))
            .filter(|(a, b)| **b - **a == 2)
            .map(|(a, _)| a + 1)
            .collect();
        self.show_lines.extend(gaps);
    }
}
