//! Analysis context for one source file
//!
//! A [`TreeContext`] owns the lines of a file, a snapshot of its syntax tree
//! and the structural index built from it. Callers feed it lines of
//! interest (directly or through [`TreeContext::grep`]), expand them into
//! the lines worth showing and render the excerpt.
//!
//! ```no_run
//! use grepast_core::{ContextOptions, TreeContext};
//!
//! let source = std::fs::read_to_string("src/main.rs").unwrap();
//! let mut context = TreeContext::new("src/main.rs", &source, ContextOptions::default()).unwrap();
//! let found = context.grep("fn main", false).unwrap();
//! context.mark_lines_of_interest(found);
//! context.expand_context();
//! print!("{}", context.render());
//! ```

use super::lines::LineStore;
use super::matcher::LineMatcher;
use super::scopes::ScopeIndex;
use super::syntax::SyntaxArena;
use crate::config::ContextOptions;
use crate::parsers::{self, ParserError};
use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;

/// Context errors
#[derive(Error, Debug)]
pub enum ContextError {
    #[error(transparent)]
    Parser(#[from] ParserError),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Lines, structure and selection state for a single file
#[derive(Debug)]
pub struct TreeContext {
    pub(super) filename: String,
    pub(super) options: ContextOptions,
    pub(super) lines: LineStore,
    pub(super) arena: SyntaxArena,
    pub(super) index: ScopeIndex,
    /// Highlighted renderings of matched lines
    pub(super) highlights: HashMap<usize, String>,
    pub(super) lines_of_interest: BTreeSet<usize>,
    pub(super) show_lines: BTreeSet<usize>,
    pub(super) done_parent_scopes: HashSet<usize>,
    pub(super) done_child_scopes: HashSet<usize>,
}

impl TreeContext {
    /// Parse `source` with the grammar resolved from `filename` and index it
    pub fn new(filename: &str, source: &str, options: ContextOptions) -> Result<Self, ContextError> {
        let language = parsers::language_for_file(filename)?;
        let arena = parsers::parse_syntax(&language, source)?;
        Ok(Self::from_syntax(filename, source, arena, options))
    }

    /// Index `source` using an already built syntax snapshot
    pub fn from_syntax(
        filename: &str,
        source: &str,
        arena: SyntaxArena,
        options: ContextOptions,
    ) -> Self {
        let lines = LineStore::new(source);
        let index = ScopeIndex::build(&arena, lines.len(), options.header_max);

        if options.verbose {
            for row in index.describe(&lines).lines() {
                tracing::debug!(target: "grepast::scopes", "{}", row);
            }
        }

        Self {
            filename: filename.to_string(),
            options,
            lines,
            arena,
            index,
            highlights: HashMap::new(),
            lines_of_interest: BTreeSet::new(),
            show_lines: BTreeSet::new(),
            done_parent_scopes: HashSet::new(),
            done_child_scopes: HashSet::new(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &LineStore {
        &self.lines
    }

    pub fn scope_index(&self) -> &ScopeIndex {
        &self.index
    }

    pub fn syntax(&self) -> &SyntaxArena {
        &self.arena
    }

    pub fn lines_of_interest(&self) -> &BTreeSet<usize> {
        &self.lines_of_interest
    }

    pub fn lines_to_show(&self) -> &BTreeSet<usize> {
        &self.show_lines
    }

    /// Per-line scope trace of this file
    pub fn scope_report(&self) -> String {
        self.index.describe(&self.lines)
    }

    /// Lines matching `pattern`. Fails without touching any state when the
    /// pattern does not compile.
    pub fn grep(&mut self, pattern: &str, ignore_case: bool) -> Result<BTreeSet<usize>, ContextError> {
        let matcher = LineMatcher::new(pattern, ignore_case)?;
        Ok(self.grep_with(&matcher))
    }

    /// Lines matching an already compiled pattern. Highlights are stored for
    /// matched lines when color is enabled.
    pub fn grep_with(&mut self, matcher: &LineMatcher) -> BTreeSet<usize> {
        let mut found = BTreeSet::new();

        for (i, line) in self.lines.iter().enumerate() {
            if !matcher.is_match(line) {
                continue;
            }
            if self.options.color {
                self.highlights.insert(i, matcher.highlight(line));
            }
            found.insert(i);
        }

        tracing::debug!(
            file = %self.filename,
            pattern = matcher.as_str(),
            matches = found.len(),
            "grep"
        );
        found
    }

    /// Add lines that must appear in the output. Indices past the end of
    /// the file are dropped.
    pub fn mark_lines_of_interest<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = usize>,
    {
        let line_count = self.lines.len();
        self.lines_of_interest
            .extend(lines.into_iter().filter(|line| *line < line_count));
    }
}
