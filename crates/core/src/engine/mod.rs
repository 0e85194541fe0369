//! Grep engine module
//!
//! This module holds the structural pipeline: a syntax snapshot, the per-line
//! scope index built from it, the analysis context that matches lines and
//! expands them into a readable excerpt, and the scanner running that
//! pipeline over many files.

mod context;
mod expand;
mod lines;
mod matcher;
mod renderer;
mod scanner;
mod scopes;
mod syntax;

pub use context::{ContextError, TreeContext};
pub use expand::preview_budget;
pub use lines::LineStore;
pub use matcher::LineMatcher;
pub use renderer::ELLIPSIS;
pub use scanner::{render_file, GrepRequest, GrepScanner, ScanError};
pub use scopes::{HeaderSpan, ScopeIndex};
pub use syntax::{NodeId, SyntaxArena, SyntaxNode};
