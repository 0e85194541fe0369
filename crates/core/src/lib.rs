//! grepast_core - Core library for structure-aware grep
//!
//! This crate finds lines matching a pattern in source code and shows them
//! inside their syntactic context: the headers of enclosing functions and
//! classes, a preview of scopes opened on a matched line, and ellipses in
//! place of everything else. Structure comes from Tree-sitter, so it works
//! on incomplete or malformed code too.
//!
//! # Features
//!
//! - **Scope index**: per-line record of enclosing scopes and header lines.
//! - **Context expansion**: padding, parent headers, bounded child previews,
//!   top margin and gap closing.
//! - **Multi-language Support**: Python, JavaScript, TypeScript/TSX, Rust and Go.
//! - **Parallel search**: walk directories honoring `.gitignore`.
//! - **Multiple Output Formats**: text excerpts, JSON, YAML and a summary.
//!
//! # Example
//!
//! ```rust,no_run
//! use grepast_core::{format_output, GrepRequest, GrepScanner, OutputFormat, ScanConfig};
//! use std::path::PathBuf;
//!
//! let config = ScanConfig::new(vec![PathBuf::from(".")]);
//! let scanner = GrepScanner::new(config, GrepRequest::new("fn main")).unwrap();
//!
//! let result = scanner.scan().unwrap();
//! print!("{}", format_output(&result, OutputFormat::Text, true, false).unwrap());
//! ```

pub mod config;
pub mod engine;
pub mod models;
pub mod output;
pub mod parsers;

// Re-exports for convenience
pub use config::{ConfigError, ConfigFile, ContextOptions, ScanConfig, CONFIG_FILE_NAME};
pub use engine::{
    render_file, ContextError, GrepRequest, GrepScanner, LineMatcher, ScanError, ScopeIndex,
    SyntaxArena, TreeContext,
};
pub use models::{FileError, FileMatch, Language, SearchMetadata, SearchResult, SearchStats};
pub use output::{format_output, FormatError, OutputFormat};
pub use parsers::{create_parser, parse_syntax, ParserError};
