//! Data models for structure-aware grep
//!
//! This module defines the languages the tool understands and the result
//! structures produced when searching files and directories.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Supported programming languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Rust,
    Go,
}

impl Language {
    /// Determine language from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" | "pyi" => Some(Language::Python),
            "js" | "mjs" | "cjs" | "jsx" => Some(Language::JavaScript),
            "ts" | "mts" | "cts" => Some(Language::TypeScript),
            "tsx" => Some(Language::Tsx),
            "rs" => Some(Language::Rust),
            "go" => Some(Language::Go),
            _ => None,
        }
    }

    /// Determine language from a file name or path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// All supported languages, in display order
    pub fn all() -> &'static [Language] {
        &[
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
            Language::Tsx,
            Language::Rust,
            Language::Go,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::Rust => "rust",
            Language::Go => "go",
        }
    }

    /// File extensions recognised for the language
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py", "pyi"],
            Language::JavaScript => &["js", "mjs", "cjs", "jsx"],
            Language::TypeScript => &["ts", "mts", "cts"],
            Language::Tsx => &["tsx"],
            Language::Rust => &["rs"],
            Language::Go => &["go"],
        }
    }

    /// Tree-sitter grammar for the language
    pub fn tree_sitter_language(&self) -> tree_sitter::Language {
        match self {
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
        }
    }
}

/// A file with at least one line of interest, rendered with its context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMatch {
    /// Path as given or as found while walking
    pub path: PathBuf,

    /// Language of the source file
    pub language: Language,

    /// Number of lines in the file
    pub line_count: usize,

    /// Lines of interest (1-indexed)
    pub matched_lines: Vec<usize>,

    /// Rendered excerpt
    pub rendered: String,
}

/// A file that could not be searched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

/// Summary statistics for a search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Files read and parsed
    pub files_scanned: usize,

    /// Files with at least one line of interest
    pub files_matched: usize,

    /// Lines of interest across all files
    pub total_matches: usize,

    /// Files that failed to read or parse
    pub files_with_errors: usize,
}

/// Metadata about the search operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchMetadata {
    /// Duration of search in milliseconds
    pub duration_ms: u64,

    /// ISO timestamp of search
    pub timestamp: String,

    /// Tool version
    pub tool_version: String,
}

/// Complete result of searching a set of paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Pattern searched for, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Matching files, sorted by path
    pub files: Vec<FileMatch>,

    /// Files that could not be searched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FileError>,

    pub stats: SearchStats,

    pub metadata: SearchMetadata,
}

impl SearchResult {
    /// Whether any file produced output
    pub fn has_matches(&self) -> bool {
        !self.files.is_empty()
    }
}
