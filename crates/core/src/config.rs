//! Configuration module
//!
//! This module provides the rendering options of a [`TreeContext`], the
//! configuration for searching paths, ignore filtering, and loading both
//! from a TOML file.
//!
//! [`TreeContext`]: crate::engine::TreeContext

use crate::models::Language;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file picked up from the working directory
pub const CONFIG_FILE_NAME: &str = ".grepast.toml";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    #[error("Failed to parse gitignore: {0}")]
    GitignoreError(#[from] ignore::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

/// Options controlling how context is expanded and rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextOptions {
    /// Highlight matches and marks with ANSI escapes
    pub color: bool,

    /// Log the per-line scope trace after indexing
    pub verbose: bool,

    /// Prefix shown lines with their 1-based number
    pub line_number: bool,

    /// Reveal headers of scopes enclosing each line of interest
    pub parent_context: bool,

    /// Reveal a bounded preview of scopes starting on a line of interest
    pub child_context: bool,

    /// Always show the last line of the file and the scopes it closes
    pub last_line: bool,

    /// Lines always shown at the top of the file
    pub margin: usize,

    /// Mark lines of interest with a solid block
    pub mark_lois: bool,

    /// Maximum number of lines in a scope header
    pub header_max: usize,

    /// Also reveal the header of scopes starting on the first line
    pub top_of_file_parent_scope: bool,

    /// Lines of padding around each line of interest
    pub loi_pad: usize,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            color: false,
            verbose: false,
            line_number: false,
            parent_context: true,
            child_context: true,
            last_line: true,
            margin: 3,
            mark_lois: true,
            header_max: 10,
            top_of_file_parent_scope: true,
            loi_pad: 1,
        }
    }
}

impl ContextOptions {
    /// Options with every expansion pass disabled; only lines of interest are shown
    pub fn bare() -> Self {
        Self {
            parent_context: false,
            child_context: false,
            last_line: false,
            margin: 0,
            top_of_file_parent_scope: false,
            loi_pad: 0,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_line_number(mut self, line_number: bool) -> Self {
        self.line_number = line_number;
        self
    }

    pub fn with_parent_context(mut self, enabled: bool) -> Self {
        self.parent_context = enabled;
        self
    }

    pub fn with_child_context(mut self, enabled: bool) -> Self {
        self.child_context = enabled;
        self
    }

    pub fn with_last_line(mut self, enabled: bool) -> Self {
        self.last_line = enabled;
        self
    }

    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_mark_lois(mut self, mark: bool) -> Self {
        self.mark_lois = mark;
        self
    }

    pub fn with_header_max(mut self, header_max: usize) -> Self {
        self.header_max = header_max;
        self
    }

    pub fn with_top_of_file_parent_scope(mut self, enabled: bool) -> Self {
        self.top_of_file_parent_scope = enabled;
        self
    }

    pub fn with_loi_pad(mut self, pad: usize) -> Self {
        self.loi_pad = pad;
        self
    }
}

/// Configuration for searching files and directories
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Files and directories to search
    pub paths: Vec<PathBuf>,

    /// Language filter applied while walking directories (None = all languages)
    pub language_filter: Option<Vec<Language>>,

    /// Custom ignore patterns
    pub ignore_patterns: Vec<String>,

    /// Path to custom ignore file
    pub ignore_file: Option<PathBuf>,

    /// Number of threads for parallel processing (0 = rayon default)
    pub threads: usize,

    /// Maximum file size to process (bytes)
    pub max_file_size: usize,

    /// Whether to follow symlinks
    pub follow_symlinks: bool,

    /// Whether to include hidden files
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            paths: vec![PathBuf::from(".")],
            language_filter: None,
            ignore_patterns: Vec::new(),
            ignore_file: None,
            threads: 0,
            max_file_size: 10 * 1024 * 1024, // 10 MB
            follow_symlinks: false,
            include_hidden: false,
        }
    }
}

impl ScanConfig {
    /// Create new config searching the given paths
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            ..Default::default()
        }
    }

    /// Set language filter (builder pattern)
    pub fn with_language_filter(mut self, languages: Vec<Language>) -> Self {
        self.language_filter = Some(languages);
        self
    }

    /// Set ignore patterns (builder pattern)
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Set ignore file path (builder pattern)
    pub fn with_ignore_file(mut self, path: PathBuf) -> Self {
        self.ignore_file = Some(path);
        self
    }

    /// Set number of threads (builder pattern)
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set max file size (builder pattern)
    pub fn with_max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set follow symlinks (builder pattern)
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set include hidden files (builder pattern)
    pub fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }
}

/// `[scan]` table of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    pub ignore: Vec<String>,
    pub include_hidden: bool,
    pub max_file_size: Option<usize>,
}

/// Contents of a `.grepast.toml` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub context: ContextOptions,
    pub scan: ScanSection,
}

impl ConfigFile {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load `.grepast.toml` from `dir` if present
    pub fn discover(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        tracing::debug!(path = %path.display(), "loading configuration file");
        Self::load(&path).map(Some)
    }

    /// Fold the `[scan]` table into a scan configuration
    pub fn apply_scan(&self, mut config: ScanConfig) -> ScanConfig {
        config.ignore_patterns.extend(self.scan.ignore.iter().cloned());
        config.include_hidden |= self.scan.include_hidden;
        if let Some(size) = self.scan.max_file_size {
            config.max_file_size = size;
        }
        config
    }
}

/// Filter for ignoring files and directories
pub struct IgnoreFilter {
    /// Gitignore rules, one matcher per searched root
    gitignores: Vec<Gitignore>,

    /// Custom glob patterns
    custom_globs: GlobSet,

    /// Default ignore patterns
    default_ignores: GlobSet,

    /// Whether to include hidden files
    include_hidden: bool,
}

impl IgnoreFilter {
    /// Create a new ignore filter from config
    pub fn new(config: &ScanConfig) -> Result<Self, ConfigError> {
        let mut gitignores = Vec::new();
        for root in config.paths.iter().filter(|p| p.is_dir()) {
            if let Some(gi) = Self::build_gitignore(root, config.ignore_file.as_deref())? {
                gitignores.push(gi);
            }
        }

        let custom_globs = Self::build_globset(&config.ignore_patterns)?;

        let default_patterns: Vec<String> = [
            "**/node_modules/**",
            "**/.git/**",
            "**/__pycache__/**",
            "**/.venv/**",
            "**/venv/**",
            "**/dist/**",
            "**/build/**",
            "**/target/**",
            "**/.tox/**",
            "**/.pytest_cache/**",
            "**/.mypy_cache/**",
            "**/*.min.js",
            "**/*.bundle.js",
            "**/vendor/**",
            "**/.next/**",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let default_ignores = Self::build_globset(&default_patterns)?;

        Ok(Self {
            gitignores,
            custom_globs,
            default_ignores,
            include_hidden: config.include_hidden,
        })
    }

    /// Build gitignore rules for a root directory
    fn build_gitignore(
        root: &Path,
        ignore_file: Option<&Path>,
    ) -> Result<Option<Gitignore>, ConfigError> {
        let path = match ignore_file {
            Some(file) => file.to_path_buf(),
            None => root.join(".gitignore"),
        };
        if !path.exists() {
            return Ok(None);
        }

        let mut builder = GitignoreBuilder::new(root);
        if let Some(err) = builder.add(&path) {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable ignore file");
            return Ok(None);
        }
        Ok(Some(builder.build()?))
    }

    /// Build a globset from patterns
    fn build_globset(patterns: &[String]) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidGlob(e.to_string()))?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| ConfigError::InvalidGlob(e.to_string()))
    }

    /// Check if a path should be ignored
    pub fn should_ignore(&self, path: &Path, is_dir: bool) -> bool {
        let path_str = path.to_string_lossy();

        if !self.include_hidden {
            if let Some(name) = path.file_name() {
                let name = name.to_string_lossy();
                if name.starts_with('.') && name != "." && name != ".." {
                    return true;
                }
            }
        }

        if self.default_ignores.is_match(&*path_str) {
            return true;
        }

        if self.custom_globs.is_match(&*path_str) {
            return true;
        }

        self.gitignores
            .iter()
            .any(|gi| gi.matched(path, is_dir).is_ignore())
    }

    /// Check if path has a supported language passing the filter
    pub fn matches_language_filter(&self, path: &Path, filter: &Option<Vec<Language>>) -> bool {
        let Some(lang) = Language::from_path(path) else {
            return false;
        };

        match filter {
            Some(langs) => langs.contains(&lang),
            None => true,
        }
    }
}
