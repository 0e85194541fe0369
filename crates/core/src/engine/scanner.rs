//! Multi-file search
//!
//! Expands the configured paths into source files, runs the grep, expand
//! and render pipeline on each one in parallel and collects the results.

use super::context::{ContextError, TreeContext};
use super::matcher::LineMatcher;
use crate::config::{ConfigError, ContextOptions, IgnoreFilter, ScanConfig};
use crate::models::{FileError, FileMatch, SearchMetadata, SearchResult, SearchStats};
use crate::parsers;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use walkdir::WalkDir;

/// Scanner errors
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
}

/// What to look for in each file
#[derive(Debug, Clone, Default)]
pub struct GrepRequest {
    /// Regular expression matched against each line
    pub pattern: Option<String>,

    pub ignore_case: bool,

    /// Explicit lines of interest (1-indexed), applied to every file
    pub lines: Vec<usize>,

    pub options: ContextOptions,
}

impl GrepRequest {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Default::default()
        }
    }

    /// Request marking only explicit lines, without a pattern
    pub fn for_lines(lines: Vec<usize>) -> Self {
        Self {
            lines,
            ..Default::default()
        }
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn with_lines(mut self, lines: Vec<usize>) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_options(mut self, options: ContextOptions) -> Self {
        self.options = options;
        self
    }
}

/// Main grep scanner
pub struct GrepScanner {
    config: ScanConfig,
    request: GrepRequest,
    matcher: Option<LineMatcher>,
    ignore_filter: IgnoreFilter,
}

impl GrepScanner {
    /// Create a scanner, compiling the pattern once for all files
    pub fn new(config: ScanConfig, request: GrepRequest) -> Result<Self, ScanError> {
        let matcher = match &request.pattern {
            Some(pattern) => Some(
                LineMatcher::new(pattern, request.ignore_case).map_err(ContextError::from)?,
            ),
            None => None,
        };
        let ignore_filter = IgnoreFilter::new(&config)?;

        Ok(Self {
            config,
            request,
            matcher,
            ignore_filter,
        })
    }

    /// Search every configured path
    pub fn scan(&self) -> Result<SearchResult, ScanError> {
        let start = Instant::now();

        let (candidates, mut errors) = self.find_source_files();
        let files_scanned = candidates.len();

        let outcomes: Vec<Result<Option<FileMatch>, FileError>> = if self.config.threads == 1 {
            candidates.iter().map(|path| self.search_file(path)).collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()
                .map_err(|e| ScanError::ThreadPoolError(e.to_string()))?;

            pool.install(|| {
                candidates
                    .par_iter()
                    .map(|path| self.search_file(path))
                    .collect()
            })
        };

        let mut files = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(Some(found)) => files.push(found),
                Ok(None) => {}
                Err(error) => errors.push(error),
            }
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));
        errors.sort_by(|a, b| a.path.cmp(&b.path));

        let stats = SearchStats {
            files_scanned,
            files_matched: files.len(),
            total_matches: files.iter().map(|f| f.matched_lines.len()).sum(),
            files_with_errors: errors.len(),
        };
        let metadata = SearchMetadata {
            duration_ms: start.elapsed().as_millis() as u64,
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        };

        tracing::debug!(
            scanned = stats.files_scanned,
            matched = stats.files_matched,
            errors = stats.files_with_errors,
            duration_ms = metadata.duration_ms,
            "search finished"
        );

        Ok(SearchResult {
            pattern: self.request.pattern.clone(),
            files,
            errors,
            stats,
            metadata,
        })
    }

    /// Expand configured paths into files. Explicit files are taken as
    /// given; directories are walked through the ignore filter.
    fn find_source_files(&self) -> (Vec<PathBuf>, Vec<FileError>) {
        let mut files = Vec::new();
        let mut errors = Vec::new();

        for root in &self.config.paths {
            if root.is_file() {
                files.push(root.clone());
                continue;
            }
            if !root.is_dir() {
                tracing::warn!(path = %root.display(), "no such file or directory");
                errors.push(FileError {
                    path: root.clone(),
                    message: "No such file or directory".to_string(),
                });
                continue;
            }

            let walker = WalkDir::new(root)
                .follow_links(self.config.follow_symlinks)
                .into_iter()
                .filter_entry(|e| {
                    if e.depth() > 0 && e.file_type().is_dir() {
                        return !self.ignore_filter.should_ignore(e.path(), true);
                    }
                    true
                });

            for entry in walker.filter_map(|e| e.ok()) {
                if entry.file_type().is_dir() {
                    continue;
                }

                let path = entry.path();
                if self.ignore_filter.should_ignore(path, false) {
                    continue;
                }
                if !self
                    .ignore_filter
                    .matches_language_filter(path, &self.config.language_filter)
                {
                    continue;
                }
                if let Ok(metadata) = entry.metadata() {
                    if metadata.len() as usize > self.config.max_file_size {
                        tracing::debug!(path = %path.display(), size = metadata.len(), "skipping large file");
                        continue;
                    }
                }

                files.push(path.to_path_buf());
            }
        }

        (files, errors)
    }

    /// Run the pipeline on one file. `Ok(None)` when nothing was marked.
    fn search_file(&self, path: &Path) -> Result<Option<FileMatch>, FileError> {
        let fail = |message: String| {
            tracing::warn!(path = %path.display(), error = %message, "skipping file");
            FileError {
                path: path.to_path_buf(),
                message,
            }
        };

        let filename = path.to_string_lossy();
        let language = parsers::language_for_file(&filename).map_err(|e| fail(e.to_string()))?;
        let source = fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
        let arena = parsers::parse_syntax(&language, &source).map_err(|e| fail(e.to_string()))?;

        let mut context =
            TreeContext::from_syntax(&filename, &source, arena, self.request.options.clone());

        if let Some(matcher) = &self.matcher {
            let found = context.grep_with(matcher);
            context.mark_lines_of_interest(found);
        }
        context.mark_lines_of_interest(
            self.request
                .lines
                .iter()
                .filter(|line| **line > 0)
                .map(|line| line - 1),
        );

        if context.lines_of_interest().is_empty() {
            return Ok(None);
        }

        context.expand_context();

        Ok(Some(FileMatch {
            path: path.to_path_buf(),
            language,
            line_count: context.line_count(),
            matched_lines: context.lines_of_interest().iter().map(|l| l + 1).collect(),
            rendered: context.render(),
        }))
    }
}

/// Grep a single file and render the excerpt. Empty when nothing matched.
pub fn render_file(
    path: &Path,
    pattern: &str,
    ignore_case: bool,
    options: ContextOptions,
) -> Result<String, ScanError> {
    let source = fs::read_to_string(path)?;
    let mut context = TreeContext::new(&path.to_string_lossy(), &source, options)?;

    let found = context.grep(pattern, ignore_case)?;
    context.mark_lines_of_interest(found);
    context.expand_context();
    Ok(context.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_invalid_pattern_fails_up_front() {
        let dir = TempDir::new().unwrap();
        let config = ScanConfig::new(vec![dir.path().to_path_buf()]);
        let err = GrepScanner::new(config, GrepRequest::new("(")).err().unwrap();
        assert!(matches!(
            err,
            ScanError::Context(ContextError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_scan_collects_matches_sorted() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.rs", "fn beta() {\n    target();\n}\n");
        write(&dir, "a.js", "function alpha() {\n  target();\n}\n");
        write(&dir, "c.rs", "fn gamma() {}\n");
        write(&dir, "notes.txt", "target\n");

        let config = ScanConfig::new(vec![dir.path().to_path_buf()]).with_threads(1);
        let request = GrepRequest::new("target").with_options(ContextOptions::bare());
        let result = GrepScanner::new(config, request).unwrap().scan().unwrap();

        assert_eq!(result.stats.files_scanned, 3);
        assert_eq!(result.stats.files_matched, 2);
        assert_eq!(result.stats.total_matches, 2);
        assert!(result.errors.is_empty());

        let names: Vec<String> = result
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.js", "b.rs"]);
        assert_eq!(result.files[1].matched_lines, vec![2]);
        assert_eq!(result.files[1].rendered, "⋮...\n█    target();\n⋮...\n");
    }

    #[test]
    fn test_explicit_unsupported_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "notes.txt", "target\n");

        let config = ScanConfig::new(vec![path.clone()]);
        let result = GrepScanner::new(config, GrepRequest::new("target"))
            .unwrap()
            .scan()
            .unwrap();

        assert!(!result.has_matches());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, path);
        assert!(result.errors[0].message.contains("unsupported file type"));
    }

    #[test]
    fn test_missing_path_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.rs");
        let config = ScanConfig::new(vec![missing]);
        let result = GrepScanner::new(config, GrepRequest::new("x"))
            .unwrap()
            .scan()
            .unwrap();
        assert_eq!(result.stats.files_with_errors, 1);
        assert_eq!(result.stats.files_scanned, 0);
    }

    #[test]
    fn test_explicit_lines_without_pattern() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "lib.rs", "fn a() {}\nfn b() {}\nfn c() {}\n");

        let config = ScanConfig::new(vec![path]);
        let request = GrepRequest::for_lines(vec![0, 2, 40]).with_options(ContextOptions::bare());
        let result = GrepScanner::new(config, request).unwrap().scan().unwrap();

        assert!(result.pattern.is_none());
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].matched_lines, vec![2]);
        assert_eq!(result.files[0].rendered, "⋮...\n█fn b() {}\n⋮...\n");
    }

    #[test]
    fn test_ignored_directories_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "src/main.rs", "fn main() { target(); }\n");
        write(&dir, "node_modules/dep/index.js", "target();\n");
        write(&dir, ".hidden/secret.rs", "fn target() {}\n");

        let config = ScanConfig::new(vec![dir.path().to_path_buf()]);
        let result = GrepScanner::new(config, GrepRequest::new("target"))
            .unwrap()
            .scan()
            .unwrap();

        assert_eq!(result.stats.files_scanned, 1);
        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].path.ends_with("src/main.rs"));
    }

    #[test]
    fn test_render_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "one.rs", "fn one() {\n    1\n}\n");

        let rendered = render_file(&path, "one", false, ContextOptions::bare()).unwrap();
        assert_eq!(rendered, "█fn one() {\n⋮...\n");

        let nothing = render_file(&path, "zzz", false, ContextOptions::bare()).unwrap();
        assert!(nothing.is_empty());
    }
}
