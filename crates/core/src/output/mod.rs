//! Output formatting module
//!
//! This module provides formatters for grep-style text, JSON, YAML and a
//! plain summary of search results.

pub mod ansi;
mod json;
mod yaml;

pub use ansi::format_text;
pub use json::format_json;
pub use yaml::format_yaml;

use crate::models::SearchResult;
use std::str::FromStr;
use thiserror::Error;

/// Output format errors
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Rendered excerpts, grep style
    #[default]
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text summary
    Summary,
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "summary" => Ok(OutputFormat::Summary),
            other => Err(FormatError::UnknownFormat(other.to_string())),
        }
    }
}

/// Format search results in the specified format
///
/// `show_filename` only affects [`OutputFormat::Text`]. Text headings are
/// bold when the excerpts were rendered with color.
pub fn format_output(
    data: &SearchResult,
    format: OutputFormat,
    show_filename: bool,
    color: bool,
) -> Result<String, FormatError> {
    match format {
        OutputFormat::Text => Ok(format_text(data, show_filename, color)),
        OutputFormat::Json => format_json(data),
        OutputFormat::Yaml => format_yaml(data),
        OutputFormat::Summary => Ok(format_summary(data)),
    }
}

/// Format as plain text summary
fn format_summary(data: &SearchResult) -> String {
    let mut output = String::new();

    output.push_str("Grep Results\n");
    output.push_str("============\n\n");
    if let Some(pattern) = &data.pattern {
        output.push_str(&format!("Pattern: {}\n", pattern));
    }
    output.push_str(&format!("Files Scanned: {}\n", data.stats.files_scanned));
    output.push_str(&format!("Files Matched: {}\n", data.stats.files_matched));
    output.push_str(&format!("Total Matches: {}\n", data.stats.total_matches));

    if !data.files.is_empty() {
        output.push_str("\nMatches:\n");
        for file in &data.files {
            let lines: Vec<String> = file.matched_lines.iter().map(|l| l.to_string()).collect();
            output.push_str(&format!(
                "  {} ({}): {}\n",
                file.path.display(),
                file.language.as_str(),
                lines.join(", ")
            ));
        }
    }

    if !data.errors.is_empty() {
        output.push_str(&format!("\nFiles with errors: {}\n", data.stats.files_with_errors));
        for error in &data.errors {
            output.push_str(&format!("  {}: {}\n", error.path.display(), error.message));
        }
    }

    output.push_str(&format!("\nSearch Duration: {}ms\n", data.metadata.duration_ms));

    output
}
