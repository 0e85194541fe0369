//! ANSI escape codes and colored text output

use crate::models::SearchResult;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const RED: &str = "\x1b[31m";
pub const BOLD_RED: &str = "\x1b[1;31m";

/// Format search results as grep-ast style text
///
/// Each file's excerpt is preceded by a `path:` heading when
/// `show_filename` is set. Headings are bold when `color` is on.
pub fn format_text(data: &SearchResult, show_filename: bool, color: bool) -> String {
    let mut output = String::new();

    for file in &data.files {
        if show_filename {
            if color {
                output.push_str(&format!("\n{}{}:{}\n", BOLD, file.path.display(), RESET));
            } else {
                output.push_str(&format!("\n{}:\n", file.path.display()));
            }
        }
        output.push_str(&file.rendered);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileMatch, Language, SearchMetadata, SearchStats};
    use std::path::PathBuf;

    fn result() -> SearchResult {
        SearchResult {
            pattern: Some("x".to_string()),
            files: vec![FileMatch {
                path: PathBuf::from("src/lib.rs"),
                language: Language::Rust,
                line_count: 3,
                matched_lines: vec![2],
                rendered: "⋮...\n█x\n⋮...\n".to_string(),
            }],
            errors: vec![],
            stats: SearchStats::default(),
            metadata: SearchMetadata::default(),
        }
    }

    #[test]
    fn test_format_text_with_heading() {
        assert_eq!(
            format_text(&result(), true, false),
            "\nsrc/lib.rs:\n⋮...\n█x\n⋮...\n"
        );
    }

    #[test]
    fn test_format_text_bold_heading() {
        let text = format_text(&result(), true, true);
        assert!(text.starts_with("\n\x1b[1msrc/lib.rs:\x1b[0m\n"));
    }

    #[test]
    fn test_format_text_without_heading() {
        assert_eq!(format_text(&result(), false, false), "⋮...\n█x\n⋮...\n");
    }
}
