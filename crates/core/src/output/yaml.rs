//! YAML output formatter

use crate::models::SearchResult;
use crate::output::FormatError;

/// Format search results as YAML
pub fn format_yaml(data: &SearchResult) -> Result<String, FormatError> {
    serde_yaml::to_string(data).map_err(FormatError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileError, FileMatch, Language, SearchMetadata, SearchStats};
    use std::path::PathBuf;

    fn create_test_data() -> SearchResult {
        SearchResult {
            pattern: Some("greet".to_string()),
            files: vec![FileMatch {
                path: PathBuf::from("app.py"),
                language: Language::Python,
                line_count: 10,
                matched_lines: vec![4],
                rendered: "⋮...\n█def greet():\n⋮...\n".to_string(),
            }],
            errors: vec![FileError {
                path: PathBuf::from("broken.txt"),
                message: "Unrecognized or unsupported file type (broken.txt)".to_string(),
            }],
            stats: SearchStats {
                files_scanned: 2,
                files_matched: 1,
                total_matches: 1,
                files_with_errors: 1,
            },
            metadata: SearchMetadata {
                duration_ms: 100,
                timestamp: "2024-01-01T00:00:00Z".to_string(),
                tool_version: "0.1.0".to_string(),
            },
        }
    }

    #[test]
    fn test_format_yaml() {
        let yaml = format_yaml(&create_test_data()).unwrap();
        assert!(yaml.contains("pattern: greet"));
        assert!(yaml.contains("language: python"));
        assert!(yaml.contains("files_matched: 1"));
        assert!(yaml.contains("broken.txt"));
    }
}
