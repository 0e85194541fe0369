use super::FormatError;
use crate::models::SearchResult;

/// Serialize search results to pretty-printed JSON
pub fn format_json(data: &SearchResult) -> Result<String, FormatError> {
    serde_json::to_string_pretty(data).map_err(FormatError::from)
}
