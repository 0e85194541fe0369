/// Source text split into lines. Lines are addressed by 0-based index.
#[derive(Debug, Clone, Default)]
pub struct LineStore {
    lines: Vec<String>,
}

impl LineStore {
    /// Split on `\n`. A trailing newline does not produce an extra empty
    /// line and a trailing `\r` is dropped from each line.
    pub fn new(source: &str) -> Self {
        Self {
            lines: source.lines().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Whether the line is missing or whitespace only
    pub fn is_blank(&self, index: usize) -> bool {
        self.get(index).map_or(true, |line| line.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}
