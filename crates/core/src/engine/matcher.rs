use crate::output::ansi::{BOLD_RED, RESET};
use regex::{Regex, RegexBuilder};

/// Compiled line pattern
#[derive(Debug, Clone)]
pub struct LineMatcher {
    regex: Regex,
}

impl LineMatcher {
    pub fn new(pattern: &str, ignore_case: bool) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(ignore_case)
            .build()?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// Wrap every non-overlapping match in bold red
    pub fn highlight(&self, line: &str) -> String {
        self.regex
            .replace_all(line, |caps: &regex::Captures| {
                format!("{}{}{}", BOLD_RED, &caps[0], RESET)
            })
            .into_owned()
    }
}
