//! Excerpt rendering
//!
//! Shown lines are printed in order with a marker column; every run of
//! hidden lines collapses into a single ellipsis row.

use super::context::TreeContext;
use crate::output::ansi::{RED, RESET};

/// Row standing in for a run of hidden lines
pub const ELLIPSIS: &str = "⋮...\n";

/// Marker for lines of interest
const INTEREST_MARK: &str = "█";

/// Marker for every other shown line
const CONTEXT_MARK: &str = "│";

impl TreeContext {
    /// Render the lines to show. Empty when nothing is selected.
    pub fn render(&self) -> String {
        if self.show_lines.is_empty() {
            return String::new();
        }

        let mut output = String::new();
        if self.options.color {
            output.push_str(RESET);
            output.push('\n');
        }

        let mut ellipsis_armed = !self.show_lines.contains(&0);

        for (i, line) in self.lines.iter().enumerate() {
            if !self.show_lines.contains(&i) {
                if ellipsis_armed {
                    output.push_str(ELLIPSIS);
                    ellipsis_armed = false;
                }
                continue;
            }

            let text = self.highlights.get(&i).map_or(line, String::as_str);
            if self.options.line_number {
                output.push_str(&format!("{:>3}", i + 1));
            }
            output.push_str(&self.marker(i));
            output.push_str(text);
            output.push('\n');
            ellipsis_armed = true;
        }

        output
    }

    fn marker(&self, line: usize) -> String {
        if self.options.mark_lois && self.lines_of_interest.contains(&line) {
            if self.options.color {
                format!("{}{}{}", RED, INTEREST_MARK, RESET)
            } else {
                INTEREST_MARK.to_string()
            }
        } else {
            CONTEXT_MARK.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContextOptions;
    use crate::engine::SyntaxArena;

    fn context(source: &str, options: ContextOptions) -> TreeContext {
        let line_count = source.lines().count();
        let arena = SyntaxArena::new("module", 0, line_count);
        TreeContext::from_syntax("r.py", source, arena, options)
    }

    #[test]
    fn test_empty_selection_renders_nothing() {
        let ctx = context("a\nb\n", ContextOptions::bare().with_color(true));
        assert_eq!(ctx.render(), "");
    }

    #[test]
    fn test_hidden_runs_collapse_to_one_ellipsis() {
        let mut ctx = context("l0\nl1\nl2\nl3\nl4\nl5\nl6\n", ContextOptions::bare());
        ctx.show_lines.extend([0, 1, 5, 6]);
        assert_eq!(ctx.render(), "│l0\n│l1\n⋮...\n│l5\n│l6\n");
    }

    #[test]
    fn test_leading_and_trailing_ellipsis() {
        let mut ctx = context("l0\nl1\nl2\nl3\n", ContextOptions::bare());
        ctx.show_lines.insert(2);
        assert_eq!(ctx.render(), "⋮...\n│l2\n⋮...\n");
    }

    #[test]
    fn test_line_numbers_and_marks() {
        let mut ctx = context("a\nb\nc\n", ContextOptions::bare().with_line_number(true));
        ctx.mark_lines_of_interest([1]);
        ctx.show_lines.extend([0, 1, 2]);
        assert_eq!(ctx.render(), "  1│a\n  2█b\n  3│c\n");
    }

    #[test]
    fn test_marks_can_be_disabled() {
        let mut ctx = context("a\nb\n", ContextOptions::bare().with_mark_lois(false));
        ctx.mark_lines_of_interest([0]);
        ctx.show_lines.extend([0, 1]);
        assert_eq!(ctx.render(), "│a\n│b\n");
    }

    #[test]
    fn test_function_header_and_margin_excerpt() {
        let source: String = (0..20).map(|i| format!("line {}\n", i)).collect();
        let mut arena = SyntaxArena::new("module", 0, 20);
        let function = arena.add_child(arena.root(), "function", 2, 18);
        arena.add_child(function, "statement", 10, 10);

        let options = ContextOptions::bare()
            .with_parent_context(true)
            .with_header_max(2)
            .with_margin(3);
        let mut ctx = TreeContext::from_syntax("f.py", &source, arena, options);
        ctx.mark_lines_of_interest([10]);
        ctx.expand_context();

        assert_eq!(
            ctx.lines_to_show().iter().copied().collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 10]
        );
        assert_eq!(
            ctx.render(),
            "│line 0\n│line 1\n│line 2\n│line 3\n⋮...\n█line 10\n⋮...\n"
        );
    }

    #[test]
    fn test_color_prefix_mark_and_highlight() {
        let mut ctx = context("let x = 1;\nlet y = 2;\n", ContextOptions::bare().with_color(true));
        let found = ctx.grep("y", false).unwrap();
        ctx.mark_lines_of_interest(found);
        ctx.expand_context();
        assert_eq!(
            ctx.render(),
            "\x1b[0m\n⋮...\n\x1b[31m█\x1b[0mlet \x1b[1;31my\x1b[0m = 2;\n"
        );
    }
}
