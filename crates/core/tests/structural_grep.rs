use grepast_core::{
    format_output, ContextOptions, GrepRequest, GrepScanner, OutputFormat, ScanConfig,
    TreeContext,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use tempfile::TempDir;

const GREETER_RS: &str = r#"use std::fmt;

struct Greeter {
    name: String,
}

impl Greeter {
    fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }

    fn greet(&self) -> String {
        format!("hello {}", self.name)
    }
}

fn main() {
    let g = Greeter::new("x");
    println!("{}", g.greet());
}
"#;

const COUNTER_JS: &str = r#"class Counter {
  constructor() {
    this.count = 0;
  }

  increment() {
    this.count += 1;
    return this.count;
  }
}
"#;

const SHAPES_PY: &str = r#"import math


class Shape:
    def area(self):
        raise NotImplementedError


class Circle(Shape):
    def __init__(self, radius):
        self.radius = radius

    def area(self):
        return math.pi * self.radius ** 2

    def perimeter(self):
        return 2 * math.pi * self.radius


def describe(shape):
    print(shape.area())
"#;

const GREETER_GO: &str = "package main

import \"fmt\"

type Greeter struct {
\tname string
}

func (g Greeter) Greet() string {
\treturn fmt.Sprintf(\"hello %s\", g.name)
}

func main() {
\tg := Greeter{name: \"x\"}
\tfmt.Println(g.Greet())
}
";

fn grep_and_expand(filename: &str, source: &str, pattern: &str, options: ContextOptions) -> TreeContext {
    let mut context = TreeContext::new(filename, source, options).expect("parse");
    let found = context.grep(pattern, false).expect("pattern");
    context.mark_lines_of_interest(found);
    context.expand_context();
    context
}

fn shown(context: &TreeContext) -> Vec<usize> {
    context.lines_to_show().iter().copied().collect()
}

#[test]
fn rust_match_shows_enclosing_headers() {
    let options = ContextOptions::bare()
        .with_parent_context(true)
        .with_header_max(1)
        .with_line_number(true);
    let context = grep_and_expand("greeter.rs", GREETER_RS, "hello", options);

    assert_eq!(shown(&context), vec![6, 11, 12]);
    assert_eq!(
        context.render(),
        "⋮...\n  7│impl Greeter {\n⋮...\n 12│    fn greet(&self) -> String {\n 13█        format!(\"hello {}\", self.name)\n⋮...\n"
    );
}

#[test]
fn go_match_shows_method_header() {
    let options = ContextOptions::bare()
        .with_parent_context(true)
        .with_header_max(1)
        .with_line_number(true);
    let context = grep_and_expand("greeter.go", GREETER_GO, "hello", options);

    assert_eq!(shown(&context), vec![8, 9]);
    assert_eq!(
        context.render(),
        "⋮...\n  9│func (g Greeter) Greet() string {\n 10█\treturn fmt.Sprintf(\"hello %s\", g.name)\n⋮...\n"
    );
}

#[test]
fn javascript_match_closes_gap_to_method_header() {
    let options = ContextOptions::bare()
        .with_parent_context(true)
        .with_header_max(1);
    let context = grep_and_expand("counter.js", COUNTER_JS, "return", options);

    assert_eq!(
        context.render(),
        "⋮...\n│  increment() {\n│    this.count += 1;\n█    return this.count;\n⋮...\n"
    );
}

#[test]
fn top_of_file_scope_reveals_first_line() {
    let options = ContextOptions::bare()
        .with_parent_context(true)
        .with_header_max(1)
        .with_top_of_file_parent_scope(true);
    let context = grep_and_expand("counter.js", COUNTER_JS, "return", options);

    assert_eq!(shown(&context), vec![0, 5, 6, 7]);
    assert_eq!(
        context.render(),
        "│class Counter {\n⋮...\n│  increment() {\n│    this.count += 1;\n█    return this.count;\n⋮...\n"
    );
}

#[test]
fn child_context_previews_large_scope_within_budget() {
    let options = ContextOptions::bare()
        .with_child_context(true)
        .with_header_max(1);
    let context = grep_and_expand("greeter.rs", GREETER_RS, "^impl", options);

    let lines = context.lines_to_show();
    assert!(lines.contains(&6));
    assert!(lines.contains(&7));
    assert!(lines.contains(&11));
    // The line of interest plus a preview of at most five lines
    assert!(lines.len() <= 6);
}

#[test]
fn small_scope_is_revealed_whole() {
    let options = ContextOptions::bare().with_child_context(true);
    let context = grep_and_expand("greeter.rs", GREETER_RS, "^struct", options);
    assert_eq!(shown(&context), vec![2, 3, 4, 5]);
}

#[test]
fn default_options_keep_every_match_and_the_last_line() {
    let context = grep_and_expand("shapes.py", SHAPES_PY, "area", ContextOptions::default());
    let lines = context.lines_to_show();

    for line in context.lines_of_interest() {
        assert!(lines.contains(line));
    }
    assert!(lines.contains(&(context.line_count() - 1)));
    // Margin
    assert!(lines.contains(&0) && lines.contains(&1) && lines.contains(&2));
    // Class headers around both `area` methods
    assert!(lines.contains(&3));
    assert!(lines.contains(&8));
}

#[test]
fn expansion_is_idempotent_on_real_trees() {
    for (name, source, pattern) in [
        ("greeter.rs", GREETER_RS, "name"),
        ("counter.js", COUNTER_JS, "count"),
        ("shapes.py", SHAPES_PY, "self"),
    ] {
        let mut context = grep_and_expand(name, source, pattern, ContextOptions::default());
        let first = shown(&context);
        context.expand_context();
        assert_eq!(shown(&context), first, "{}", name);
    }
}

#[test]
fn adding_interest_only_grows_the_selection() {
    let mut context = grep_and_expand("shapes.py", SHAPES_PY, "raise", ContextOptions::default());
    let before: BTreeSet<usize> = context.lines_to_show().clone();

    let found = context.grep("perimeter", false).expect("pattern");
    context.mark_lines_of_interest(found);
    context.expand_context();

    assert!(context.lines_to_show().is_superset(&before));
    assert!(context.lines_to_show().contains(&16));
}

#[test]
fn no_match_renders_nothing() {
    let context = grep_and_expand("greeter.rs", GREETER_RS, "goodbye", ContextOptions::default());
    assert!(context.lines_to_show().is_empty());
    assert_eq!(context.render(), "");
}

#[test]
fn margin_only_applies_once_something_matched() {
    let options = ContextOptions::bare().with_margin(2);
    let context = grep_and_expand("greeter.rs", GREETER_RS, "println", options);
    assert_eq!(shown(&context), vec![0, 1, 18]);
}

#[test]
fn scanner_formats_text_with_headings() {
    let temp = TempDir::new().expect("tempdir");
    std::fs::write(temp.path().join("counter.js"), COUNTER_JS).expect("write file");
    std::fs::write(temp.path().join("greeter.rs"), GREETER_RS).expect("write file");

    let config = ScanConfig::new(vec![temp.path().to_path_buf()]);
    let request = GrepRequest::new("return").with_options(
        ContextOptions::bare()
            .with_parent_context(true)
            .with_header_max(1),
    );
    let result = GrepScanner::new(config, request)
        .expect("scanner")
        .scan()
        .expect("scan");

    assert_eq!(result.stats.files_scanned, 2);
    assert_eq!(result.stats.files_matched, 1);

    let text = format_output(&result, OutputFormat::Text, true, false).expect("format");
    let heading = format!("\n{}:\n", temp.path().join("counter.js").display());
    assert!(text.starts_with(&heading));
    assert!(text.ends_with("█    return this.count;\n⋮...\n"));

    let json = format_output(&result, OutputFormat::Json, true, false).expect("format");
    assert!(json.contains("\"matched_lines\": [\n        8\n      ]"));
}
