//! grepast CLI
//!
//! Grep that shows each match inside the syntactic scopes enclosing it.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use grepast_core::{
    format_output, ConfigFile, ContextOptions, GrepRequest, GrepScanner, Language, OutputFormat,
    ScanConfig, TreeContext,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// Structure-aware grep for source code
#[derive(Parser)]
#[command(name = "grepast")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Grep source code and show matches inside their enclosing scopes")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = r#"
grepast: Structure-Aware Grep

Finds lines matching a regular expression and prints them together with the
headers of the functions, classes and blocks enclosing them. Everything else
is elided with "⋮...". Uses Tree-sitter, so incomplete or malformed code is
handled too.

Supports:
  - Python (.py, .pyi)
  - JavaScript (.js, .mjs, .cjs, .jsx)
  - TypeScript (.ts, .mts, .cts, .tsx)
  - Rust (.rs)
  - Go (.go)

Exit status is 0 when a file matched, 1 when nothing matched, 2 on error.

Examples:
  grepast 'def load' src/                 # Search a directory
  grepast -n -i todo main.py              # Line numbers, ignore case
  grepast - app.js --lines 10,42          # Show context for given lines
  grepast --format json handler src/      # Structured output
  grepast scopes src/lib.rs               # Print the per-line scope trace
  grepast -e scopes src/                  # Search for the word "scopes"

A pattern spelled like a subcommand (languages, scopes) runs that
subcommand; pass it with -e/--regexp to search for it instead.
"#)]
pub struct Args {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Regular expression to search for ("-" for none, with --lines)
    pub pattern: Option<String>,

    /// Files or directories to search (default: current directory)
    pub paths: Vec<PathBuf>,

    /// Pattern given as an option; every positional argument is then a path
    #[arg(short = 'e', long = "regexp", value_name = "PATTERN")]
    pub regexp: Option<String>,

    /// Ignore case when matching
    #[arg(short, long)]
    pub ignore_case: bool,

    /// When to color the output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Prefix lines with their line number
    #[arg(short = 'n', long)]
    pub line_number: bool,

    /// Do not show headers of enclosing scopes
    #[arg(long)]
    pub no_parent_context: bool,

    /// Do not preview scopes starting on a matched line
    #[arg(long)]
    pub no_child_context: bool,

    /// Do not always show the last line of the file
    #[arg(long)]
    pub no_last_line: bool,

    /// Lines always shown at the top of each file
    #[arg(long)]
    pub margin: Option<usize>,

    /// Do not mark matched lines with a solid block
    #[arg(long)]
    pub no_mark: bool,

    /// Maximum number of lines in a scope header
    #[arg(long)]
    pub header_max: Option<usize>,

    /// Do not show headers of scopes starting on the first line
    #[arg(long)]
    pub no_top_of_file: bool,

    /// Lines of padding around each match
    #[arg(long)]
    pub padding: Option<usize>,

    /// Extra lines of interest (1-indexed, comma separated)
    #[arg(long, value_delimiter = ',')]
    pub lines: Vec<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Text)]
    pub format: OutputFormatArg,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Language filter for directory walks
    #[arg(short, long, value_enum)]
    pub language: Option<LanguageFilter>,

    /// Ignore patterns (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Ignore file to use instead of .gitignore
    #[arg(long)]
    pub ignore_file: Option<PathBuf>,

    /// Search hidden files and directories
    #[arg(long)]
    pub hidden: bool,

    /// Follow symbolic links while walking directories
    #[arg(long)]
    pub follow: bool,

    /// Skip files larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    pub max_file_size: Option<usize>,

    /// Number of threads for parallel processing (default: auto)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Do not print file name headings
    #[arg(long)]
    pub no_filename: bool,

    /// Configuration file (default: ./.grepast.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List supported languages and extensions
    Languages,

    /// Print the per-line scope trace of a file
    Scopes {
        /// Path to file
        file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormatArg {
    Text,
    Json,
    Yaml,
    Summary,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Summary => OutputFormat::Summary,
        }
    }
}

/// Language filter argument
#[derive(ValueEnum, Clone, Debug)]
pub enum LanguageFilter {
    Python,
    Node,
    Javascript,
    Typescript,
    Rust,
    Go,
}

impl LanguageFilter {
    fn languages(&self) -> Vec<Language> {
        match self {
            LanguageFilter::Python => vec![Language::Python],
            LanguageFilter::Node => vec![Language::JavaScript, Language::TypeScript, Language::Tsx],
            LanguageFilter::Javascript => vec![Language::JavaScript],
            LanguageFilter::Typescript => vec![Language::TypeScript, Language::Tsx],
            LanguageFilter::Rust => vec![Language::Rust],
            LanguageFilter::Go => vec![Language::Go],
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let outcome = match &args.command {
        Some(Commands::Languages) => run_languages().map(|_| true),
        Some(Commands::Scopes { file }) => run_scopes(file).map(|_| true),
        None => run_search(&args),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("grepast: {:#}", err);
            ExitCode::from(2)
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked by `--verbose`
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config_file(args: &Args) -> Result<ConfigFile> {
    if let Some(path) = &args.config {
        return ConfigFile::load(path)
            .with_context(|| format!("Failed to load config file {}", path.display()));
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(ConfigFile::discover(&cwd)
        .context("Failed to load config file")?
        .unwrap_or_default())
}

/// Context options from the config file, overridden by flags
fn build_options(args: &Args, file_config: &ConfigFile) -> ContextOptions {
    let mut options = file_config.context.clone();

    options.color = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            matches!(args.format, OutputFormatArg::Text)
                && args.output.is_none()
                && atty::is(atty::Stream::Stdout)
        }
    };
    options.verbose |= args.verbose;
    options.line_number |= args.line_number;

    if args.no_parent_context {
        options.parent_context = false;
    }
    if args.no_child_context {
        options.child_context = false;
    }
    if args.no_last_line {
        options.last_line = false;
    }
    if args.no_mark {
        options.mark_lois = false;
    }
    if args.no_top_of_file {
        options.top_of_file_parent_scope = false;
    }
    if let Some(margin) = args.margin {
        options.margin = margin;
    }
    if let Some(header_max) = args.header_max {
        options.header_max = header_max;
    }
    if let Some(padding) = args.padding {
        options.loi_pad = padding;
    }

    options
}

/// The pattern to search for and the paths to search. With `-e` the
/// positional pattern slot holds the first path.
fn pattern_and_paths(args: &Args) -> (Option<&str>, Vec<PathBuf>) {
    let mut paths = Vec::new();
    let pattern = match &args.regexp {
        Some(regexp) => {
            paths.extend(args.pattern.iter().map(PathBuf::from));
            Some(regexp.as_str())
        }
        None => args.pattern.as_deref(),
    };
    paths.extend(args.paths.iter().cloned());
    if paths.is_empty() {
        paths.push(PathBuf::from("."));
    }
    (pattern, paths)
}

fn build_config(args: &Args, file_config: &ConfigFile) -> ScanConfig {
    let (_, paths) = pattern_and_paths(args);

    let mut config = ScanConfig::new(paths)
        .with_ignore_patterns(args.ignore.clone())
        .with_include_hidden(args.hidden)
        .with_follow_symlinks(args.follow);

    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }
    if let Some(ignore_file) = &args.ignore_file {
        config = config.with_ignore_file(ignore_file.clone());
    }
    if let Some(language) = &args.language {
        config = config.with_language_filter(language.languages());
    }

    let mut config = file_config.apply_scan(config);
    if let Some(size) = args.max_file_size {
        config = config.with_max_file_size(size);
    }
    config
}

/// Returns whether any file matched
fn run_search(args: &Args) -> Result<bool> {
    let (pattern, _) = pattern_and_paths(args);
    let Some(pattern) = pattern else {
        bail!("a pattern is required (use \"-\" to search with --lines only)");
    };
    let pattern = (pattern != "-").then(|| pattern.to_string());
    if pattern.is_none() && args.lines.is_empty() {
        bail!("nothing to search for: pattern \"-\" needs --lines");
    }

    let file_config = load_config_file(args)?;
    let options = build_options(args, &file_config);
    let color = options.color;
    let config = build_config(args, &file_config);
    let walks_directories = config.paths.iter().any(|p| p.is_dir());

    let request = GrepRequest {
        pattern,
        ignore_case: args.ignore_case,
        lines: args.lines.clone(),
        options,
    };

    // Show progress spinner
    let spinner = if args.verbose && walks_directories && atty::is(atty::Stream::Stderr) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Searching...");
        Some(pb)
    } else {
        None
    };

    let scanner = GrepScanner::new(config, request).context("Failed to create scanner")?;
    let result = scanner.scan().context("Search failed")?;

    if let Some(ref pb) = spinner {
        pb.finish_with_message(format!(
            "Searched {} files in {}ms",
            result.stats.files_scanned, result.metadata.duration_ms
        ));
    }

    let output = format_output(&result, args.format.into(), !args.no_filename, color)?;
    write_output(output, args.output.as_ref())?;

    Ok(result.has_matches())
}

fn run_languages() -> Result<()> {
    let mut output = String::new();
    for language in Language::all() {
        let extensions: Vec<String> = language
            .extensions()
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect();
        output.push_str(&format!("{:<12} {}\n", language.as_str(), extensions.join(" ")));
    }
    write_output(output, None)
}

fn run_scopes(file: &Path) -> Result<()> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let context = TreeContext::new(&file.to_string_lossy(), &source, ContextOptions::default())
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    write_output(context.scope_report(), None)
}

fn write_output(mut output: String, path: Option<&PathBuf>) -> Result<()> {
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    if let Some(path) = path {
        fs::write(path, output).context("Failed to write output file")?;
    } else {
        print!("{}", output);
    }
    Ok(())
}
