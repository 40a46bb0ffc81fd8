use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use docsqlfmt::report::{FileStatus, Report};
use docsqlfmt::Mode;

/// docsqlfmt - Reformats SQL code blocks embedded in documentation.
#[derive(Parser, Debug)]
#[command(name = "docsqlfmt", version, about)]
struct Cli {
    /// Files or directories to rewrite. Use "-" to read a document from stdin.
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Report documents that would change without writing them.
    #[arg(long)]
    check: bool,

    /// Show a diff of each changed document instead of writing it.
    #[arg(long)]
    diff: bool,

    /// Maximum statement line width.
    #[arg(short = 'l', long)]
    line_width: Option<usize>,

    /// Spaces per indentation level.
    #[arg(long)]
    indent_width: Option<usize>,

    /// Indent with tabs instead of spaces.
    #[arg(long)]
    use_tabs: bool,

    /// SQL dialect understood by the parser (postgresql, mysql, generic, ...).
    #[arg(short = 'd', long)]
    dialect: Option<String>,

    /// Code fence delimiting SQL blocks.
    #[arg(long)]
    fence: Option<String>,

    /// Line prefix separating statements within one block.
    #[arg(long)]
    continuation_marker: Option<String>,

    /// Document file extensions to process (repeatable).
    #[arg(long = "extension")]
    extensions: Vec<String>,

    /// Glob patterns of file names to exclude (repeatable).
    #[arg(long)]
    exclude: Vec<String>,

    /// Path to config file (docsqlfmt.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only).
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Layer command-line flags over the configured mode.
    fn apply(self, mode: &mut Mode) {
        if let Some(n) = self.line_width {
            mode.pretty.line_width = n;
        }
        if let Some(n) = self.indent_width {
            mode.pretty.indent_width = n;
        }
        if self.use_tabs {
            mode.pretty.use_tabs = true;
        }
        if let Some(d) = self.dialect {
            mode.dialect_name = d;
        }
        if let Some(f) = self.fence {
            mode.fence = f;
        }
        if let Some(m) = self.continuation_marker {
            mode.continuation_marker = m;
        }
        if !self.extensions.is_empty() {
            mode.extensions = self
                .extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect();
        }
        if !self.exclude.is_empty() {
            mode.exclude = self.exclude;
        }
        mode.check = self.check;
        mode.diff = self.diff;
        mode.verbose = self.verbose;
        mode.quiet = self.quiet;
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = cli.paths.clone();
    let is_stdin = paths.len() == 1 && paths[0] == Path::new("-");

    let mut mode = match docsqlfmt::load_config(&paths, cli.config.as_deref()) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(2);
        }
    };
    cli.apply(&mut mode);

    if let Err(e) = mode.validate() {
        eprintln!("Configuration error: {}", e);
        return ExitCode::from(2);
    }

    if is_stdin {
        return match format_stdin(&mode) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                ExitCode::from(2)
            }
        };
    }

    match docsqlfmt::run(&paths, &mode) {
        Ok(report) => {
            print_results(&report, &mode);
            if mode.check && report.has_changes() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            // Traversal stops at the first failure; no partial summary.
            println!("{}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "docsqlfmt=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn format_stdin(mode: &Mode) -> anyhow::Result<()> {
    let mut source = Vec::new();
    io::stdin()
        .read_to_end(&mut source)
        .context("reading stdin")?;
    let rewritten = docsqlfmt::format_document(&source, mode)?;
    io::stdout()
        .write_all(&rewritten)
        .context("writing stdout")?;
    Ok(())
}

fn print_results(report: &Report, mode: &Mode) {
    if mode.quiet {
        return;
    }
    let dry_run = !mode.should_write();
    if mode.verbose || mode.check {
        let verb = if dry_run { "would reformat" } else { "reformatted" };
        for result in &report.results {
            if result.status == FileStatus::Changed {
                eprintln!("{} {}", verb, result.path.display());
            }
        }
    }
    eprintln!("{}", report.summary(dry_run));
}
