use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use shelf::batch::{self, BatchReport};
use shelf::config::{ConfigError, LibraryConfig, LibraryConfigBuilder};
use shelf::{DuplicateCheck, Library, LibraryError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// shelf - companion notes and genre tags for an e-book library
#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Create and tag companion notes for an e-book library")]
#[command(version)]
struct Cli {
    /// Library root holding one folder per genre [env: SHELF_LIBRARY]
    #[arg(short, long, value_name = "PATH")]
    library: Option<PathBuf>,

    /// E-book extension to match; repeat for several (default: epub)
    #[arg(short, long = "ext", value_name = "EXT")]
    ext: Vec<String>,

    /// Create notes for e-books without one, without prompting
    #[arg(long)]
    create_notes: bool,

    /// Add genre tags to existing notes, without prompting
    #[arg(long)]
    add_tags: bool,

    /// Run both passes without prompting
    #[arg(short, long)]
    yes: bool,

    /// Report what would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Only treat a tag as present when it is in the header list or is a
    /// complete inline #tag
    #[arg(long)]
    strict_tags: bool,

    /// Print the pass reports as JSON after the run
    #[arg(long)]
    json: bool,
}

/// Reports of the passes that ran, for `--json`.
#[derive(Debug, Default, Serialize)]
struct RunSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<BatchReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<BatchReport>,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(&cli) {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Initialize tracing with output to stderr so progress output stays clean
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "shelf=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are a missing or invalid library root. Everything else,
/// such as failing to write progress output, is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    let bad_root = error.downcast_ref::<LibraryError>().is_some_and(|e| {
        matches!(e, LibraryError::NotFound(_) | LibraryError::NotADirectory(_))
    });
    bad_root || error.downcast_ref::<ConfigError>().is_some()
}

fn build_config(cli: &Cli) -> Result<LibraryConfig> {
    let mut builder = LibraryConfigBuilder::new()
        .dry_run(cli.dry_run)
        .duplicate_check(if cli.strict_tags {
            DuplicateCheck::Structural
        } else {
            DuplicateCheck::Substring
        });

    if let Some(root) = &cli.library {
        builder = builder.root(root);
    }
    for ext in &cli.ext {
        builder = builder.extension(ext);
    }

    Ok(builder.build()?)
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    // Validate the root before any prompt or mutation.
    let library = Library::open(config.root())?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    execute(cli, &library, &config, &mut input, &mut out)
}

/// Runs the selected passes, prompting for each one unless the command line
/// already decided.
fn execute(
    cli: &Cli,
    library: &Library,
    config: &LibraryConfig,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let mut summary = RunSummary::default();

    writeln!(out, "=== shelf: organizing {} ===", library.root().display())?;
    if config.dry_run() {
        writeln!(out, "(dry run: nothing will be written)")?;
    }
    writeln!(out)?;

    if should_run(cli, cli.create_notes, "Create notes for e-books without one?", input, out) {
        writeln!(out, "\n--- Creating notes ---")?;
        let report = batch::run_note_synthesis(library, config, out)
            .context("Note creation pass failed")?;
        batch::print_report(out, "Notes", &report)?;
        summary.notes = Some(report);
    }

    if should_run(cli, cli.add_tags, "\nAdd tags based on folder names?", input, out) {
        writeln!(out, "\n--- Adding tags ---")?;
        let report =
            batch::run_tag_retrofit(library, config, out).context("Tagging pass failed")?;
        batch::print_report(out, "Tags", &report)?;
        summary.tags = Some(report);
    }

    writeln!(out, "\n=== Processing complete ===")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&summary)
            .context("Failed to serialize run summary")?;
        writeln!(out, "{json}")?;
    }

    Ok(())
}

/// Decides whether a pass runs: explicit pass flags win, then `--yes`, then
/// the interactive prompt.
fn should_run(
    cli: &Cli,
    selected: bool,
    question: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> bool {
    if cli.create_notes || cli.add_tags {
        return selected;
    }
    cli.yes || batch::confirm(question, input, out)
}
