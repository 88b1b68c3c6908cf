//! The two library passes and their reporting.
//!
//! - Note synthesis: create a companion note for every e-book without one
//! - Tag retrofit: add the genre tag to every existing note's header
//!
//! Both passes walk every genre, re-deriving its tag from the folder name,
//! and keep going when a single file fails. Failures are logged, printed and
//! collected in the returned [`BatchReport`].

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::config::LibraryConfig;
use crate::library::Library;
use crate::models::Genre;
use crate::synthesizer::{self, Synthesis};
use crate::tagging::{self, TagOutcome};

/// Escape codes used for progress output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    green: &'static str,
    red: &'static str,
    yellow: &'static str,
    reset: &'static str,
    bold: &'static str,
    dim: &'static str,
}

// ANSI color codes for terminal output
const ANSI: Palette = Palette {
    green: "\x1b[32m",
    red: "\x1b[31m",
    yellow: "\x1b[33m",
    reset: "\x1b[0m",
    bold: "\x1b[1m",
    dim: "\x1b[2m",
};

const PLAIN: Palette = Palette {
    green: "",
    red: "",
    yellow: "",
    reset: "",
    bold: "",
    dim: "",
};

/// Colors only when stdout is a terminal; piped or redirected output stays
/// plain text.
fn palette() -> Palette {
    if io::stdout().is_terminal() { ANSI } else { PLAIN }
}

/// Answers accepted as "yes" by [`confirm`].
const AFFIRMATIVE: [&str; 4] = ["y", "yes", "s", "sim"];

/// A file (or genre directory) that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Result of one pass over the library.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub genres: usize,
    /// Notes written (synthesis) or tagged (retrofit).
    pub changed: usize,
    /// Dry run: notes that would have been written or tagged.
    pub pending: usize,
    /// Notes that already existed or already carried the tag.
    pub unchanged: usize,
    /// Genres skipped because their folder name yields an empty tag.
    pub skipped_genres: usize,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, path: impl Into<PathBuf>, message: impl ToString) {
        self.failures.push(FileFailure {
            path: path.into(),
            message: message.to_string(),
        });
    }
}

// ============================================================================
// Passes
// ============================================================================

/// Creates a companion note for every e-book that lacks one.
///
/// Progress lines are written to `out`. Listing the library root is the only
/// failure that aborts the pass.
pub fn run_note_synthesis(
    library: &Library,
    config: &LibraryConfig,
    out: &mut impl Write,
) -> Result<BatchReport> {
    let Palette {
        green,
        red,
        yellow,
        reset,
        ..
    } = palette();
    let mut report = BatchReport::default();

    for genre in library.genres()? {
        report.genres += 1;
        print_genre(out, &genre)?;

        let ebooks = match genre.ebooks(config.ebook_extensions()) {
            Ok(ebooks) => ebooks,
            Err(e) => {
                tracing::warn!(genre = genre.name(), error = %e, "failed to list e-books");
                writeln!(out, "  {red}✗{reset} Error listing {}: {e}", genre.name())?;
                report.fail(genre.path(), e);
                continue;
            }
        };

        for ebook in ebooks {
            match synthesizer::synthesize_note(
                &ebook,
                &genre,
                config.note_extension(),
                config.dry_run(),
            ) {
                Ok(Synthesis::Created(path)) => {
                    tracing::debug!(note = %path.display(), "note created");
                    report.changed += 1;
                    writeln!(out, "  {green}✓{reset} Note created for: {}", ebook.title())?;
                }
                Ok(Synthesis::WouldCreate(path)) => {
                    tracing::debug!(note = %path.display(), "note would be created");
                    report.pending += 1;
                    writeln!(out, "  {yellow}•{reset} Would create note for: {}", ebook.title())?;
                }
                Ok(Synthesis::Exists(_)) => report.unchanged += 1,
                Err(e) => {
                    tracing::warn!(ebook = %ebook.path().display(), error = %e, "failed to create note");
                    writeln!(
                        out,
                        "  {red}✗{reset} Error creating note for {}: {e}",
                        ebook.file_name()
                    )?;
                    report.fail(e.path().to_path_buf(), e);
                }
            }
        }
    }

    Ok(report)
}

/// Adds each genre's tag to the header of every note in that genre.
///
/// Progress lines are written to `out`. Listing the library root is the only
/// failure that aborts the pass.
pub fn run_tag_retrofit(
    library: &Library,
    config: &LibraryConfig,
    out: &mut impl Write,
) -> Result<BatchReport> {
    let Palette {
        green,
        red,
        yellow,
        reset,
        dim,
        ..
    } = palette();
    let mut report = BatchReport::default();

    for genre in library.genres()? {
        report.genres += 1;
        print_genre(out, &genre)?;

        if genre.tag().is_empty() {
            tracing::warn!(genre = genre.name(), "folder name yields an empty tag");
            writeln!(
                out,
                "  {yellow}!{reset} Skipping {}: folder name yields an empty tag",
                genre.name()
            )?;
            report.skipped_genres += 1;
            continue;
        }

        let notes = match genre.notes(config.note_extension()) {
            Ok(notes) => notes,
            Err(e) => {
                tracing::warn!(genre = genre.name(), error = %e, "failed to list notes");
                writeln!(out, "  {red}✗{reset} Error listing {}: {e}", genre.name())?;
                report.fail(genre.path(), e);
                continue;
            }
        };

        for note in notes {
            let name = note
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match tagging::retrofit_note(
                &note,
                genre.tag(),
                genre.name(),
                config.duplicate_check(),
                config.dry_run(),
            ) {
                Ok(TagOutcome::Added) => {
                    tracing::debug!(note = %note.display(), tag = genre.tag(), "tag added");
                    report.changed += 1;
                    writeln!(out, "  {green}✓{reset} Tag added to: {name}")?;
                }
                Ok(TagOutcome::WouldAdd) => {
                    report.pending += 1;
                    writeln!(out, "  {yellow}•{reset} Would add tag to: {name}")?;
                }
                Ok(TagOutcome::AlreadyPresent) => {
                    report.unchanged += 1;
                    writeln!(out, "  {dim}Tag already present in: {name}{reset}")?;
                }
                Err(e) => {
                    tracing::warn!(note = %note.display(), error = %e, "failed to tag note");
                    writeln!(out, "  {red}✗{reset} Error processing {name}: {e}")?;
                    report.fail(note, e);
                }
            }
        }
    }

    Ok(report)
}

fn print_genre(out: &mut impl Write, genre: &Genre) -> io::Result<()> {
    let Palette { bold, reset, .. } = palette();
    writeln!(
        out,
        "{bold}Processing genre:{reset} {} -> Tag: #{}",
        genre.name(),
        genre.tag()
    )
}

// ============================================================================
// Prompts and summaries
// ============================================================================

/// Returns true if `answer` is one of the accepted "yes" tokens.
///
/// # Examples
///
/// ```
/// use shelf::batch::is_affirmative;
///
/// assert!(is_affirmative(" Yes\n"));
/// assert!(is_affirmative("s"));
/// assert!(!is_affirmative("n"));
/// assert!(!is_affirmative(""));
/// ```
pub fn is_affirmative(answer: &str) -> bool {
    AFFIRMATIVE.contains(&answer.trim().to_lowercase().as_str())
}

/// Asks a yes/no question. Anything but an affirmative answer, including
/// end of input or a read error, counts as "no".
pub fn confirm(question: &str, input: &mut impl BufRead, out: &mut impl Write) -> bool {
    if write!(out, "{question} [y/N] ").and_then(|()| out.flush()).is_err() {
        return false;
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => is_affirmative(&answer),
        Err(_) => false,
    }
}

/// Prints the summary of one pass.
pub fn print_report(out: &mut impl Write, title: &str, report: &BatchReport) -> io::Result<()> {
    let Palette {
        bold,
        yellow,
        reset,
        ..
    } = palette();
    writeln!(out)?;
    writeln!(out, "{bold}{title}{reset}")?;
    writeln!(out, "  Genres:    {}", report.genres)?;
    writeln!(out, "  Changed:   {}", report.changed)?;
    if report.pending > 0 {
        writeln!(out, "  Pending:   {} (dry run)", report.pending)?;
    }
    writeln!(out, "  Unchanged: {}", report.unchanged)?;
    if report.skipped_genres > 0 {
        writeln!(out, "  Skipped:   {} genre(s) with an empty tag", report.skipped_genres)?;
    }

    if !report.failures.is_empty() {
        writeln!(out)?;
        writeln!(out, "{yellow}Errors ({}){reset}:", report.failures.len())?;
        for failure in report.failures.iter().take(10) {
            writeln!(out, "  - {}: {}", failure.path.display(), failure.message)?;
        }
        if report.failures.len() > 10 {
            writeln!(out, "  ... and {} more", report.failures.len() - 10)?;
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
