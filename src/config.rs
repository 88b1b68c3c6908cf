//! Run configuration.
//!
//! Everything a run needs is carried by a [`LibraryConfig`] value handed to
//! the batch drivers; nothing is read from global state after it is built.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::tagging::DuplicateCheck;

/// Environment variable naming the library root.
pub const LIBRARY_ENV_VAR: &str = "SHELF_LIBRARY";

/// Directory under the user's documents directory used when no root is given.
pub const DEFAULT_LIBRARY_DIR: &str = "Library";

/// E-book extension matched when none is configured.
pub const DEFAULT_EBOOK_EXTENSION: &str = "epub";

/// Extension of companion note files.
pub const NOTE_EXTENSION: &str = "md";

/// Errors that can occur while building a [`LibraryConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No root was given and no default location could be determined
    #[error("no library path given; pass --library or set SHELF_LIBRARY")]
    MissingLibraryPath,
}

/// Settings shared by both batch passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    root: PathBuf,
    ebook_extensions: Vec<String>,
    note_extension: String,
    duplicate_check: DuplicateCheck,
    dry_run: bool,
}

impl LibraryConfig {
    /// Returns a config for `root` with every other setting at its default.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ebook_extensions: vec![DEFAULT_EBOOK_EXTENSION.to_string()],
            note_extension: NOTE_EXTENSION.to_string(),
            duplicate_check: DuplicateCheck::default(),
            dry_run: false,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lowercase e-book extensions without the leading dot.
    pub fn ebook_extensions(&self) -> &[String] {
        &self.ebook_extensions
    }

    pub fn note_extension(&self) -> &str {
        &self.note_extension
    }

    pub fn duplicate_check(&self) -> DuplicateCheck {
        self.duplicate_check
    }

    /// When set, passes report what they would change without writing.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Builder for constructing [`LibraryConfig`] instances.
///
/// # Examples
///
/// ```
/// use shelf::config::LibraryConfigBuilder;
///
/// let config = LibraryConfigBuilder::new()
///     .root("/books")
///     .extension(".PDF")
///     .extension("epub")
///     .build()
///     .expect("root is set");
///
/// assert_eq!(config.ebook_extensions(), &["pdf", "epub"]);
/// ```
#[derive(Debug, Default)]
pub struct LibraryConfigBuilder {
    root: Option<PathBuf>,
    ebook_extensions: Vec<String>,
    duplicate_check: Option<DuplicateCheck>,
    dry_run: bool,
}

impl LibraryConfigBuilder {
    /// Creates a new `LibraryConfigBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the library root.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Adds an e-book extension. Leading dots and case are ignored.
    pub fn extension(mut self, extension: impl AsRef<str>) -> Self {
        let extension = extension
            .as_ref()
            .trim()
            .trim_start_matches('.')
            .to_lowercase();
        if !extension.is_empty() && !self.ebook_extensions.contains(&extension) {
            self.ebook_extensions.push(extension);
        }
        self
    }

    pub fn duplicate_check(mut self, check: DuplicateCheck) -> Self {
        self.duplicate_check = Some(check);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Builds the config.
    ///
    /// # Environment Variables
    ///
    /// If `root()` was not called, the `SHELF_LIBRARY` environment variable
    /// is used. If that is not set either, the root defaults to
    /// `Library` inside the user's documents directory.
    ///
    /// Without any `extension()` call, only `epub` files are matched.
    pub fn build(self) -> Result<LibraryConfig, ConfigError> {
        let root = match self.root {
            Some(root) => root,
            None => match std::env::var(LIBRARY_ENV_VAR) {
                Ok(root) if !root.trim().is_empty() => PathBuf::from(root),
                _ => dirs::document_dir()
                    .map(|docs| docs.join(DEFAULT_LIBRARY_DIR))
                    .ok_or(ConfigError::MissingLibraryPath)?,
            },
        };

        let ebook_extensions = if self.ebook_extensions.is_empty() {
            vec![DEFAULT_EBOOK_EXTENSION.to_string()]
        } else {
            self.ebook_extensions
        };

        Ok(LibraryConfig {
            root,
            ebook_extensions,
            note_extension: NOTE_EXTENSION.to_string(),
            duplicate_check: self.duplicate_check.unwrap_or_default(),
            dry_run: self.dry_run,
        })
    }
}
