//! Blocking note file I/O.
//!
//! Each call opens, reads or writes fully, and closes the file before
//! returning, on success and on error alike.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from reading or writing a single note file.
#[derive(Debug, Error)]
pub enum NoteError {
    /// The note could not be read, or is not valid UTF-8
    #[error("failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The note could not be written
    #[error("failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A note appeared at the target path before it could be created
    #[error("note already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

impl NoteError {
    /// Returns the note path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            NoteError::Read { path, .. } | NoteError::Write { path, .. } => path,
            NoteError::AlreadyExists(path) => path,
        }
    }
}

/// Reads a whole note as UTF-8 text.
pub fn read_note(path: &Path) -> Result<String, NoteError> {
    fs::read_to_string(path).map_err(|source| NoteError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Replaces a note's content in place.
pub fn write_note(path: &Path, content: &str) -> Result<(), NoteError> {
    fs::write(path, content).map_err(|source| NoteError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Creates a new note, refusing to overwrite an existing file.
pub fn create_note(path: &Path, content: &str) -> Result<(), NoteError> {
    let write_error = |source| NoteError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => NoteError::AlreadyExists(path.to_path_buf()),
            _ => write_error(e),
        })?;

    file.write_all(content.as_bytes()).map_err(write_error)?;
    file.flush().map_err(write_error)
}
