//! Walking the library tree: genre directories, their e-books and notes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{Ebook, Genre};

/// Errors from locating or listing the library.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The library root does not exist
    #[error("library not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The library root exists but is not a directory
    #[error("library path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A directory inside the library could not be listed
    #[error("failed to list {}: {}", .path.display(), .source)]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A validated library root.
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    /// Opens the library at `root`, failing if it is missing or not a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let root = root.into();
        if !root.exists() {
            return Err(LibraryError::NotFound(root));
        }
        if !root.is_dir() {
            return Err(LibraryError::NotADirectory(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists the genre directories directly under the root, sorted by name.
    ///
    /// Hidden directories (`.obsidian`, `.trash`, ...) are not genres.
    pub fn genres(&self) -> Result<Vec<Genre>, LibraryError> {
        let mut genres: Vec<Genre> = list_dir(&self.root)?
            .into_iter()
            .filter(|path| path.is_dir() && !is_hidden(path))
            .map(Genre::new)
            .collect();
        genres.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(genres)
    }
}

impl Genre {
    /// Lists the e-books in this genre whose extension is in `extensions`.
    ///
    /// Extensions are compared case-insensitively and without the dot.
    pub fn ebooks(&self, extensions: &[String]) -> Result<Vec<Ebook>, LibraryError> {
        Ok(self
            .files_with_extension(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))?
            .into_iter()
            .map(Ebook::new)
            .collect())
    }

    /// Lists the note files in this genre.
    pub fn notes(&self, note_extension: &str) -> Result<Vec<PathBuf>, LibraryError> {
        self.files_with_extension(|ext| ext.eq_ignore_ascii_case(note_extension))
    }

    fn files_with_extension(
        &self,
        matches: impl Fn(&str) -> bool,
    ) -> Result<Vec<PathBuf>, LibraryError> {
        let mut files: Vec<PathBuf> = list_dir(self.path())?
            .into_iter()
            .filter(|path| path.is_file() && !is_hidden(path))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(&matches)
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, LibraryError> {
    let read_error = |source| LibraryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    fs::read_dir(dir)
        .map_err(read_error)?
        .map(|entry| entry.map(|e| e.path()).map_err(read_error))
        .collect()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::write(path, "").unwrap();
    }

    #[test]
    fn open_rejects_missing_root() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = Library::open(&missing).unwrap_err();
        assert!(matches!(err, LibraryError::NotFound(ref p) if p == &missing));
        assert!(err.to_string().contains("library not found"));
    }

    #[test]
    fn open_rejects_file_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("books.txt");
        touch(&file);

        let err = Library::open(&file).unwrap_err();
        assert!(matches!(err, LibraryError::NotADirectory(_)));
    }

    #[test]
    fn genres_are_sorted_directories_without_hidden_ones() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Mystery")).unwrap();
        fs::create_dir(dir.path().join("Drama")).unwrap();
        fs::create_dir(dir.path().join(".obsidian")).unwrap();
        touch(&dir.path().join("stray.epub"));

        let library = Library::open(dir.path()).unwrap();
        let names: Vec<String> = library
            .genres()
            .unwrap()
            .iter()
            .map(|g| g.name().to_string())
            .collect();

        assert_eq!(names, vec!["Drama", "Mystery"]);
    }

    #[test]
    fn empty_library_has_no_genres() {
        let dir = tempdir().unwrap();
        let library = Library::open(dir.path()).unwrap();

        assert!(library.genres().unwrap().is_empty());
    }

    #[test]
    fn ebooks_match_configured_extensions_case_insensitively() {
        let dir = tempdir().unwrap();
        let genre_dir = dir.path().join("Mystery");
        fs::create_dir(&genre_dir).unwrap();
        touch(&genre_dir.join("b.epub"));
        touch(&genre_dir.join("a.EPUB"));
        touch(&genre_dir.join("c.pdf"));
        touch(&genre_dir.join("c.md"));
        touch(&genre_dir.join("._a.epub"));
        fs::create_dir(genre_dir.join("dir.epub")).unwrap();

        let genre = Genre::new(&genre_dir);

        let epubs: Vec<String> = genre
            .ebooks(&["epub".to_string()])
            .unwrap()
            .iter()
            .map(Ebook::file_name)
            .collect();
        assert_eq!(epubs, vec!["a.EPUB", "b.epub"]);

        let both = genre
            .ebooks(&["epub".to_string(), "pdf".to_string()])
            .unwrap();
        assert_eq!(both.len(), 3);
    }

    #[test]
    fn notes_lists_markdown_files() {
        let dir = tempdir().unwrap();
        let genre_dir = dir.path().join("Drama");
        fs::create_dir(&genre_dir).unwrap();
        touch(&genre_dir.join("one.md"));
        touch(&genre_dir.join("two.md"));
        touch(&genre_dir.join("two.epub"));

        let notes = Genre::new(&genre_dir).notes("md").unwrap();
        assert_eq!(
            notes,
            vec![genre_dir.join("one.md"), genre_dir.join("two.md")]
        );
    }

    #[test]
    fn listing_a_vanished_genre_fails() {
        let dir = tempdir().unwrap();
        let genre = Genre::new(dir.path().join("Gone"));

        let err = genre.notes("md").unwrap_err();
        assert!(matches!(err, LibraryError::ReadDir { .. }));
    }
}
