use std::path::{Path, PathBuf};

/// An e-book file inside a genre directory. Never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ebook {
    path: PathBuf,
}

impl Ebook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the base name without extension, used as the note title.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf::Ebook;
    ///
    /// let book = Ebook::new("/books/Mystery/The A.B.C. Murders.epub");
    /// assert_eq!(book.title(), "The A.B.C. Murders");
    /// ```
    pub fn title(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Returns the file name with extension, used to link the note to the book.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Returns the lowercase extension, e.g. `epub`.
    pub fn format(&self) -> String {
        self.path
            .extension()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    /// Returns the path of the companion note: same directory and base name,
    /// with `note_extension`.
    pub fn companion_note(&self, note_extension: &str) -> PathBuf {
        self.path.with_extension(note_extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_split_the_file_name() {
        let book = Ebook::new("/library/Mystery/book1.EPUB");

        assert_eq!(book.title(), "book1");
        assert_eq!(book.file_name(), "book1.EPUB");
        assert_eq!(book.format(), "epub");
    }

    #[test]
    fn companion_note_keeps_inner_dots() {
        let book = Ebook::new("/library/Mystery/Vol. 2.epub");

        assert_eq!(
            book.companion_note("md"),
            PathBuf::from("/library/Mystery/Vol. 2.md")
        );
        assert_eq!(book.title(), "Vol. 2");
    }
}
