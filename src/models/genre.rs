use std::path::{Path, PathBuf};

use crate::tagging::TagSanitizer;

/// A genre directory inside the library root.
///
/// The directory name is both the display label and the source of the tag
/// written into every note under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    name: String,
    tag: String,
    path: PathBuf,
}

impl Genre {
    /// Creates a genre from its directory, deriving the tag from the
    /// directory name.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf::Genre;
    ///
    /// let genre = Genre::new("/books/Science Fiction & Fantasy");
    /// assert_eq!(genre.name(), "Science Fiction & Fantasy");
    /// assert_eq!(genre.tag(), "science_fiction_fantasy");
    /// ```
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tag = TagSanitizer::sanitize(&name);

        Self { name, tag, path }
    }

    /// Returns the directory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tag derived from the directory name. May be empty.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
