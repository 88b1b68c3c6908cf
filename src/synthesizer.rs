//! Companion note creation for e-books that do not have one yet.

use std::path::{Path, PathBuf};

use crate::frontmatter::{Frontmatter, GENRE_KEY, TAGS_KEY};
use crate::models::{Ebook, Genre};
use crate::notes::{self, NoteError};

const TYPE_KEY: &str = "type";
const FORMAT_KEY: &str = "format";
const NOTE_TYPE: &str = "book";

/// What happened to one e-book during note synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synthesis {
    /// A new note was written at this path.
    Created(PathBuf),
    /// Dry run: a note would have been written at this path.
    WouldCreate(PathBuf),
    /// A companion note already exists; it was not touched.
    Exists(PathBuf),
}

impl Synthesis {
    pub fn note_path(&self) -> &Path {
        match self {
            Synthesis::Created(path) | Synthesis::WouldCreate(path) | Synthesis::Exists(path) => {
                path
            }
        }
    }
}

/// Renders the companion note for `ebook` in `genre`.
///
/// # Examples
///
/// ```
/// use shelf::{Ebook, Genre};
/// use shelf::synthesizer::render_note;
///
/// let genre = Genre::new("/books/Mystery");
/// let note = render_note(&Ebook::new("/books/Mystery/book1.epub"), &genre);
///
/// assert!(note.starts_with("---\ntags: [mystery]\ngenre: Mystery\n"));
/// assert!(note.contains("\n# book1\n"));
/// assert!(note.contains("- [ ] Read\n"));
/// ```
pub fn render_note(ebook: &Ebook, genre: &Genre) -> String {
    let format = ebook.format();
    let tags: Vec<&str> = Some(genre.tag()).filter(|tag| !tag.is_empty()).into_iter().collect();

    let header = Frontmatter::new()
        .with_list(TAGS_KEY, &tags)
        .with_scalar(GENRE_KEY, genre.name())
        .with_scalar(TYPE_KEY, NOTE_TYPE)
        .with_scalar(FORMAT_KEY, &format)
        .to_block();

    format!(
        "{header}\n\
         # {title}\n\
         \n\
         ## Info\n\
         - **Genre**: {genre}\n\
         - **Format**: {format_label}\n\
         - **File**: [[{file}]]\n\
         \n\
         ## Reading Notes\n\
         \n\
         ## Favorite Quotes\n\
         \n\
         ## Rating\n\
         - [ ] Read\n\
         - Score: /10\n",
        title = ebook.title(),
        genre = genre.name(),
        format_label = format.to_uppercase(),
        file = ebook.file_name(),
    )
}

/// Creates the companion note for `ebook` unless one already exists.
///
/// An existing note is never opened or rewritten. Creation is exclusive, so a
/// note that appears between the check and the write is not overwritten
/// either; that case surfaces as [`NoteError::AlreadyExists`].
pub fn synthesize_note(
    ebook: &Ebook,
    genre: &Genre,
    note_extension: &str,
    dry_run: bool,
) -> Result<Synthesis, NoteError> {
    let note_path = ebook.companion_note(note_extension);

    if note_path.exists() {
        return Ok(Synthesis::Exists(note_path));
    }
    if dry_run {
        return Ok(Synthesis::WouldCreate(note_path));
    }

    notes::create_note(&note_path, &render_note(ebook, genre))?;
    Ok(Synthesis::Created(note_path))
}
