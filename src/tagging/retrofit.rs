use std::path::Path;

use serde::Serialize;

use crate::frontmatter::{self, Document, Frontmatter, GENRE_KEY, TAGS_KEY};
use crate::notes::{self, NoteError};

/// How a note is checked for an existing tag before it is modified.
///
/// Both checks first look for the tag in the header tag list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateCheck {
    /// Also skip when `#tag` or `tags: tag` occurs anywhere in the note.
    ///
    /// Conservative: `#tag` inside a longer tag such as `#tag_extra`, or in
    /// body prose, counts as present.
    #[default]
    Substring,
    /// Also skip when the body holds `#tag` as a complete inline tag.
    Structural,
}

impl DuplicateCheck {
    /// Returns true if `content` already carries `tag`.
    pub fn is_tagged(self, content: &str, tag: &str) -> bool {
        let document = frontmatter::parse(content);

        let in_header = match &document {
            Document::Bare(_) => false,
            Document::Unterminated(text) => Frontmatter::from_unterminated(text).has_tag(tag),
            Document::Headed(headed) => headed.header().has_tag(tag),
        };
        if in_header {
            return true;
        }

        match self {
            DuplicateCheck::Substring => {
                content.contains(&format!("#{tag}"))
                    || content.contains(&format!("{TAGS_KEY}: {tag}"))
            }
            DuplicateCheck::Structural => match &document {
                Document::Bare(text) | Document::Unterminated(text) => {
                    frontmatter::has_inline_tag(text, tag)
                }
                Document::Headed(headed) => headed
                    .body()
                    .is_some_and(|body| frontmatter::has_inline_tag(body, tag)),
            },
        }
    }
}

/// Result of adding a tag to note content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrofit {
    /// The note already carries the tag; nothing to write.
    AlreadyTagged,
    /// The full new note content.
    Updated(String),
}

/// Adds `tag` to the header of `content`.
///
/// - No header: a new header with `tags: [tag]` and `genre: <genre>` is
///   prepended, followed by a blank line and the untouched content.
/// - Header without a closing delimiter: `tags: [tag]` is inserted right
///   after the opening delimiter.
/// - Well-formed header: the tag is appended to the existing tag field, or a
///   new tag field is added as the last header line.
///
/// An empty tag is treated as already present.
pub fn retrofit_tag(content: &str, tag: &str, genre: &str, check: DuplicateCheck) -> Retrofit {
    if tag.is_empty() || check.is_tagged(content, tag) {
        return Retrofit::AlreadyTagged;
    }

    let updated = match frontmatter::parse(content) {
        Document::Bare(body) => {
            let header = Frontmatter::new()
                .with_list(TAGS_KEY, &[tag])
                .with_scalar(GENRE_KEY, genre);
            format!("{}\n{body}", header.to_block())
        }
        Document::Unterminated(text) => {
            frontmatter::insert_after_opening(text, &format!("{TAGS_KEY}: [{tag}]"))
        }
        Document::Headed(mut headed) => {
            headed.header_mut().add_tag(tag);
            headed.render()
        }
    };

    Retrofit::Updated(updated)
}

/// What happened to a note file during tag retrofit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    AlreadyPresent,
    Added,
    /// Dry run: the tag is missing and would have been added.
    WouldAdd,
}

/// Reads the note at `path`, adds `tag` if missing, and writes it back.
///
/// With `dry_run` the note is read and checked but never written.
pub fn retrofit_note(
    path: &Path,
    tag: &str,
    genre: &str,
    check: DuplicateCheck,
    dry_run: bool,
) -> Result<TagOutcome, NoteError> {
    let content = notes::read_note(path)?;

    match retrofit_tag(&content, tag, genre, check) {
        Retrofit::AlreadyTagged => Ok(TagOutcome::AlreadyPresent),
        Retrofit::Updated(_) if dry_run => Ok(TagOutcome::WouldAdd),
        Retrofit::Updated(updated) => {
            notes::write_note(path, &updated)?;
            Ok(TagOutcome::Added)
        }
    }
}
