pub mod batch;
pub mod config;
pub mod frontmatter;
pub mod library;
pub mod models;
pub mod notes;
pub mod synthesizer;
pub mod tagging;

pub use batch::{BatchReport, FileFailure, run_note_synthesis, run_tag_retrofit};
pub use config::{LibraryConfig, LibraryConfigBuilder};
pub use library::{Library, LibraryError};
pub use models::{Ebook, Genre};
pub use notes::NoteError;
pub use tagging::{DuplicateCheck, TagSanitizer};
