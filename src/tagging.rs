//! Genre tags for library notes.
//!
//! Tags are derived from genre folder names by [`TagSanitizer`] and written
//! into note headers by [`retrofit_tag`] / [`retrofit_note`].
//!
//! # Examples
//!
//! ```
//! use shelf::tagging::{DuplicateCheck, Retrofit, TagSanitizer, retrofit_tag};
//!
//! let tag = TagSanitizer::sanitize("Sci-Fi");
//! let result = retrofit_tag("# Dune\n", &tag, "Sci-Fi", DuplicateCheck::Substring);
//!
//! assert_eq!(
//!     result,
//!     Retrofit::Updated("---\ntags: [sci_fi]\ngenre: Sci-Fi\n---\n\n# Dune\n".to_string())
//! );
//! ```

mod retrofit;
mod sanitizer;

pub use retrofit::{DuplicateCheck, Retrofit, TagOutcome, retrofit_note, retrofit_tag};
pub use sanitizer::TagSanitizer;
