mod ebook;
mod genre;

pub use ebook::Ebook;
pub use genre::Genre;
