//! Reading and rewriting note header blocks.
//!
//! A note may open with a header delimited by `---` lines holding
//! `key: value`, `key: [a, b]` or YAML block-sequence fields. The header is
//! parsed into ordered entries that keep their original text, so rendering an
//! untouched header reproduces it byte-for-byte (including `\r\n` endings).
//! Only edited fields are re-serialized.
//!
//! # Examples
//!
//! ```
//! use shelf::frontmatter::{self, Document};
//!
//! let note = "---\ntags: adventure\ngenre: Pulp\n---\n\n# Conan\n";
//! let Document::Headed(mut headed) = frontmatter::parse(note) else {
//!     panic!("expected a header");
//! };
//!
//! headed.header_mut().add_tag("drama");
//! assert_eq!(
//!     headed.render(),
//!     "---\ntags: [adventure, drama]\ngenre: Pulp\n---\n\n# Conan\n"
//! );
//! ```

use std::fmt;

/// Marker line that opens and closes a header block.
pub const DELIMITER: &str = "---";

/// Header key holding the note's tag list.
pub const TAGS_KEY: &str = "tags";

/// Header key holding the human-readable genre label.
pub const GENRE_KEY: &str = "genre";

/// A note split according to its header state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document<'a> {
    /// The note does not start with the delimiter.
    Bare(&'a str),
    /// The note starts with the delimiter but no closing delimiter follows.
    Unterminated(&'a str),
    /// A well-formed header followed by an optional body.
    Headed(Headed<'a>),
}

/// Parses note content into its header and body.
///
/// A header exists when the content starts with [`DELIMITER`]. It is closed
/// by the first later line whose trimmed text is exactly the delimiter.
pub fn parse(content: &str) -> Document<'_> {
    if !content.starts_with(DELIMITER) {
        return Document::Bare(content);
    }

    let lines: Vec<&str> = content.split('\n').collect();
    let Some(close) = lines
        .iter()
        .skip(1)
        .position(|line| line.trim() == DELIMITER)
        .map(|i| i + 1)
    else {
        return Document::Unterminated(content);
    };

    // Byte offset just past the closing line's newline.
    let body_start: usize = lines[..=close].iter().map(|line| line.len() + 1).sum();
    let body = (body_start <= content.len()).then(|| &content[body_start..]);
    let closing = lines[close];

    Document::Headed(Headed {
        opening: lines[0],
        header: Frontmatter::from_lines(&lines[1..close], closing.ends_with('\r')),
        closing,
        body,
    })
}

/// Inserts `line` directly after the first line of `content`.
///
/// Used for notes whose header never closes: the line lands right after the
/// opening delimiter and the rest of the note is left as is.
pub fn insert_after_opening(content: &str, line: &str) -> String {
    match content.split_once('\n') {
        Some((first, rest)) => {
            let cr = if first.ends_with('\r') { "\r" } else { "" };
            format!("{first}\n{line}{cr}\n{rest}")
        }
        None => format!("{content}\n{line}"),
    }
}

/// Returns true if `text` contains `#tag` as a complete inline tag.
///
/// The match must not be glued to a preceding word character and must not
/// continue into a longer tag (`#drama_queen`, `#drama/tv`, `#drama-club`).
pub fn has_inline_tag(text: &str, tag: &str) -> bool {
    if tag.is_empty() {
        return false;
    }

    let needle = format!("#{tag}");
    text.match_indices(&needle).any(|(start, _)| {
        let before_ok = text[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_' || c == '#'));
        let after_ok = text[start + needle.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '/')));
        before_ok && after_ok
    })
}

/// A note with a well-formed header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headed<'a> {
    opening: &'a str,
    header: Frontmatter,
    closing: &'a str,
    body: Option<&'a str>,
}

impl<'a> Headed<'a> {
    pub fn header(&self) -> &Frontmatter {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Frontmatter {
        &mut self.header
    }

    /// Everything after the closing delimiter line, if anything follows it.
    pub fn body(&self) -> Option<&'a str> {
        self.body
    }

    /// Serializes the note back to text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(self.opening);
        out.push('\n');
        for line in self.header.lines() {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(self.closing);
        if let Some(body) = self.body {
            out.push('\n');
            out.push_str(body);
        }
        out
    }
}

/// Parsed value of a header field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// `key:` with nothing after the colon and no sequence items below it.
    Empty,
    /// `key: value`
    Scalar(String),
    /// `key: [a, b]`, with any text after the closing bracket kept in `suffix`.
    FlowList { items: Vec<String>, suffix: String },
    /// `key:` followed by `- item` lines.
    BlockList { items: Vec<String>, item_indent: String },
}

impl Value {
    fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Value::Empty;
        }

        if text.starts_with('[')
            && let Some(close) = text.rfind(']')
        {
            return Value::FlowList {
                items: split_flow_items(&text[1..close]),
                suffix: text[close + 1..].to_string(),
            };
        }

        Value::Scalar(text.to_string())
    }

    /// Returns the raw items held by this value. A scalar counts as one item.
    pub fn items(&self) -> Vec<&str> {
        match self {
            Value::Empty => Vec::new(),
            Value::Scalar(value) => vec![value.as_str()],
            Value::FlowList { items, .. } | Value::BlockList { items, .. } => {
                items.iter().map(String::as_str).collect()
            }
        }
    }
}

/// One `key: value` field with the header lines it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    key: String,
    indent: String,
    value: Value,
    raw: Vec<String>,
    cr: bool,
}

impl Field {
    fn new(key: &str, value: Value, cr: bool) -> Self {
        let mut field = Self {
            key: key.to_string(),
            indent: String::new(),
            value,
            raw: Vec::new(),
            cr,
        };
        field.rewrite();
        field
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Appends an item, promoting scalar and empty values to a flow list.
    ///
    /// Block sequences stay block sequences: the new item is added as one
    /// more `- item` line with the same indentation as the existing ones.
    pub fn append(&mut self, item: &str) {
        match &mut self.value {
            Value::BlockList { items, item_indent } => {
                let cr = if self.cr { "\r" } else { "" };
                self.raw.push(format!("{item_indent}- {item}{cr}"));
                items.push(item.to_string());
            }
            Value::FlowList { items, .. } => {
                items.push(item.to_string());
                self.rewrite();
            }
            Value::Scalar(current) => {
                let current = std::mem::take(current);
                self.value = Value::FlowList {
                    items: vec![current, item.to_string()],
                    suffix: String::new(),
                };
                self.rewrite();
            }
            Value::Empty => {
                self.value = Value::FlowList {
                    items: vec![item.to_string()],
                    suffix: String::new(),
                };
                self.rewrite();
            }
        }
    }

    fn accepts_block_items(&self) -> bool {
        matches!(self.value, Value::Empty | Value::BlockList { .. })
    }

    fn push_block_item(&mut self, item: &str, item_indent: &str, raw: &str) {
        match &mut self.value {
            Value::BlockList { items, .. } => items.push(item.to_string()),
            _ => {
                self.value = Value::BlockList {
                    items: vec![item.to_string()],
                    item_indent: item_indent.to_string(),
                }
            }
        }
        self.raw.push(raw.to_string());
    }

    fn rewrite(&mut self) {
        let cr = if self.cr { "\r" } else { "" };
        let line = match self.value {
            Value::Empty => format!("{}{}:{cr}", self.indent, self.key),
            _ => format!("{}{}: {}{cr}", self.indent, self.key, self.value),
        };
        self.raw = vec![line];
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Scalar(value) => write!(f, "{value}"),
            Value::FlowList { items, suffix } => write!(f, "[{}]{suffix}", items.join(", ")),
            Value::BlockList { items, item_indent } => {
                for item in items {
                    write!(f, "\n{item_indent}- {item}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Field(Field),
    /// Comments, blank lines and anything else that is not a field.
    Other(String),
}

/// The ordered contents of a header block, without its delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frontmatter {
    entries: Vec<Entry>,
    cr: bool,
}

impl Frontmatter {
    /// Creates an empty header for building new notes.
    pub fn new() -> Self {
        Self::default()
    }

    fn from_lines(lines: &[&str], cr: bool) -> Self {
        let mut entries: Vec<Entry> = Vec::new();

        for &raw in lines {
            let text = raw.strip_suffix('\r').unwrap_or(raw);

            if let Some(Entry::Field(field)) = entries.last_mut()
                && field.accepts_block_items()
                && let Some((item_indent, item)) = block_item(text)
            {
                field.push_block_item(item, item_indent, raw);
                continue;
            }

            let entry = match split_field(text) {
                Some((indent, key, value)) => Entry::Field(Field {
                    key: key.to_string(),
                    indent: indent.to_string(),
                    value: Value::parse(value),
                    raw: vec![raw.to_string()],
                    cr: raw.ends_with('\r'),
                }),
                None => Entry::Other(raw.to_string()),
            };
            entries.push(entry);
        }

        Self { entries, cr }
    }

    /// Reads every line after the opening delimiter of an unterminated
    /// header as if it were header content.
    pub fn from_unterminated(content: &str) -> Self {
        let lines: Vec<&str> = content.split('\n').skip(1).collect();
        Self::from_lines(&lines, false)
    }

    /// Adds a `key: value` field at the end of the header.
    #[must_use]
    pub fn with_scalar(mut self, key: &str, value: &str) -> Self {
        let value = match value.trim() {
            "" => Value::Empty,
            text => Value::Scalar(text.to_string()),
        };
        self.push_field(key, value);
        self
    }

    /// Adds a `key: [a, b]` field at the end of the header.
    #[must_use]
    pub fn with_list<S: AsRef<str>>(mut self, key: &str, items: &[S]) -> Self {
        let items = items.iter().map(|s| s.as_ref().to_string()).collect();
        self.push_field(
            key,
            Value::FlowList {
                items,
                suffix: String::new(),
            },
        );
        self
    }

    fn push_field(&mut self, key: &str, value: Value) {
        self.entries.push(Entry::Field(Field::new(key, value, self.cr)));
    }

    /// Returns the first field with the given key.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Field(field) if field.key == key => Some(field),
            _ => None,
        })
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Field(field) if field.key == key => Some(field),
            _ => None,
        })
    }

    /// Returns the tags listed under [`TAGS_KEY`], unquoted and without `#`.
    pub fn tags(&self) -> Vec<&str> {
        self.field(TAGS_KEY)
            .map(|field| field.value.items().into_iter().map(clean_item).collect())
            .unwrap_or_default()
    }

    /// Returns true if the header tag list holds `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().contains(&tag)
    }

    /// Adds `tag` to the header tag list.
    ///
    /// An existing list is extended and a bare scalar is promoted to a list.
    /// Without a tag field, `tags: [tag]` is added as the last header line.
    pub fn add_tag(&mut self, tag: &str) {
        match self.field_mut(TAGS_KEY) {
            Some(field) => field.append(tag),
            None => self.push_field(
                TAGS_KEY,
                Value::FlowList {
                    items: vec![tag.to_string()],
                    suffix: String::new(),
                },
            ),
        }
    }

    /// Header lines in order, as they will be written.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().flat_map(|entry| match entry {
            Entry::Field(field) => field.raw.iter().map(String::as_str).collect::<Vec<_>>(),
            Entry::Other(line) => vec![line.as_str()],
        })
    }

    /// Renders the header with its delimiters, ending in a newline.
    pub fn to_block(&self) -> String {
        let mut out = String::new();
        out.push_str(DELIMITER);
        out.push('\n');
        for line in self.lines() {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(DELIMITER);
        out.push('\n');
        out
    }
}

/// Splits `  key: value` into indentation, key and raw value.
fn split_field(text: &str) -> Option<(&str, &str, &str)> {
    let trimmed = text.trim_start();
    if trimmed.starts_with(['#', '-']) {
        return None;
    }

    let (key, value) = trimmed.split_once(':')?;
    if key.trim().is_empty() {
        return None;
    }

    let indent = &text[..text.len() - trimmed.len()];
    Some((indent, key, value))
}

/// Splits `  - item` into indentation and item text.
fn block_item(text: &str) -> Option<(&str, &str)> {
    let trimmed = text.trim_start();
    let rest = trimmed.strip_prefix('-')?;
    if !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
        return None;
    }

    let indent = &text[..text.len() - trimmed.len()];
    Some((indent, rest.trim()))
}

/// Splits the inside of `[a, "b, c", d]` on commas outside of quotes.
///
/// A quote only opens a quoted item as the item's first character, so
/// `children's` is a plain item.
fn split_flow_items(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in inner.chars() {
        match (quote, c) {
            (None, '"' | '\'') if current.trim().is_empty() => {
                quote = Some(c);
                current.push(c);
            }
            (Some(q), _) if c == q => {
                quote = None;
                current.push(c);
            }
            (None, ',') => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    items.push(current);

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn clean_item(item: &str) -> &str {
    let item = item.trim();
    let unquoted = item
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| item.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(item);
    unquoted.strip_prefix('#').unwrap_or(unquoted)
}
