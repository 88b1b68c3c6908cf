/// Derives vault tags from genre folder names.
///
/// Folder names are free text ("Science Fiction & Fantasy!"); tags are
/// lowercase tokens made only of alphanumerics and underscores.
pub struct TagSanitizer;

impl TagSanitizer {
    /// Sanitizes a genre folder name into a tag.
    ///
    /// # Sanitization rules
    ///
    /// - Converts to lowercase
    /// - Removes every character that is not alphanumeric, `_`, whitespace or `-`
    /// - Collapses each run of whitespace and hyphens into a single `_`
    ///
    /// Lowercasing runs before the filter, not after it. The two orders only
    /// differ for letters such as `İ`, whose lowercase form is `i` followed by
    /// a combining mark. Filtering the lowercased text is what keeps a second
    /// sanitize from changing the tag.
    ///
    /// The result may be empty when the name holds no usable characters.
    /// Sanitizing a tag again returns it unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf::tagging::TagSanitizer;
    ///
    /// assert_eq!(TagSanitizer::sanitize("Mystery"), "mystery");
    /// assert_eq!(
    ///     TagSanitizer::sanitize("Science Fiction & Fantasy!"),
    ///     "science_fiction_fantasy"
    /// );
    /// assert_eq!(TagSanitizer::sanitize("Self-Help"), "self_help");
    /// assert_eq!(TagSanitizer::sanitize("!!!"), "");
    /// ```
    #[must_use]
    pub fn sanitize(name: &str) -> String {
        // Lowercasing first keeps the output a fixed point: some uppercase
        // letters lowercase into combining marks that the filter would drop.
        let lowered = name.to_lowercase();
        let mut tag = String::with_capacity(lowered.len());
        let mut in_separator = false;

        for c in lowered.chars() {
            if c.is_whitespace() || c == '-' {
                if !in_separator {
                    tag.push('_');
                    in_separator = true;
                }
            } else if c.is_alphanumeric() || c == '_' {
                tag.push(c);
                in_separator = false;
            }
            // Stripped characters do not end a separator run.
        }

        tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_conversion() {
        assert_eq!(TagSanitizer::sanitize("MYSTERY"), "mystery");
        assert_eq!(TagSanitizer::sanitize("MyStErY"), "mystery");
        assert_eq!(TagSanitizer::sanitize("mystery"), "mystery");
    }

    #[test]
    fn test_whitespace_and_hyphen_runs_collapse() {
        assert_eq!(TagSanitizer::sanitize("science fiction"), "science_fiction");
        assert_eq!(TagSanitizer::sanitize("science   fiction"), "science_fiction");
        assert_eq!(TagSanitizer::sanitize("sci-fi"), "sci_fi");
        assert_eq!(TagSanitizer::sanitize("sci - fi"), "sci_fi");
        assert_eq!(TagSanitizer::sanitize("sci\t-\nfi"), "sci_fi");
    }

    #[test]
    fn test_special_character_removal() {
        assert_eq!(TagSanitizer::sanitize("C++"), "c");
        assert_eq!(TagSanitizer::sanitize("Poetry!"), "poetry");
        assert_eq!(TagSanitizer::sanitize("Node.js"), "nodejs");
        assert_eq!(TagSanitizer::sanitize("(Classics)"), "classics");
    }

    #[test]
    fn test_stripped_characters_do_not_split_separators() {
        assert_eq!(
            TagSanitizer::sanitize("Science Fiction & Fantasy!"),
            "science_fiction_fantasy"
        );
        assert_eq!(TagSanitizer::sanitize("Horror / Thriller"), "horror_thriller");
    }

    #[test]
    fn test_underscores_are_kept_verbatim() {
        assert_eq!(TagSanitizer::sanitize("sci_fi"), "sci_fi");
        assert_eq!(TagSanitizer::sanitize("a _ b"), "a___b");
    }

    #[test]
    fn test_leading_and_trailing_separators_become_underscores() {
        assert_eq!(TagSanitizer::sanitize(" Drama "), "_drama_");
        assert_eq!(TagSanitizer::sanitize("-Drama-"), "_drama_");
    }

    #[test]
    fn test_unicode_letters_are_kept() {
        assert_eq!(TagSanitizer::sanitize("Ficção Científica"), "ficção_científica");
        assert_eq!(TagSanitizer::sanitize("Romance 2024"), "romance_2024");
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(TagSanitizer::sanitize(""), "");
        assert_eq!(TagSanitizer::sanitize("!!!"), "");
        assert_eq!(TagSanitizer::sanitize("&?*"), "");
    }

    #[test]
    fn test_output_is_a_fixed_point() {
        let names = [
            "Science Fiction & Fantasy!",
            "Self-Help",
            " Drama ",
            "Ficção Científica",
            "İstanbul Stories",
            "a _ b",
            "!!!",
        ];

        for name in names {
            let once = TagSanitizer::sanitize(name);
            let twice = TagSanitizer::sanitize(&once);
            assert_eq!(once, twice, "sanitize is not a fixed point for {name:?}");
        }
    }

    #[test]
    fn test_output_contains_only_tag_characters() {
        let tag = TagSanitizer::sanitize("Weird -- Name: With (Lots) of $tuff!");
        assert!(
            tag.chars()
                .all(|c| c == '_' || (c.is_alphanumeric() && !c.is_uppercase())),
            "unexpected character in {tag:?}"
        );
        assert_eq!(tag, "weird_name_with_lots_of_tuff");
    }
}
