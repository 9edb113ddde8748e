//! Storage-key escaping.
//!
//! Free-text values (city names, surnames) are used as segments of
//! hierarchical store keys. The store only accepts ASCII alphanumerics in a
//! segment, so every other character is mapped to a fixed placeholder. The
//! mapping keeps character count and order, is idempotent on already-escaped
//! input, and is lossy (distinct inputs may collide); there is no inverse.

/// Placeholder for every character outside `[A-Za-z0-9]`.
const PLACEHOLDER: char = '#';

/// Separator between segments of a composite store key.
const SEPARATOR: char = '/';

/// Escape a free-text value into a storage-safe key segment.
///
/// ASCII alphanumerics pass through unchanged; everything else (whitespace,
/// punctuation, path separators, any non-ASCII character) becomes `#`. The
/// output has the same character count as the input, and escaping an
/// already-escaped string is a no-op.
pub fn escape_key_segment(value: &str) -> String {
    value
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { PLACEHOLDER })
        .collect()
}

// ---------------------------------------------------------------------------
// StoreKey
// ---------------------------------------------------------------------------

/// Builder for composite hierarchical store keys.
///
/// A key starts from a fixed base prefix and grows by appending escaped
/// segments, joined with `/`:
///
/// ```
/// use soapbridge_core::escape::StoreKey;
///
/// let key = StoreKey::new("/scriptsample")
///     .push("London")
///     .push("O'Neil")
///     .push("Ann");
/// assert_eq!(key.as_str(), "/scriptsample/London/O#Neil/Ann");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKey {
    key: String,
}

impl StoreKey {
    /// Start a key from the given base prefix. The base is taken verbatim;
    /// only pushed segments are escaped.
    pub fn new(base: impl Into<String>) -> Self {
        Self { key: base.into() }
    }

    /// Append an escaped segment.
    pub fn push(mut self, segment: &str) -> Self {
        self.key.push(SEPARATOR);
        self.key.push_str(&escape_key_segment(segment));
        self
    }

    /// The rendered key.
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_alphanumerics() {
        assert_eq!(escape_key_segment("London"), "London");
        assert_eq!(escape_key_segment("Ann42"), "Ann42");
    }

    #[test]
    fn replaces_punctuation_and_whitespace() {
        assert_eq!(escape_key_segment("John Doe!"), "John#Doe#");
        assert_eq!(escape_key_segment("O'Neil"), "O#Neil");
        assert_eq!(escape_key_segment("a/b\\c"), "a#b#c");
    }

    #[test]
    fn replaces_non_ascii() {
        assert_eq!(escape_key_segment("Pöyhönen"), "P#yh#nen");
        assert_eq!(escape_key_segment("東京"), "##");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(escape_key_segment(""), "");
    }

    #[test]
    fn preserves_character_count() {
        let inputs = ["", "plain", "with spaces", "püné!", "a\tb\nc"];
        for input in inputs {
            assert_eq!(
                escape_key_segment(input).chars().count(),
                input.chars().count(),
                "length changed for {input:?}"
            );
        }
    }

    #[test]
    fn idempotent_on_escaped_input() {
        let inputs = ["John Doe!", "O'Neil", "már#ka", "###", "plain"];
        for input in inputs {
            let once = escape_key_segment(input);
            assert_eq!(escape_key_segment(&once), once);
        }
    }

    #[test]
    fn composite_key_joins_segments() {
        let key = StoreKey::new("/scriptsample")
            .push("London")
            .push("O'Neil")
            .push("Ann");
        assert_eq!(key.as_str(), "/scriptsample/London/O#Neil/Ann");
    }

    #[test]
    fn composite_key_escapes_separators_in_segments() {
        let key = StoreKey::new("/base").push("a/b");
        assert_eq!(key.as_str(), "/base/a#b");
    }
}
