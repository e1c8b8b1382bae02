//! The site metadata document.
//!
//! A small `key: value` file written by the export tooling, e.g.
//!
//! ```yaml
//! last_updated: '2025-03-01 09:30:00'
//! permalink: example
//! ```
//!
//! Only `last_updated` is read. Everything else, including lines that are not
//! `key: value` pairs, is ignored.

const LAST_UPDATED: &str = "last_updated";

/// Fields of the metadata document the page displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// `None` when the key is missing or its value is blank.
    pub last_updated: Option<String>,
}

impl Metadata {
    /// Parse the document. Never fails; malformed input yields empty fields.
    pub fn parse(text: &str) -> Self {
        let last_updated = entries(text)
            .find(|(key, _)| *key == LAST_UPDATED)
            .and_then(|(_, value)| {
                let value = unquote(value);
                (!value.is_empty()).then(|| value.to_string())
            });
        Self { last_updated }
    }
}

/// Top-level `key: value` pairs, skipping blanks, comments and indented lines.
fn entries(text: &str) -> impl Iterator<Item = (&str, &str)> {
    text.lines().filter_map(|line| {
        if line.starts_with([' ', '\t', '#']) {
            return None;
        }
        let (key, value) = line.split_once(':')?;
        Some((key.trim_end(), value.trim()))
    })
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_value() {
        let meta = Metadata::parse("last_updated: 2025-03-01 09:30:00 (UTC)\npermalink: me\n");
        assert_eq!(meta.last_updated.as_deref(), Some("2025-03-01 09:30:00 (UTC)"));
    }

    #[test]
    fn test_parse_quoted_value() {
        let meta = Metadata::parse("source: x\nlast_updated: '2025-03-01 09:30:00'\n");
        assert_eq!(meta.last_updated.as_deref(), Some("2025-03-01 09:30:00"));

        let meta = Metadata::parse("last_updated: \"yesterday\"");
        assert_eq!(meta.last_updated.as_deref(), Some("yesterday"));
    }

    #[test]
    fn test_value_keeps_colons() {
        let meta = Metadata::parse("last_updated: 12:30");
        assert_eq!(meta.last_updated.as_deref(), Some("12:30"));
    }

    #[test]
    fn test_missing_key() {
        assert_eq!(Metadata::parse("permalink: me\n"), Metadata::default());
        assert_eq!(Metadata::parse(""), Metadata::default());
        assert_eq!(Metadata::parse("not yaml at all"), Metadata::default());
    }

    #[test]
    fn test_blank_value_is_missing() {
        assert!(Metadata::parse("last_updated:").last_updated.is_none());
        assert!(Metadata::parse("last_updated:   ").last_updated.is_none());
        assert!(Metadata::parse("last_updated: ''").last_updated.is_none());
    }

    #[test]
    fn test_key_must_match_exactly() {
        let meta = Metadata::parse("not_last_updated: a\n  last_updated: b\n# last_updated: c");
        assert!(meta.last_updated.is_none());
    }

    #[test]
    fn test_first_occurrence_wins() {
        let meta = Metadata::parse("last_updated: first\nlast_updated: second");
        assert_eq!(meta.last_updated.as_deref(), Some("first"));
    }

    #[test]
    fn test_crlf_lines() {
        let meta = Metadata::parse("last_updated: today\r\nother: x\r\n");
        assert_eq!(meta.last_updated.as_deref(), Some("today"));
    }
}
