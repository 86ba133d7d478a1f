// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Env-File Parser
//!
//! Line-oriented parser for the `.env` file format.
//!
//! The format supports strings only and is parsed with the following rules:
//! - Each line is one possible key/value set
//! - Blank lines and full-line `#` comments are skipped
//! - Each set is delimited by the first `=` found; lines without a `=` are
//!   silently dropped
//! - Leading and trailing whitespace is removed from keys and values
//! - A leading `export` keyword (any case) is stripped from keys
//! - One matched pair of leading/trailing single or double quotes is
//!   stripped from values (never from keys); inner quotes are untouched and
//!   no escape sequences are processed
//!
//! Parsing is a pure function of the input text. It never fails: malformed
//! lines produce no entry instead of an error.

/// One key/value pair produced by a loader.
///
/// Keys and values are plain strings. Values may be empty; an entry is never
/// produced for an empty key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The key, trimmed and with any `export` prefix removed.
    pub key: String,
    /// The value, trimmed and with one matched outer quote pair removed.
    pub value: String,
}

impl Entry {
    /// Creates an entry from owned parts.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Parses env-file text into an ordered sequence of entries.
///
/// Line order is preserved and duplicate keys are kept; merging the result
/// top-to-bottom gives the last occurrence of a key precedence.
pub fn parse_env_file(content: &str) -> Vec<Entry> {
    content.lines().filter_map(parse_line).collect()
}

/// Parses a single physical line, returning `None` for comments, blank
/// lines and malformed input.
fn parse_line(line: &str) -> Option<Entry> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (raw_key, raw_value) = trimmed.split_once('=')?;

    let key = strip_export(raw_key.trim()).trim();
    if key.is_empty() {
        return None;
    }

    let value = strip_lt_quotes(raw_value.trim());

    Some(Entry::new(key, value))
}

/// Removes a leading `export` keyword from a key, case agnostic.
///
/// Only a whole-word prefix counts: the keyword must be followed by
/// whitespace, so a key literally named `export` survives.
fn strip_export(key: &str) -> &str {
    let bytes = key.as_bytes();
    if bytes.len() > 6
        && bytes[..6].eq_ignore_ascii_case(b"export")
        && bytes[6].is_ascii_whitespace()
    {
        &key[7..]
    } else {
        key
    }
}

/// Removes one matched pair of leading/trailing single or double quotes.
///
/// Unmatched or mixed quotes are left alone, as are quotes anywhere inside
/// the value.
fn strip_lt_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(content: &str) -> Entry {
        let entries = parse_env_file(content);
        assert_eq!(entries.len(), 1, "expected one entry from {content:?}");
        entries.into_iter().next().unwrap()
    }

    #[test]
    fn parses_plain_pair() {
        assert_eq!(single("SUPER_SECRET=12345"), Entry::new("SUPER_SECRET", "12345"));
    }

    #[test]
    fn trims_whitespace_around_key_and_value() {
        assert_eq!(
            single("  PASSWORD = correct horse battery staple  "),
            Entry::new("PASSWORD", "correct horse battery staple"),
        );
    }

    #[test]
    fn splits_on_first_delimiter_only() {
        assert_eq!(single("VALID=="), Entry::new("VALID", "="));
        assert_eq!(single("URL=a=b=c"), Entry::new("URL", "a=b=c"));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let entries = parse_env_file("# comment\n\nKEY=value\n");
        assert_eq!(entries, vec![Entry::new("KEY", "value")]);
    }

    #[test]
    fn skips_lines_without_delimiter() {
        let entries = parse_env_file("not a valid line\nKEY=value");
        assert_eq!(entries, vec![Entry::new("KEY", "value")]);
    }

    #[test]
    fn skips_empty_keys() {
        assert!(parse_env_file("=value\n   =other").is_empty());
    }

    #[test]
    fn strips_export_prefix_case_agnostic() {
        assert_eq!(
            single("export PASSWORD = correct horse battery staple"),
            Entry::new("PASSWORD", "correct horse battery staple"),
        );
        assert_eq!(single("EXPORT X=1"), Entry::new("X", "1"));
        assert_eq!(single("  Export  SPACED=ok"), Entry::new("SPACED", "ok"));
    }

    #[test]
    fn keeps_key_literally_named_export() {
        assert_eq!(single("export=value"), Entry::new("export", "value"));
    }

    #[test]
    fn strips_matched_double_quotes_from_value() {
        assert_eq!(single(r#"USER_NAME="not_admin""#), Entry::new("USER_NAME", "not_admin"));
    }

    #[test]
    fn strips_matched_single_quotes_keeping_inner_content() {
        assert_eq!(
            single(r#"MESSAGE = '    Totally not an "admin" account logging in'"#),
            Entry::new("MESSAGE", r#"    Totally not an "admin" account logging in"#),
        );
    }

    #[test]
    fn keeps_unmatched_and_nested_quotes() {
        assert_eq!(single("LOPSIDED='value"), Entry::new("LOPSIDED", "'value"));
        assert_eq!(
            single("NESTED_QUOTES=\"'Double your quotes, double your fun'\""),
            Entry::new("NESTED_QUOTES", "'Double your quotes, double your fun'"),
        );
    }

    #[test]
    fn strips_empty_quote_pair_to_empty_value() {
        assert_eq!(single("EMPTY=\"\""), Entry::new("EMPTY", ""));
    }

    #[test]
    fn never_strips_quotes_from_keys() {
        assert_eq!(single("\"QUOTED\"=value"), Entry::new("\"QUOTED\"", "value"));
    }

    #[test]
    fn keeps_duplicate_keys_in_order() {
        let entries = parse_env_file("KEY=a\nKEY=b");
        assert_eq!(entries, vec![Entry::new("KEY", "a"), Entry::new("KEY", "b")]);
    }

    #[test]
    fn parsing_is_idempotent() {
        let content = "# header\nexport A=1\nB='two'\nbroken line\nB=3\n";
        assert_eq!(parse_env_file(content), parse_env_file(content));
    }

    #[test]
    fn allows_empty_values() {
        assert_eq!(single("EMPTY="), Entry::new("EMPTY", ""));
    }
}
