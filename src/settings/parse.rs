//! Line-level parsing of `name=value` settings files.
//!
//! ```text
//! # comment
//! name=value
//! query=Select a,b
//!    from t
//! ```
//!
//! A value continues onto following lines indented by at least three
//! whitespace characters; continuations are joined with a single space.

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::SettingsError;

/// `name=value`, where the name has no whitespace and the value is not blank.
static ENTRY_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^=\s]+\s*=\s*\S+").unwrap());

/// At least three whitespace characters of indentation, then text.
static CONTINUATION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s{3,}[^ ]").unwrap());

/// A setting as it appears in the file, before substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub value: String,
}

/// Parses raw file lines into entries, in file order.
///
/// `path` is only used to identify the file in errors.
pub fn parse_lines<I, S>(lines: I, path: &Path) -> Result<Vec<RawEntry>, SettingsError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lines: Vec<String> = lines
        .into_iter()
        .filter(|line| !line.as_ref().trim_start().starts_with('#'))
        .map(|line| line.as_ref().replace('\t', "    "))
        .collect();

    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    let mut current: Option<RawEntry> = None;

    for (i, line) in lines.iter().enumerate() {
        if let Some((name, value)) = split_entry(line) {
            current = Some(RawEntry {
                name: name.trim().to_owned(),
                value: value.to_owned(),
            });
        } else if let Some(entry) = current.as_mut() {
            if CONTINUATION_PATTERN.is_match(line) {
                entry.value.push(' ');
                entry.value.push_str(line.trim());
            }
        }

        let closes = match lines.get(i + 1) {
            None => true,
            Some(next) => ENTRY_PATTERN.is_match(next) || next.trim().is_empty(),
        };

        if closes {
            if let Some(entry) = current.take() {
                if !seen.insert(entry.name.clone()) {
                    return Err(SettingsError::DuplicateKey {
                        path: path.to_path_buf(),
                        name: entry.name,
                    });
                }
                entries.push(entry);
            }
        }
    }

    Ok(entries)
}

/// Splits a new-entry line at its first `=`.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    if !ENTRY_PATTERN.is_match(line) {
        return None;
    }
    line.split_once('=')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Vec<RawEntry>, SettingsError> {
        parse_lines(text.lines(), Path::new("test.properties"))
    }

    fn pairs(entries: &[RawEntry]) -> Vec<(&str, &str)> {
        entries
            .iter()
            .map(|e| (e.name.as_str(), e.value.as_str()))
            .collect()
    }

    #[test]
    fn test_simple_entries_in_order() {
        let entries = parse("b=2\na=1\nc=3").unwrap();
        assert_eq!(pairs(&entries), vec![("b", "2"), ("a", "1"), ("c", "3")]);
    }

    #[test]
    fn test_comments_ignored() {
        let entries = parse("# header\na=1\n   # indented comment\nb=2").unwrap();
        assert_eq!(pairs(&entries), vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_equals_in_value() {
        let entries = parse("dsn=dsn=test;user=me").unwrap();
        assert_eq!(pairs(&entries), vec![("dsn", "dsn=test;user=me")]);
    }

    #[test]
    fn test_hash_inside_value_is_kept() {
        let entries = parse("colors.one=#FF0000").unwrap();
        assert_eq!(pairs(&entries), vec![("colors.one", "#FF0000")]);
    }

    #[test]
    fn test_value_is_not_trimmed() {
        let entries = parse("name = value  ").unwrap();
        assert_eq!(pairs(&entries), vec![("name", " value  ")]);
    }

    #[test]
    fn test_multi_line_value() {
        let entries = parse("q=Select a,b\n   from t\n   where x=1\nnext=2").unwrap();
        assert_eq!(
            pairs(&entries),
            vec![("q", "Select a,b from t where x=1"), ("next", "2")]
        );
    }

    #[test]
    fn test_tab_indented_continuation() {
        let entries = parse("q=Select a\n\tfrom t").unwrap();
        assert_eq!(pairs(&entries), vec![("q", "Select a from t")]);
    }

    #[test]
    fn test_comment_inside_multi_line_value() {
        let entries = parse("q=Select a\n# skipped\n   from t").unwrap();
        assert_eq!(pairs(&entries), vec![("q", "Select a from t")]);
    }

    #[test]
    fn test_blank_line_closes_entry() {
        let entries = parse("q=Select a\n\n   from t").unwrap();
        assert_eq!(pairs(&entries), vec![("q", "Select a")]);
    }

    #[test]
    fn test_shallow_indent_is_not_a_continuation() {
        let entries = parse("q=Select a\n  from t\nnext=1").unwrap();
        assert_eq!(pairs(&entries), vec![("q", "Select a"), ("next", "1")]);
    }

    #[test]
    fn test_orphan_continuation_ignored() {
        let entries = parse("   floating text\na=1").unwrap();
        assert_eq!(pairs(&entries), vec![("a", "1")]);
    }

    #[test]
    fn test_blank_value_is_not_an_entry() {
        let entries = parse("empty=\nspaces=   \na=1").unwrap();
        assert_eq!(pairs(&entries), vec![("a", "1")]);
    }

    #[test]
    fn test_duplicate_key() {
        let result = parse("x=1\ny=2\nx=1");
        match result {
            Err(SettingsError::DuplicateKey { path, name }) => {
                assert_eq!(path, Path::new("test.properties"));
                assert_eq!(name, "x");
            }
            other => panic!("expected DuplicateKey, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_via_uncommented_line() {
        let result = parse("x=1\n# x=2\nx=3");
        assert!(matches!(result, Err(SettingsError::DuplicateKey { .. })));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
    }
}
