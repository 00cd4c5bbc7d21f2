//! Line-delimited set loading

use std::collections::BTreeSet;
use std::path::Path;

use super::VennError;
use crate::utils::{decode_bytes, looks_binary};

/// Read `path` into a set of its lines.
///
/// Lines end at `\n`, `\r\n`, a lone `\r` or any other Unicode line
/// boundary (see [`split_lines`]); a trailing terminator does not produce an
/// empty member but blank lines in the middle do. With `case_sensitive`
/// false every line is lower-cased before insertion.
pub fn read_set(path: &Path, case_sensitive: bool) -> Result<BTreeSet<String>, VennError> {
    let bytes = std::fs::read(path)
        .map_err(|source| VennError::ReadInput { path: path.to_path_buf(), source })?;

    if looks_binary(&bytes) {
        tracing::warn!("Input file looks binary: {}", path.display());
    }

    let decoded = decode_bytes(&bytes);
    if decoded.had_errors {
        tracing::warn!(
            "Input file {} contained invalid {} sequences; they were replaced",
            path.display(),
            decoded.encoding_name()
        );
    }

    let set = lines_to_set(&decoded.content, case_sensitive);
    tracing::debug!(
        path = %path.display(),
        encoding = %decoded.encoding_name(),
        items = set.len(),
        "loaded input set"
    );
    Ok(set)
}

pub fn lines_to_set(content: &str, case_sensitive: bool) -> BTreeSet<String> {
    split_lines(content)
        .map(|line| if case_sensitive { line.to_string() } else { line.to_lowercase() })
        .collect()
}

fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split on every line boundary, treating `\r\n` as one terminator.
pub fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.char_indices().find(|&(_, c)| is_line_boundary(c)) {
            Some((idx, c)) => {
                let line = &rest[..idx];
                let mut next = idx + c.len_utf8();
                if c == '\r' && rest[next..].starts_with('\n') {
                    next += 1;
                }
                rest = &rest[next..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn read_set_deduplicates_lines() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("a.txt");
        fs::write(&path, "apple\nbanana\napple\r\ncherry\n").expect("write");

        let set = read_set(&path, true).expect("set");
        let items: Vec<&str> = set.iter().map(String::as_str).collect();
        assert_eq!(items, vec!["apple", "banana", "cherry"]);
    }

    #[test]
    fn read_set_lowercases_when_case_insensitive() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("a.txt");
        fs::write(&path, "Apple\nAPPLE\nBanana").expect("write");

        assert_eq!(read_set(&path, true).expect("set").len(), 3);
        let folded = read_set(&path, false).expect("set");
        assert_eq!(folded.len(), 2);
        assert!(folded.contains("apple"));
        assert!(folded.contains("banana"));
    }

    #[test]
    fn blank_lines_are_members() {
        let set = lines_to_set("a\n\nb\n", true);
        assert_eq!(set.len(), 3);
        assert!(set.contains(""));
    }

    #[test]
    fn whitespace_is_significant() {
        let set = lines_to_set("a\na \n", true);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn lone_carriage_returns_end_lines() {
        let set = lines_to_set("a\rb\r", true);
        let items: Vec<&str> = set.iter().map(String::as_str).collect();
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn split_lines_handles_mixed_terminators() {
        let lines: Vec<&str> =
            split_lines("one\r\ntwo\rthree\nfour\u{0c}five\u{2028}six\u{85}").collect();
        assert_eq!(lines, vec!["one", "two", "three", "four", "five", "six"]);

        let blank: Vec<&str> = split_lines("a\r\n\r\nb").collect();
        assert_eq!(blank, vec!["a", "", "b"]);
        assert_eq!(split_lines("").count(), 0);
    }

    #[test]
    fn read_set_decodes_legacy_encoding() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("legacy.txt");
        fs::write(&path, b"caf\xe9 au lait\nr\xe9sum\xe9 d\xe9tail\nplain\n").expect("write");

        let set = read_set(&path, false).expect("set");
        assert_eq!(set.len(), 3);
        assert!(set.contains("café au lait"));
        assert!(set.contains("résumé détail"));
        assert!(set.contains("plain"));
    }

    #[test]
    fn empty_file_is_empty_set() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("empty.txt");
        fs::write(&path, "").expect("write");
        assert!(read_set(&path, true).expect("set").is_empty());
    }

    #[test]
    fn missing_file_names_the_path() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("missing.txt");
        let err = read_set(&path, true).expect_err("missing");
        assert!(err.to_string().contains("missing.txt"));
    }
}
