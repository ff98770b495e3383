// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation of grammar, serializer and I/O failures into [`YamlError`].
//!
//! Every error leaving the translator carries the diagnostic name it was constructed
//! with. Parse failures also carry a 1-based position: taken from the grammar when it
//! reports one, refined for duplicate keys to point at the repeated key, and derived
//! from the text itself for structural problems the grammar does not see.

use crate::adapters::node_serializer::DumpError;
use crate::domain::{Direction, Position, ResourceReleaseWarning, YamlError};
use std::io;

/// Path reported for failures that concern the document as a whole.
pub(crate) const DOCUMENT_PATH: &str = "$";

/// Builds a parse failure at a known position.
pub(crate) fn parse_failure(name: &str, position: Position, message: impl Into<String>) -> YamlError {
    YamlError::ParseFailure {
        name: name.to_string(),
        position,
        message: message.into(),
        source: None,
    }
}

/// Translates an error reported by the YAML grammar.
///
/// `duplicate_key` is set when the failure was a repeated mapping key; the grammar
/// reports where the mapping was being read, so the position is moved to the second
/// occurrence of the key when it can be found in the text.
pub(crate) fn grammar_failure(
    name: &str,
    content: &str,
    err: serde_yaml::Error,
    duplicate_key: Option<&str>,
) -> YamlError {
    let reported = err
        .location()
        .map(|location| Position::new(location.line(), location.column()));
    let position = match (duplicate_key, reported) {
        (Some(key), reported) => {
            let from_line = reported.map_or(1, |p| p.line);
            locate_repeated_key(content, key, from_line)
                .or(reported)
                .unwrap_or_else(Position::start)
        }
        (None, Some(position)) => position,
        (None, None) => end_position(content),
    };

    YamlError::ParseFailure {
        name: name.to_string(),
        position,
        message: describe(&err),
        source: Some(Box::new(err)),
    }
}

/// Translates a failure to read the bound input.
pub(crate) fn read_failure(name: &str, err: io::Error) -> YamlError {
    let message = match err.kind() {
        io::ErrorKind::InvalidData => "input is not valid UTF-8".to_string(),
        _ => format!("failed to read input: {}", err),
    };
    YamlError::ParseFailure {
        name: name.to_string(),
        position: Position::start(),
        message,
        source: Some(Box::new(err)),
    }
}

/// Translates a failure raised while turning caller data into a document.
pub(crate) fn dump_failure(name: &str, err: DumpError) -> YamlError {
    YamlError::DumpFailure {
        name: name.to_string(),
        path: err.path().to_string(),
        message: err.message().to_string(),
        source: None,
    }
}

/// Builds the failure for data whose top level is not a mapping.
pub(crate) fn root_failure(name: &str, kind: &str) -> YamlError {
    YamlError::DumpFailure {
        name: name.to_string(),
        path: DOCUMENT_PATH.to_string(),
        message: format!("document root must be a mapping, found a {}", kind),
        source: None,
    }
}

/// Translates a failure reported by the YAML serializer while writing the output.
pub(crate) fn emit_failure(name: &str, err: serde_yaml::Error) -> YamlError {
    YamlError::DumpFailure {
        name: name.to_string(),
        path: DOCUMENT_PATH.to_string(),
        message: format!("failed to write output: {}", err),
        source: Some(Box::new(err)),
    }
}

/// Translates a failure to write the bound output.
pub(crate) fn write_failure(name: &str, err: io::Error) -> YamlError {
    YamlError::DumpFailure {
        name: name.to_string(),
        path: DOCUMENT_PATH.to_string(),
        message: format!("failed to write output: {}", err),
        source: Some(Box::new(err)),
    }
}

/// Builds the warning recorded when a bound resource cannot be closed.
pub(crate) fn release_warning(name: &str, direction: Direction, err: io::Error) -> ResourceReleaseWarning {
    ResourceReleaseWarning {
        name: name.to_string(),
        direction,
        source: err,
    }
}

/// The grammar's message without the location suffix it appends.
fn describe(err: &serde_yaml::Error) -> String {
    let text = err.to_string();
    match err.location() {
        Some(location) => {
            let suffix = format!(" at line {} column {}", location.line(), location.column());
            match text.strip_suffix(&suffix) {
                Some(stripped) => stripped.to_string(),
                None => text,
            }
        }
        None => text,
    }
}

/// Returns true if the text holds no document content at all.
pub(crate) fn is_blank_document(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Position of the first line that carries document content.
pub(crate) fn first_content_position(content: &str) -> Position {
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.trim_end() == "---" {
            continue;
        }
        let column = line.chars().count() - trimmed.chars().count() + 1;
        return Position::new(index + 1, column);
    }
    Position::start()
}

/// Position just past the last character of the text.
pub(crate) fn end_position(content: &str) -> Position {
    let line = content.matches('\n').count() + 1;
    let last_line = content.rsplit('\n').next().unwrap_or("");
    Position::new(line, last_line.chars().count() + 1)
}

/// Finds the second block-style occurrence of `key` at the indentation of its first
/// occurrence, scanning from `from_line` and stopping when the mapping is left.
fn locate_repeated_key(content: &str, key: &str, from_line: usize) -> Option<Position> {
    let mut first_column: Option<usize> = None;

    for (index, line) in content.lines().enumerate().skip(from_line.saturating_sub(1)) {
        let Some((column, rest)) = entry_start(line) else {
            continue;
        };
        if let Some(expected) = first_column {
            if column < expected {
                return None;
            }
            if column == expected && starts_with_key(rest, key) {
                return Some(Position::new(index + 1, column));
            }
        } else if starts_with_key(rest, key) {
            first_column = Some(column);
        }
    }
    None
}

/// Column and text of the mapping entry a line starts, skipping `- ` markers.
fn entry_start(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start_matches(' ');
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let mut column = line.len() - trimmed.len() + 1;
    let mut rest = trimmed;
    while let Some(after) = rest.strip_prefix("- ") {
        let after_trimmed = after.trim_start_matches(' ');
        column += rest.len() - after_trimmed.len();
        rest = after_trimmed;
    }
    Some((column, rest))
}

fn starts_with_key(text: &str, key: &str) -> bool {
    let candidates = [
        key.to_string(),
        format!("'{}'", key),
        format!("\"{}\"", key),
    ];
    candidates.iter().any(|candidate| {
        text.strip_prefix(candidate.as_str())
            .map(|after| after.trim_start_matches(' '))
            .and_then(|after| after.strip_prefix(':'))
            .map_or(false, |after| after.is_empty() || after.starts_with(' '))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_documents() {
        assert!(is_blank_document(""));
        assert!(is_blank_document("\n   \n"));
        assert!(is_blank_document("# only a comment\n---\n"));
        assert!(!is_blank_document("a: 1\n"));
    }

    #[test]
    fn test_first_content_position_skips_comments() {
        let content = "# header\n\n  - 1\n";
        assert_eq!(first_content_position(content), Position::new(3, 3));
    }

    #[test]
    fn test_end_position() {
        assert_eq!(end_position(""), Position::new(1, 1));
        assert_eq!(end_position("a: 1\nb"), Position::new(2, 2));
        assert_eq!(end_position("a: 1\n"), Position::new(2, 1));
    }

    #[test]
    fn test_locate_repeated_top_level_key() {
        let content = "a: 1\nb: 2\na: 3\n";
        assert_eq!(locate_repeated_key(content, "a", 1), Some(Position::new(3, 1)));
    }

    #[test]
    fn test_locate_repeated_nested_key() {
        let content = "top:\n  name: x\n  port: 1\n  name: y\nother:\n  name: z\n";
        assert_eq!(locate_repeated_key(content, "name", 1), Some(Position::new(4, 3)));
    }

    #[test]
    fn test_locate_repeated_key_stops_at_mapping_end() {
        let content = "one:\n  name: x\ntwo:\n  name: y\n";
        assert_eq!(locate_repeated_key(content, "name", 1), None);
    }

    #[test]
    fn test_locate_repeated_key_in_sequence_item() {
        let content = "servers:\n  - name: a\n    name: b\n";
        assert_eq!(locate_repeated_key(content, "name", 1), Some(Position::new(3, 5)));
    }

    #[test]
    fn test_quoted_key_is_recognized() {
        assert!(starts_with_key("'a': 1", "a"));
        assert!(starts_with_key("\"a\" : 1", "a"));
        assert!(starts_with_key("a:", "a"));
        assert!(!starts_with_key("ab: 1", "a"));
        assert!(!starts_with_key("a:b", "a"));
    }

    #[test]
    fn test_read_failure_for_invalid_utf8() {
        let err = io::Error::new(io::ErrorKind::InvalidData, "bad bytes");
        let error = read_failure("input.yaml", err);
        assert!(error.to_string().contains("not valid UTF-8"));
        assert_eq!(error.position(), Some(Position::start()));
    }

    #[test]
    fn test_write_failure_points_at_document() {
        let err = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        match write_failure("out.yaml", err) {
            YamlError::DumpFailure { path, source, .. } => {
                assert_eq!(path, DOCUMENT_PATH);
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
