// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the YAML translator.
//!
//! This module defines the single error type surfaced by `parse` and `dump`, the
//! position type attached to parse failures, and the warning recorded when a bound
//! resource cannot be released cleanly. All errors use `thiserror`.

use std::fmt;
use thiserror::Error;

/// The direction a translator was constructed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The translator reads YAML text from an input source.
    Read,
    /// The translator writes YAML text to an output sink.
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Read => write!(f, "reading"),
            Direction::Write => write!(f, "writing"),
        }
    }
}

/// A 1-based line/column location in the YAML input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Line number, starting at 1
    pub line: usize,
    /// Column number, starting at 1
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The first character of the input.
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The main error type for translator operations.
///
/// Every case carries the diagnostic name the translator was constructed with, so a
/// failure can be traced back to the offending file or stream without inspecting the
/// translator itself. The enum is `#[non_exhaustive]` to allow for future additions.
///
/// # Examples
///
/// ```
/// use yaml_translator::domain::errors::{Position, YamlError};
///
/// let error = YamlError::ParseFailure {
///     name: "model.yaml".to_string(),
///     position: Position::new(3, 5),
///     message: "duplicate mapping key 'topology'".to_string(),
///     source: None,
/// };
/// assert!(error.to_string().contains("model.yaml"));
/// assert!(error.to_string().contains("line 3, column 5"));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum YamlError {
    /// The input was not well-formed YAML, had a non-mapping root, or repeated a key.
    #[error("Failed to parse YAML from '{name}' at {position}: {message}")]
    ParseFailure {
        /// The diagnostic name of the input
        name: String,
        /// Where the problem was detected
        position: Position,
        /// Human-readable cause
        message: String,
        /// The underlying grammar or I/O error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The data could not be serialized or written.
    #[error("Failed to dump YAML to '{name}' at {path}: {message}")]
    DumpFailure {
        /// The diagnostic name of the output
        name: String,
        /// Structural path of the offending value, `$` for the document itself
        path: String,
        /// Human-readable cause
        message: String,
        /// The underlying I/O error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation does not match the direction the translator was built for.
    #[error("Translator '{name}' was constructed for {direction} and cannot {operation}")]
    WrongDirection {
        /// The diagnostic name of the translator
        name: String,
        /// The operation that was attempted
        operation: &'static str,
        /// The direction the translator was constructed for
        direction: Direction,
    },

    /// The translator already ran its single operation and released its resource.
    #[error("Translator '{name}' has already been consumed and cannot {operation} again")]
    AlreadyConsumed {
        /// The diagnostic name of the translator
        name: String,
        /// The operation that was attempted
        operation: &'static str,
    },
}

impl YamlError {
    /// Returns the diagnostic name carried by this error.
    pub fn name(&self) -> &str {
        match self {
            YamlError::ParseFailure { name, .. }
            | YamlError::DumpFailure { name, .. }
            | YamlError::WrongDirection { name, .. }
            | YamlError::AlreadyConsumed { name, .. } => name,
        }
    }

    /// Returns the input position for parse failures.
    pub fn position(&self) -> Option<Position> {
        match self {
            YamlError::ParseFailure { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// A bound resource could not be closed cleanly after the operation completed.
///
/// This is logged and kept on the translator; it never replaces the outcome of the
/// operation itself.
#[derive(Debug, Error)]
#[error("Failed to release {direction} resource for '{name}': {source}")]
pub struct ResourceReleaseWarning {
    /// The diagnostic name of the resource
    pub name: String,
    /// Whether the resource was an input or an output
    pub direction: Direction,
    /// The close error
    #[source]
    pub source: std::io::Error,
}

/// A specialized Result type for translator operations.
pub type Result<T> = std::result::Result<T, YamlError>;
