// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document parser trait definition.
//!
//! This module defines the `DocumentParser` trait, the seam between the translator
//! and the engine that turns YAML text into the document model.

use crate::domain::{Mapping, Result};

/// A trait for turning YAML text into a document.
///
/// Implementations must reject malformed text, duplicate keys within one mapping,
/// and documents whose root is not a mapping, each with a `ParseFailure` that
/// carries `name` and a position.
///
/// # Examples
///
/// ```rust
/// use yaml_translator::domain::{Mapping, Result};
/// use yaml_translator::ports::DocumentParser;
///
/// struct EmptyParser;
///
/// impl DocumentParser for EmptyParser {
///     fn parse_document(&self, _name: &str, _content: &str) -> Result<Mapping> {
///         Ok(Mapping::new())
///     }
/// }
///
/// let root = EmptyParser.parse_document("empty.yaml", "").unwrap();
/// assert!(root.is_empty());
/// ```
pub trait DocumentParser {
    /// Parses a complete document.
    ///
    /// # Arguments
    ///
    /// * `name` - Diagnostic name used in errors only
    /// * `content` - The full YAML text
    ///
    /// # Returns
    ///
    /// * `Ok(Mapping)` - The root mapping of the document
    /// * `Err(YamlError::ParseFailure)` - The text could not be turned into a document
    fn parse_document(&self, name: &str, content: &str) -> Result<Mapping>;
}
