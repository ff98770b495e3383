// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document emitter trait definition.
//!
//! This module defines the `DocumentEmitter` trait, the seam between the translator
//! and the engine that writes the document model as YAML text.

use crate::domain::{Mapping, Result};
use std::io::Write;

/// A trait for writing a document as YAML text.
///
/// Emitters write mapping entries in iteration order and produce text that the
/// parser reads back to an equal document.
///
/// # Examples
///
/// ```rust
/// use std::io::Write;
/// use yaml_translator::domain::{Mapping, Result};
/// use yaml_translator::ports::DocumentEmitter;
///
/// struct KeysOnly;
///
/// impl DocumentEmitter for KeysOnly {
///     fn emit_document<W: Write + ?Sized>(&self, _name: &str, root: &Mapping, output: &mut W) -> Result<()> {
///         for key in root.keys() {
///             let _ = writeln!(output, "{}: null", key);
///         }
///         Ok(())
///     }
/// }
///
/// let root: Mapping = vec![("a", 1i64)].into_iter().collect();
/// let mut buffer = Vec::new();
/// KeysOnly.emit_document("keys.yaml", &root, &mut buffer).unwrap();
/// assert_eq!(buffer, b"a: null\n");
/// ```
pub trait DocumentEmitter {
    /// Writes the whole document rooted at `root` to `output`.
    ///
    /// # Arguments
    ///
    /// * `name` - Diagnostic name used in errors only
    /// * `root` - The root mapping of the document
    /// * `output` - Where the text goes
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The document was written
    /// * `Err(YamlError::DumpFailure)` - The text could not be produced or written
    fn emit_document<W: Write + ?Sized>(&self, name: &str, root: &Mapping, output: &mut W) -> Result<()>;
}
