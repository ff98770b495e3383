// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML dump engine.
//!
//! Writes the document model through `serde_yaml`'s serializer. Mapping entries are
//! written in iteration order, so a mapping that preserves order is dumped in that
//! order. Scalar style (plain or quoted) and layout are chosen by the serializer,
//! which quotes any string the parser would otherwise read as a different type.

use crate::adapters::error_translation;
use crate::domain::{Mapping, Result};
use crate::ports::DocumentEmitter;
use std::io::Write;

/// Block-style YAML emitter backed by `serde_yaml`.
///
/// # Examples
///
/// ```rust
/// use yaml_translator::adapters::YamlEmitter;
/// use yaml_translator::domain::Mapping;
/// use yaml_translator::ports::DocumentEmitter;
///
/// let mut server = Mapping::new();
/// server.insert("ListenPort", 7001i64);
/// let mut root = Mapping::new();
/// root.insert("AdminServer", server);
///
/// let mut buffer = Vec::new();
/// YamlEmitter::new().emit_document("out.yaml", &root, &mut buffer).unwrap();
/// assert_eq!(buffer, b"AdminServer:\n  ListenPort: 7001\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlEmitter;

impl YamlEmitter {
    /// Creates a new YAML emitter.
    pub fn new() -> Self {
        YamlEmitter
    }
}

impl DocumentEmitter for YamlEmitter {
    fn emit_document<W: Write + ?Sized>(&self, name: &str, root: &Mapping, output: &mut W) -> Result<()> {
        serde_yaml::to_writer(&mut *output, root).map_err(|e| error_translation::emit_failure(name, e))
    }
}
