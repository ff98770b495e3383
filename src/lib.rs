// SPDX-License-Identifier: MIT OR Apache-2.0

//! A YAML translator built around an order-preserving document model.
//!
//! The crate reads a YAML document from an input resource into a tree of mappings,
//! sequences and scalars, and writes any serializable data back out as YAML. Each
//! translator is bound to exactly one resource in one direction, runs one operation,
//! and always releases its resource afterwards.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: The document model (`Node`, `Mapping`, `Scalar`), options and errors
//! - **Ports**: Trait definitions for resources and engines (`InputSource`, `OutputSink`, `DocumentParser`)
//! - **Adapters**: The serde_yaml parse engine, the serde_yaml-backed emitter and resources over readers and writers
//! - **Service**: The `YamlTranslator` façade that ties a resource to an engine
//!
//! # Features
//!
//! - **Order Preservation**: Parsed mappings can keep their source order, and dumped
//!   mappings are always written in iteration order
//! - **Strict Parsing**: Duplicate keys and non-mapping roots are errors with a line and column
//! - **Cycle Detection**: Self-containing `Shared` structures fail to dump instead of recursing
//! - **Guaranteed Release**: The bound resource is closed exactly once, success or failure
//!
//! # Quick Start
//!
//! ```rust
//! use yaml_translator::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let text = "topology:\n  Name: base_domain\n  AdminServerName: admin\n";
//! let mut reader = YamlTranslator::reader("model.yaml", ReaderSource::new(text.as_bytes()), true);
//! let root = reader.parse()?;
//!
//! let topology = root.get("topology").and_then(Node::as_mapping).unwrap();
//! assert_eq!(topology.keys().collect::<Vec<_>>(), vec!["Name", "AdminServerName"]);
//!
//! let mut buffer = Vec::new();
//! YamlTranslator::writer("model-copy.yaml", WriterSink::new(&mut buffer)).dump(&root)?;
//! assert_eq!(String::from_utf8(buffer).unwrap(), text);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{ReaderSource, WriterSink};
    pub use crate::domain::{
        Direction, Mapping, Node, Position, Result, Scalar, Shared, TranslatorOptions, YamlError,
    };
    pub use crate::ports::{InputSource, OutputSink, Release};
    pub use crate::service::{dump_to_string, parse_str, YamlTranslator};
}
