// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing the YAML engines and resource implementations.
//!
//! This module contains concrete implementations of the traits defined in the ports
//! layer: the parse engine (`DocumentParser`), the dump engine (`DocumentEmitter`)
//! and resources over readers, writers and files (`InputSource`, `OutputSink`).

pub(crate) mod error_translation;
pub mod node_serializer;
pub mod stream;
pub mod yaml_emitter;
pub mod yaml_parser;

// Re-export commonly used types
pub use node_serializer::{to_node, DumpError};
pub use stream::{ReaderSource, WriterSink};
pub use yaml_emitter::YamlEmitter;
pub use yaml_parser::YamlParser;
