// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! between the translator and its collaborators: the resources it is bound to and
//! the engines that parse and emit YAML. These traits are implemented by adapters
//! in the adapters layer.

pub mod emitter;
pub mod parser;
pub mod resource;

// Re-export commonly used types
pub use emitter::DocumentEmitter;
pub use parser::DocumentParser;
pub use resource::{InputSource, OutputSink, Release};
