// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the document model and error taxonomy.
//!
//! This module is independent of the YAML grammar library and of any I/O. It defines
//! the types that flow in and out of the translator.

pub mod errors;
pub mod node;
pub mod options;
pub mod shared;

// Re-export commonly used types
pub use errors::{Direction, Position, ResourceReleaseWarning, Result, YamlError};
pub use node::{Mapping, Node, Number, Scalar};
pub use options::TranslatorOptions;
pub use shared::Shared;
