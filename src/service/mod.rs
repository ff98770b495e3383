// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the translator façade.
//!
//! The façade binds one resource, runs one parse or dump through the engines in the
//! adapters layer, and releases the resource on every exit path.

pub mod translator;

// Re-export commonly used types
pub use translator::{dump_to_string, parse_str, YamlTranslator};
