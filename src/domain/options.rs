// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translator options.
//!
//! Options are plain data so a host tool can embed them in its own configuration
//! file and hand them to the translator at construction time.

use serde::{Deserialize, Serialize};

/// Maximum input size accepted by default (10MB).
/// Configuration documents are small; anything larger is almost certainly a mistake.
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

/// Options fixed for the lifetime of a translator.
///
/// # Examples
///
/// ```
/// use yaml_translator::domain::TranslatorOptions;
///
/// let options = TranslatorOptions::default()
///     .with_order_preserving(true)
///     .with_max_input_bytes(64 * 1024);
/// assert!(options.order_preserving);
/// assert_eq!(options.max_input_bytes, 65536);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorOptions {
    /// Whether parsed mappings promise source order. Read path only.
    pub order_preserving: bool,
    /// Inputs longer than this are rejected before parsing.
    pub max_input_bytes: u64,
}

impl TranslatorOptions {
    /// Sets the order-preservation flag.
    pub fn with_order_preserving(mut self, order_preserving: bool) -> Self {
        self.order_preserving = order_preserving;
        self
    }

    /// Sets the maximum input size.
    pub fn with_max_input_bytes(mut self, max_input_bytes: u64) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            order_preserving: false,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TranslatorOptions::default();
        assert!(!options.order_preserving);
        assert_eq!(options.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
    }

    #[test]
    fn test_partial_options_from_yaml() {
        let options: TranslatorOptions = serde_yaml::from_str("order_preserving: true\n").unwrap();
        assert!(options.order_preserving);
        assert_eq!(options.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
        assert_eq!(options, TranslatorOptions::default().with_order_preserving(true));
    }
}
