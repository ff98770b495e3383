// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML parse engine.
//!
//! Grammar work (scanning, block and flow structure, scalar styles, tag resolution)
//! is delegated to `serde_yaml`. This module drives it with a `DeserializeSeed` that
//! builds the document model directly, which lets it see every mapping key as it is
//! read: duplicates are rejected instead of overwritten and non-scalar keys are
//! refused.
//!
//! Tag resolution follows `serde_yaml` (the YAML 1.2 core schema): `~`, `null` and
//! empty values are null, `true`/`false` are booleans, and `yes`/`no`/`on`/`off`
//! remain strings.

use crate::adapters::error_translation;
use crate::domain::{Mapping, Node, Number, Result};
use crate::ports::DocumentParser;
use serde::de::{self, DeserializeSeed, Error as _, MapAccess, SeqAccess, Visitor};
use std::cell::RefCell;
use std::fmt;

/// YAML parser producing the document model.
///
/// # Examples
///
/// ```rust
/// use yaml_translator::adapters::YamlParser;
/// use yaml_translator::ports::DocumentParser;
///
/// let parser = YamlParser::with_order_preserving(true);
/// let root = parser.parse_document("inline", "b: 1\na: 2\n").unwrap();
/// assert_eq!(root.keys().collect::<Vec<_>>(), vec!["b", "a"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlParser {
    order_preserving: bool,
}

impl YamlParser {
    /// Creates a parser whose mappings make no ordering promise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given document-wide ordering policy.
    pub fn with_order_preserving(order_preserving: bool) -> Self {
        Self { order_preserving }
    }

    /// Returns true if parsed mappings promise source order.
    pub fn preserves_order(&self) -> bool {
        self.order_preserving
    }
}

impl DocumentParser for YamlParser {
    fn parse_document(&self, name: &str, content: &str) -> Result<Mapping> {
        if error_translation::is_blank_document(content) {
            return Ok(Mapping::with_order_preserving(self.order_preserving));
        }

        let state = ParseState {
            order_preserving: self.order_preserving,
            duplicate_key: RefCell::new(None),
        };
        let deserializer = serde_yaml::Deserializer::from_str(content);
        let root = NodeSeed { state: &state }
            .deserialize(deserializer)
            .map_err(|err| {
                let duplicate = state.duplicate_key.borrow();
                error_translation::grammar_failure(name, content, err, duplicate.as_deref())
            })?;

        match root {
            Node::Mapping(map) => Ok(map),
            other => Err(error_translation::parse_failure(
                name,
                error_translation::first_content_position(content),
                format!(
                    "unsupported document root type '{}', expected a mapping",
                    other.kind()
                ),
            )),
        }
    }
}

/// State shared by every seed of one parse.
struct ParseState {
    order_preserving: bool,
    duplicate_key: RefCell<Option<String>>,
}

#[derive(Clone, Copy)]
struct NodeSeed<'s> {
    state: &'s ParseState,
}

impl<'de> DeserializeSeed<'de> for NodeSeed<'_> {
    type Value = Node;

    fn deserialize<D: de::Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Node, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for NodeSeed<'_> {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a YAML scalar, sequence or mapping")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<Node, E> {
        match i64::try_from(v) {
            Ok(i) => Ok(Node::from(i)),
            Err(_) => Err(E::custom(format!("integer {} is out of range for a 64-bit number", v))),
        }
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<Node, E> {
        match u64::try_from(v) {
            Ok(u) => Ok(Node::from(u)),
            Err(_) => Err(E::custom(format!("integer {} is out of range for a 64-bit number", v))),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::null())
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::null())
    }

    fn visit_some<D: de::Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Node, D::Error> {
        self.deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> std::result::Result<Node, A::Error> {
        let mut items = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(item) = access.next_element_seed(self)? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Node, A::Error> {
        let mut map = Mapping::with_order_preserving(self.state.order_preserving);
        while let Some(key) = access.next_key_seed(KeySeed)? {
            if map.contains_key(&key) {
                let message = format!("duplicate mapping key '{}'", key);
                *self.state.duplicate_key.borrow_mut() = Some(key);
                return Err(A::Error::custom(message));
            }
            let value = access.next_value_seed(self)?;
            map.insert(key, value);
        }
        Ok(Node::Mapping(map))
    }

    fn visit_enum<A: de::EnumAccess<'de>>(self, _data: A) -> std::result::Result<Node, A::Error> {
        Err(A::Error::custom("custom tags are not supported"))
    }
}

/// Reads a mapping key as text.
///
/// Booleans and numbers are stringified from their resolved value; null and
/// collection keys are refused.
struct KeySeed;

impl<'de> DeserializeSeed<'de> for KeySeed {
    type Value = String;

    fn deserialize<D: de::Deserializer<'de>>(self, deserializer: D) -> std::result::Result<String, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for KeySeed {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string, number or boolean mapping key")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<String, E> {
        Ok(Number::from(v).to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<String, E> {
        Ok(Number::from(v).to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<String, E> {
        Ok(Number::from(v).to_string())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<String, E> {
        Ok(v)
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<String, E> {
        Err(E::custom("null mapping keys are not supported"))
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<String, E> {
        Err(E::custom("null mapping keys are not supported"))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _access: A) -> std::result::Result<String, A::Error> {
        Err(A::Error::custom("sequence mapping keys are not supported"))
    }

    fn visit_map<A: MapAccess<'de>>(self, _access: A) -> std::result::Result<String, A::Error> {
        Err(A::Error::custom("mapping keys that are mappings are not supported"))
    }

    fn visit_enum<A: de::EnumAccess<'de>>(self, _data: A) -> std::result::Result<String, A::Error> {
        Err(A::Error::custom("custom tags are not supported"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Position, YamlError};

    fn parse(content: &str) -> Result<Mapping> {
        YamlParser::with_order_preserving(true).parse_document("test.yaml", content)
    }

    #[test]
    fn test_parse_nested_document() {
        let root = parse(
            r#"
domainInfo:
  AdminUserName: weblogic
topology:
  Name: base_domain
  Server:
    AdminServer:
      ListenPort: 7001
"#,
        )
        .unwrap();

        let topology = root.get("topology").and_then(Node::as_mapping).unwrap();
        assert_eq!(topology.get("Name").and_then(Node::as_str), Some("base_domain"));
        let port = topology
            .get("Server")
            .and_then(Node::as_mapping)
            .and_then(|servers| servers.get("AdminServer"))
            .and_then(Node::as_mapping)
            .and_then(|server| server.get("ListenPort"))
            .and_then(Node::as_i64);
        assert_eq!(port, Some(7001));
    }

    #[test]
    fn test_scalar_resolution() {
        let root = parse(
            r#"
empty:
tilde: ~
null_word: null
yes_word: yes
flag: TRUE
count: -12
ratio: 0.5
quoted: "42"
"#,
        )
        .unwrap();

        assert!(root.get("empty").unwrap().is_null());
        assert!(root.get("tilde").unwrap().is_null());
        assert!(root.get("null_word").unwrap().is_null());
        assert_eq!(root.get("yes_word").and_then(Node::as_str), Some("yes"));
        assert_eq!(root.get("flag").and_then(Node::as_bool), Some(true));
        assert_eq!(root.get("count").and_then(Node::as_i64), Some(-12));
        assert_eq!(root.get("ratio").and_then(Node::as_f64), Some(0.5));
        assert_eq!(root.get("quoted").and_then(Node::as_str), Some("42"));
    }

    #[test]
    fn test_flow_forms() {
        let root = parse("servers: [ms1, ms2]\nlimits: {min: 1, max: 4}\n").unwrap();
        let servers = root.get("servers").and_then(Node::as_sequence).unwrap();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[1].as_str(), Some("ms2"));
        let limits = root.get("limits").and_then(Node::as_mapping).unwrap();
        assert_eq!(limits.keys().collect::<Vec<_>>(), vec!["min", "max"]);
    }

    #[test]
    fn test_order_flag_is_applied_recursively() {
        let root = YamlParser::new()
            .parse_document("test.yaml", "outer:\n  inner: 1\n")
            .unwrap();
        assert!(!root.preserves_order());
        let outer = root.get("outer").and_then(Node::as_mapping).unwrap();
        assert!(!outer.preserves_order());

        let root = parse("outer:\n  inner: 1\n").unwrap();
        assert!(root.preserves_order());
        assert!(root.get("outer").and_then(Node::as_mapping).unwrap().preserves_order());
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let err = parse("a: 1\na: 2\n").unwrap_err();
        match err {
            YamlError::ParseFailure {
                name,
                position,
                message,
                ..
            } => {
                assert_eq!(name, "test.yaml");
                assert!(message.contains("duplicate mapping key 'a'"));
                assert_eq!(position.line, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_nested_duplicate_key_is_rejected() {
        let err = parse("topology:\n  Name: one\n  Name: two\n").unwrap_err();
        assert!(err.to_string().contains("duplicate mapping key 'Name'"));
        assert_eq!(err.position().map(|p| p.line), Some(3));
    }

    #[test]
    fn test_same_key_in_sibling_mappings_is_allowed() {
        let root = parse("one:\n  name: x\ntwo:\n  name: y\n").unwrap();
        assert_eq!(root.len(), 2);
    }

    #[test]
    fn test_sequence_root_is_rejected() {
        let err = parse("- 1\n- 2\n").unwrap_err();
        assert!(err.to_string().contains("unsupported document root type 'sequence'"));
        assert_eq!(err.position(), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_scalar_root_is_rejected() {
        let err = parse("# comment\njust text\n").unwrap_err();
        assert!(err.to_string().contains("unsupported document root type 'string'"));
        assert_eq!(err.position(), Some(Position::new(2, 1)));
    }

    #[test]
    fn test_blank_document_is_empty_mapping() {
        let root = parse("# nothing here\n\n").unwrap();
        assert!(root.is_empty());
        assert!(root.preserves_order());
    }

    #[test]
    fn test_malformed_yaml_is_rejected() {
        let err = parse("invalid: yaml: content:").unwrap_err();
        assert!(matches!(err, YamlError::ParseFailure { .. }));
        assert_eq!(err.position().map(|p| p.line), Some(1));
    }

    #[test]
    fn test_non_string_scalar_keys_are_stringified() {
        let root = parse("1: one\ntrue: yes\n2.5: half\n").unwrap();
        assert_eq!(root.keys().collect::<Vec<_>>(), vec!["1", "true", "2.5"]);
    }

    #[test]
    fn test_integers_at_64_bit_bounds() {
        let root = parse("max: 18446744073709551615
min: -9223372036854775808
").unwrap();
        assert_eq!(root.get("max").and_then(Node::as_u64), Some(u64::MAX));
        assert_eq!(root.get("min").and_then(Node::as_i64), Some(i64::MIN));
    }

    #[test]
    fn test_integer_beyond_u64_is_rejected() {
        let err = parse("big: 18446744073709551616
").unwrap_err();
        assert!(matches!(err, YamlError::ParseFailure { .. }));
        assert!(err.to_string().contains("out of range"));
        assert_eq!(err.position().map(|p| p.line), Some(1));
    }

    #[test]
    fn test_integer_below_i64_is_rejected() {
        let err = parse("neg: -9223372036854775809
").unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert_eq!(err.position().map(|p| p.line), Some(1));
    }

    #[test]
    fn test_boolean_keys_use_their_literal() {
        let root = parse("false: off
True: on
").unwrap();
        assert_eq!(root.keys().collect::<Vec<_>>(), vec!["false", "true"]);
    }

    #[test]
    fn test_null_key_is_rejected() {
        let err = parse("~: value\n").unwrap_err();
        assert!(err.to_string().contains("null mapping keys"));
    }

    #[test]
    fn test_custom_tag_is_rejected() {
        let err = parse("value: !secret abc\n").unwrap_err();
        assert!(err.to_string().contains("custom tags are not supported"));
    }

    #[test]
    fn test_multiple_documents_are_rejected() {
        let err = parse("a: 1\n---\nb: 2\n").unwrap_err();
        assert!(matches!(err, YamlError::ParseFailure { .. }));
    }
}
