// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests generate arbitrary documents and strings and verify that dumping and
//! parsing them again gives back an equal document.

use proptest::prelude::*;
use yaml_translator::domain::{Mapping, Node};
use yaml_translator::service::{dump_to_string, parse_str};

fn leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        Just(Node::null()),
        any::<bool>().prop_map(Node::from),
        any::<i64>().prop_map(Node::from),
        prop::num::f64::NORMAL.prop_map(Node::from),
        "[ -~é]{0,12}".prop_map(Node::from),
    ]
}

fn mapping_of(values: impl Strategy<Value = Node>) -> impl Strategy<Value = Mapping> {
    prop::collection::vec(("[ -~é]{0,8}", values), 0..6)
        .prop_map(|entries| entries.into_iter().collect::<Mapping>())
}

fn node() -> impl Strategy<Value = Node> {
    leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Node::from),
            mapping_of(inner).prop_map(Node::from),
        ]
    })
}

// Test that any document survives a dump and a parse unchanged
proptest! {
    #[test]
    fn test_document_round_trip(root in mapping_of(node())) {
        let text = dump_to_string("generated.yaml", &root).unwrap();
        let parsed = parse_str("generated.yaml", &text, true).unwrap();
        prop_assert_eq!(parsed, root, "dumped text:\n{}", text);
    }
}

// Test that every string value reads back as the identical string
proptest! {
    #[test]
    fn test_string_values_keep_their_type(s in "\\PC{0,24}") {
        let mut root = Mapping::new();
        root.insert("value", s.clone());
        let text = dump_to_string("strings.yaml", &root).unwrap();
        let parsed = parse_str("strings.yaml", &text, true).unwrap();
        prop_assert_eq!(parsed.get("value").and_then(Node::as_str), Some(s.as_str()));
    }
}

// Test that parsing keeps the order keys were written in
proptest! {
    #[test]
    fn test_key_order_is_preserved(keys in prop::collection::hash_set("[a-z]{1,6}", 1..12)) {
        let keys: Vec<String> = keys.into_iter().collect();
        let text: String = keys
            .iter()
            .enumerate()
            .map(|(i, k)| format!("'{}': {}\n", k, i))
            .collect();
        let root = parse_str("order.yaml", &text, true).unwrap();
        prop_assert_eq!(root.keys().collect::<Vec<_>>(), keys.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
