// SPDX-License-Identifier: MIT OR Apache-2.0

//! The in-memory document model.
//!
//! A parsed document is a tree of [`Node`]s rooted at a [`Mapping`]. Mappings keep
//! their entries in encounter order; whether callers may rely on that order is a
//! property fixed for the whole document when it is parsed.

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};
use std::fmt;

/// A YAML number as resolved by the grammar.
///
/// Integers are normalized so that non-negative values are always stored unsigned,
/// which keeps equality independent of how the value was produced. Two NaN floats
/// compare equal so that documents containing `.nan` survive a round trip.
///
/// # Examples
///
/// ```
/// use yaml_translator::domain::Number;
///
/// assert_eq!(Number::from(7i64), Number::from(7u64));
/// assert_eq!(Number::from(f64::INFINITY).to_string(), ".inf");
/// assert_eq!(Number::from(1.0).to_string(), "1.0");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Number {
    n: N,
}

#[derive(Clone, Copy, Debug)]
enum N {
    PosInt(u64),
    NegInt(i64),
    Float(f64),
}

impl Number {
    /// Returns the value as an `i64` if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self.n {
            N::PosInt(u) => i64::try_from(u).ok(),
            N::NegInt(i) => Some(i),
            N::Float(_) => None,
        }
    }

    /// Returns the value as a `u64` if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self.n {
            N::PosInt(u) => Some(u),
            _ => None,
        }
    }

    /// Returns the value as an `f64`, converting integers.
    pub fn as_f64(&self) -> f64 {
        match self.n {
            N::PosInt(u) => u as f64,
            N::NegInt(i) => i as f64,
            N::Float(f) => f,
        }
    }

    /// Returns true if the number was written as a float.
    pub fn is_float(&self) -> bool {
        matches!(self.n, N::Float(_))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.n, other.n) {
            (N::PosInt(a), N::PosInt(b)) => a == b,
            (N::NegInt(a), N::NegInt(b)) => a == b,
            (N::Float(a), N::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => false,
        }
    }
}

impl From<u64> for Number {
    fn from(u: u64) -> Self {
        Number { n: N::PosInt(u) }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        if i < 0 {
            Number { n: N::NegInt(i) }
        } else {
            Number {
                n: N::PosInt(i as u64),
            }
        }
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Number::from(i64::from(i))
    }
}

impl From<u32> for Number {
    fn from(u: u32) -> Self {
        Number::from(u64::from(u))
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number { n: N::Float(f) }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.n {
            N::PosInt(u) => write!(f, "{}", u),
            N::NegInt(i) => write!(f, "{}", i),
            N::Float(x) if x.is_nan() => f.write_str(".nan"),
            N::Float(x) if x.is_infinite() => {
                f.write_str(if x.is_sign_negative() { "-.inf" } else { ".inf" })
            }
            // Debug always keeps a '.' or an exponent, so the text reads back as a float.
            N::Float(x) => write!(f, "{:?}", x),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.n {
            N::PosInt(u) => serializer.serialize_u64(u),
            N::NegInt(i) => serializer.serialize_i64(i),
            N::Float(f) => serializer.serialize_f64(f),
        }
    }
}

/// A leaf value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// `~`, `null`, or an empty value
    Null,
    /// `true` or `false`
    Bool(bool),
    /// An integer or float
    Number(Number),
    /// Any other text, including quoted forms of the above
    String(String),
}

impl Scalar {
    /// Returns the text a scalar stands for when it is used as a mapping key.
    ///
    /// Null has no key form and returns `None`.
    pub fn to_key(&self) -> Option<String> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Number(n) => Some(n.to_string()),
            Scalar::String(s) => Some(s.clone()),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Number(n) => n.serialize(serializer),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

/// A node in the document tree.
///
/// # Examples
///
/// ```
/// use yaml_translator::domain::{Mapping, Node};
///
/// let mut server = Mapping::new();
/// server.insert("ListenPort", 7001i64);
/// server.insert("Enabled", true);
///
/// let node = Node::from(server);
/// let server = node.as_mapping().unwrap();
/// assert_eq!(server.get("ListenPort").and_then(Node::as_i64), Some(7001));
/// assert_eq!(server.get("Enabled").and_then(Node::as_bool), Some(true));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// A leaf value
    Scalar(Scalar),
    /// An ordered list of nodes
    Sequence(Vec<Node>),
    /// String-keyed entries
    Mapping(Mapping),
}

impl Node {
    /// Creates a null node.
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    /// A short name for the kind of node, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(Scalar::Null) => "null",
            Node::Scalar(Scalar::Bool(_)) => "boolean",
            Node::Scalar(Scalar::Number(_)) => "number",
            Node::Scalar(Scalar::String(_)) => "string",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }

    /// Returns true for a null scalar.
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    /// Returns the boolean value of a boolean scalar.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value of an integer scalar that fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Scalar(Scalar::Number(n)) => n.as_i64(),
            _ => None,
        }
    }

    /// Returns the value of an integer scalar that fits in a `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Node::Scalar(Scalar::Number(n)) => n.as_u64(),
            _ => None,
        }
    }

    /// Returns the value of a numeric scalar as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Scalar(Scalar::Number(n)) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// Returns the text of a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the items of a sequence.
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries of a mapping.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Converts the node into a mapping, returning the node unchanged otherwise.
    pub fn into_mapping(self) -> std::result::Result<Mapping, Node> {
        match self {
            Node::Mapping(map) => Ok(map),
            other => Err(other),
        }
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

impl From<Number> for Node {
    fn from(n: Number) -> Self {
        Node::Scalar(Scalar::Number(n))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Node::from(Number::from(i))
    }
}

impl From<u64> for Node {
    fn from(u: u64) -> Self {
        Node::from(Number::from(u))
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        Node::from(Number::from(f))
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::String(s))
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Node::Mapping(map)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Scalar(scalar) => scalar.serialize(serializer),
            Node::Sequence(items) => serializer.collect_seq(items),
            Node::Mapping(map) => map.serialize(serializer),
        }
    }
}

/// A collection of uniquely keyed entries.
///
/// Entries are always stored in insertion order. The `order_preserving` flag records
/// whether that order is meaningful: two mappings that both preserve order are equal
/// only if their entries match position by position, otherwise equality ignores
/// order. Mappings built by callers preserve order.
///
/// # Examples
///
/// ```
/// use yaml_translator::domain::Mapping;
///
/// let mut map = Mapping::new();
/// map.insert("b", 1i64);
/// map.insert("a", 2i64);
/// assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
/// ```
#[derive(Clone, Debug)]
pub struct Mapping {
    entries: IndexMap<String, Node>,
    order_preserving: bool,
}

impl Mapping {
    /// Creates an empty, order-preserving mapping.
    pub fn new() -> Self {
        Self::with_order_preserving(true)
    }

    /// Creates an empty mapping with the given ordering policy.
    pub fn with_order_preserving(order_preserving: bool) -> Self {
        Self {
            entries: IndexMap::new(),
            order_preserving,
        }
    }

    /// Returns true if callers may rely on the iteration order.
    pub fn preserves_order(&self) -> bool {
        self.order_preserving
    }

    /// Inserts an entry, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns the value for a key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    /// Returns a mutable reference to the value for a key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    /// Removes an entry, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.shift_remove(key)
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over the values.
    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.entries.values()
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Node> {
        self.entries.iter()
    }
}

impl Default for Mapping {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        if self.order_preserving && other.order_preserving {
            self.entries.len() == other.entries.len()
                && self.entries.iter().zip(other.entries.iter()).all(|(a, b)| a == b)
        } else {
            self.entries == other.entries
        }
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a String, &'a Node);
    type IntoIter = indexmap::map::Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Node);
    type IntoIter = indexmap::map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.entries)
    }
}
