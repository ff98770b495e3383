// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of caller data into the document model.
//!
//! This is the first half of the dump engine: a serde `Serializer` whose output is a
//! [`Node`]. It validates what YAML configuration documents can hold (string
//! representable keys, no byte arrays, no duplicate keys after stringification) and
//! tracks every [`Shared`](crate::domain::Shared) structure on the active path so a
//! structure that contains itself fails instead of recursing forever.

use crate::domain::shared::SHARED_TOKEN;
use crate::domain::{Mapping, Node};
use serde::ser::{self, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A failure while converting caller data, with the path of the offending value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpError {
    path: Option<String>,
    message: String,
}

impl DumpError {
    /// The structural path of the offending value, `$` for the root.
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or("$")
    }

    /// The human-readable cause.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attaches the current path unless a deeper frame already did.
    fn or_at(mut self, tracker: &PathTracker) -> Self {
        if self.path.is_none() {
            self.path = Some(tracker.render());
        }
        self
    }
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.path())
    }
}

impl std::error::Error for DumpError {}

impl ser::Error for DumpError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DumpError {
            path: None,
            message: msg.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Key(String),
    Index(usize),
}

/// The path from the root to the value being serialized, and the identities of the
/// shared structures entered along it.
#[derive(Debug, Default)]
struct PathTracker {
    segments: Vec<Segment>,
    active: HashSet<usize>,
}

impl PathTracker {
    fn render(&self) -> String {
        let mut path = String::from("$");
        for segment in &self.segments {
            match segment {
                Segment::Index(index) => path.push_str(&format!("[{}]", index)),
                Segment::Key(key)
                    if !key.is_empty()
                        && key
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') =>
                {
                    path.push('.');
                    path.push_str(key);
                }
                Segment::Key(key) => path.push_str(&format!("[{:?}]", key)),
            }
        }
        path
    }

    fn fail(&self, message: impl Into<String>) -> DumpError {
        DumpError {
            path: Some(self.render()),
            message: message.into(),
        }
    }
}

/// Converts any serializable value into a document node.
///
/// # Examples
///
/// ```
/// use yaml_translator::adapters::node_serializer::to_node;
/// use indexmap::IndexMap;
///
/// let data = IndexMap::from([("Name", "base_domain")]);
/// let node = to_node(&data).unwrap();
/// assert_eq!(node.as_mapping().unwrap().get("Name").unwrap().as_str(), Some("base_domain"));
/// ```
pub fn to_node<T: Serialize + ?Sized>(value: &T) -> Result<Node, DumpError> {
    let mut tracker = PathTracker::default();
    value.serialize(NodeSerializer {
        tracker: &mut tracker,
    })
}

fn serialize_child<T: Serialize + ?Sized>(
    tracker: &mut PathTracker,
    segments: &[Segment],
    value: &T,
) -> Result<Node, DumpError> {
    tracker.segments.extend_from_slice(segments);
    let result = match value.serialize(NodeSerializer {
        tracker: &mut *tracker,
    }) {
        Ok(node) => Ok(node),
        Err(err) => Err(err.or_at(tracker)),
    };
    let depth = tracker.segments.len() - segments.len();
    tracker.segments.truncate(depth);
    result
}

fn serialize_key<T: Serialize + ?Sized>(tracker: &mut PathTracker, key: &T) -> Result<String, DumpError> {
    let node = key.serialize(NodeSerializer {
        tracker: &mut *tracker,
    })?;
    match node {
        Node::Scalar(scalar) => scalar
            .to_key()
            .ok_or_else(|| tracker.fail("null mapping keys cannot be written")),
        other => Err(tracker.fail(format!(
            "mapping keys must be strings, numbers or booleans, found a {}",
            other.kind()
        ))),
    }
}

fn segments_for(variant: Option<&'static str>, last: Segment) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(2);
    if let Some(variant) = variant {
        segments.push(Segment::Key(variant.to_string()));
    }
    segments.push(last);
    segments
}

/// Wraps the content of an enum variant as `{variant: content}`.
fn tagged(variant: Option<&'static str>, node: Node) -> Node {
    match variant {
        Some(variant) => {
            let mut map = Mapping::new();
            map.insert(variant, node);
            Node::Mapping(map)
        }
        None => node,
    }
}

struct NodeSerializer<'t> {
    tracker: &'t mut PathTracker,
}

impl<'t> ser::Serializer for NodeSerializer<'t> {
    type Ok = Node;
    type Error = DumpError;
    type SerializeSeq = SequenceBuilder<'t>;
    type SerializeTuple = SequenceBuilder<'t>;
    type SerializeTupleStruct = SequenceBuilder<'t>;
    type SerializeTupleVariant = SequenceBuilder<'t>;
    type SerializeMap = MappingBuilder<'t>;
    type SerializeStruct = MappingBuilder<'t>;
    type SerializeStructVariant = MappingBuilder<'t>;

    fn serialize_bool(self, v: bool) -> Result<Node, DumpError> {
        Ok(Node::from(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node, DumpError> {
        Ok(Node::from(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Node, DumpError> {
        Ok(Node::from(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Node, DumpError> {
        Ok(Node::from(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Node, DumpError> {
        Ok(Node::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Node, DumpError> {
        if let Ok(i) = i64::try_from(v) {
            Ok(Node::from(i))
        } else if let Ok(u) = u64::try_from(v) {
            Ok(Node::from(u))
        } else {
            Err(self.tracker.fail(format!("integer {} is out of range", v)))
        }
    }

    fn serialize_u8(self, v: u8) -> Result<Node, DumpError> {
        Ok(Node::from(u64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Node, DumpError> {
        Ok(Node::from(u64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Node, DumpError> {
        Ok(Node::from(u64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Node, DumpError> {
        Ok(Node::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Node, DumpError> {
        match u64::try_from(v) {
            Ok(u) => Ok(Node::from(u)),
            Err(_) => Err(self.tracker.fail(format!("integer {} is out of range", v))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Node, DumpError> {
        Ok(Node::from(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Node, DumpError> {
        Ok(Node::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Node, DumpError> {
        Ok(Node::from(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Node, DumpError> {
        Ok(Node::from(v))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Node, DumpError> {
        Err(self.tracker.fail("byte arrays are not supported"))
    }

    fn serialize_none(self) -> Result<Node, DumpError> {
        Ok(Node::null())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Node, DumpError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node, DumpError> {
        Ok(Node::null())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node, DumpError> {
        Ok(Node::null())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node, DumpError> {
        Ok(Node::from(variant))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Node, DumpError> {
        if name != SHARED_TOKEN {
            return value.serialize(self);
        }

        let identity = value as *const T as *const () as usize;
        if !self.tracker.active.insert(identity) {
            return Err(self
                .tracker
                .fail("cyclic reference: structure contains itself"));
        }
        let result = value.serialize(NodeSerializer {
            tracker: &mut *self.tracker,
        });
        self.tracker.active.remove(&identity);
        result
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node, DumpError> {
        let node = serialize_child(self.tracker, &[Segment::Key(variant.to_string())], value)?;
        Ok(tagged(Some(variant), node))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SequenceBuilder<'t>, DumpError> {
        Ok(SequenceBuilder {
            tracker: self.tracker,
            variant: None,
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SequenceBuilder<'t>, DumpError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SequenceBuilder<'t>, DumpError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SequenceBuilder<'t>, DumpError> {
        Ok(SequenceBuilder {
            tracker: self.tracker,
            variant: Some(variant),
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MappingBuilder<'t>, DumpError> {
        Ok(MappingBuilder {
            tracker: self.tracker,
            variant: None,
            map: Mapping::new(),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<MappingBuilder<'t>, DumpError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<MappingBuilder<'t>, DumpError> {
        Ok(MappingBuilder {
            tracker: self.tracker,
            variant: Some(variant),
            map: Mapping::new(),
            pending_key: None,
        })
    }
}

struct SequenceBuilder<'t> {
    tracker: &'t mut PathTracker,
    variant: Option<&'static str>,
    items: Vec<Node>,
}

impl SequenceBuilder<'_> {
    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        let segments = segments_for(self.variant, Segment::Index(self.items.len()));
        let node = serialize_child(self.tracker, &segments, value)?;
        self.items.push(node);
        Ok(())
    }

    fn finish(self) -> Node {
        tagged(self.variant, Node::Sequence(self.items))
    }
}

impl ser::SerializeSeq for SequenceBuilder<'_> {
    type Ok = Node;
    type Error = DumpError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.push(value)
    }

    fn end(self) -> Result<Node, DumpError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SequenceBuilder<'_> {
    type Ok = Node;
    type Error = DumpError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.push(value)
    }

    fn end(self) -> Result<Node, DumpError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SequenceBuilder<'_> {
    type Ok = Node;
    type Error = DumpError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.push(value)
    }

    fn end(self) -> Result<Node, DumpError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SequenceBuilder<'_> {
    type Ok = Node;
    type Error = DumpError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.push(value)
    }

    fn end(self) -> Result<Node, DumpError> {
        Ok(self.finish())
    }
}

struct MappingBuilder<'t> {
    tracker: &'t mut PathTracker,
    variant: Option<&'static str>,
    map: Mapping,
    pending_key: Option<String>,
}

impl MappingBuilder<'_> {
    fn accept_key(&mut self, key: String) -> Result<(), DumpError> {
        if self.map.contains_key(&key) {
            let segments = segments_for(self.variant, Segment::Key(key.clone()));
            self.tracker.segments.extend_from_slice(&segments);
            let err = self.tracker.fail(format!("duplicate mapping key '{}'", key));
            let depth = self.tracker.segments.len() - segments.len();
            self.tracker.segments.truncate(depth);
            return Err(err);
        }
        self.pending_key = Some(key);
        Ok(())
    }

    fn accept_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        let key = match self.pending_key.take() {
            Some(key) => key,
            None => return Err(self.tracker.fail("mapping value serialized before its key")),
        };
        let segments = segments_for(self.variant, Segment::Key(key.clone()));
        let node = serialize_child(self.tracker, &segments, value)?;
        self.map.insert(key, node);
        Ok(())
    }

    fn finish(self) -> Node {
        tagged(self.variant, Node::Mapping(self.map))
    }
}

impl ser::SerializeMap for MappingBuilder<'_> {
    type Ok = Node;
    type Error = DumpError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), DumpError> {
        let key = serialize_key(self.tracker, key)?;
        self.accept_key(key)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.accept_value(value)
    }

    fn end(self) -> Result<Node, DumpError> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for MappingBuilder<'_> {
    type Ok = Node;
    type Error = DumpError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), DumpError> {
        self.accept_key(key.to_string())?;
        self.accept_value(value)
    }

    fn end(self) -> Result<Node, DumpError> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for MappingBuilder<'_> {
    type Ok = Node;
    type Error = DumpError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), DumpError> {
        self.accept_key(key.to_string())?;
        self.accept_value(value)
    }

    fn end(self) -> Result<Node, DumpError> {
        Ok(self.finish())
    }
}
