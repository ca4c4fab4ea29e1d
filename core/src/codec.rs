//! Conversion between `Node` trees and the wire JSON shape.
//!
//! # Design
//! On the wire a text node is a bare JSON string and an element is an object
//! `{ "tag", "attrs"?, "children"? }`. Encoding omits empty `attrs` and
//! `children` and drops children that encode to nothing (empty text), so an
//! empty container and an absent field read back the same way.
//!
//! `Node` implements `Serialize`/`Deserialize` in the same shape but keeps
//! empty text as `""`, so a serialized tree reads back unchanged. Request
//! payloads go through `serialize_nodes` instead, which filters like
//! `nodes_to_wire`.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, TelegraphError};
use crate::node::{Element, Node};

/// Encode one node. Empty text encodes to nothing.
pub fn to_wire(node: &Node) -> Option<Value> {
    encode(node, false)
}

/// Encode a sequence of nodes, skipping those that encode to nothing.
pub fn nodes_to_wire(nodes: &[Node]) -> Vec<Value> {
    nodes.iter().filter_map(to_wire).collect()
}

fn encode(node: &Node, keep_empty_text: bool) -> Option<Value> {
    match node {
        Node::Text(value) if value.is_empty() && !keep_empty_text => None,
        Node::Text(value) => Some(Value::String(value.clone())),
        Node::Element(element) => Some(element_to_wire(element, keep_empty_text)),
    }
}

fn element_to_wire(element: &Element, keep_empty_text: bool) -> Value {
    let mut object = Map::new();
    object.insert("tag".to_string(), Value::String(element.tag.clone()));
    if !element.attrs.is_empty() {
        let attrs = element
            .attrs
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        object.insert("attrs".to_string(), Value::Object(attrs));
    }
    let children: Vec<Value> = element
        .children
        .iter()
        .filter_map(|child| encode(child, keep_empty_text))
        .collect();
    if !children.is_empty() {
        object.insert("children".to_string(), Value::Array(children));
    }
    Value::Object(object)
}

/// Decode one wire value: a string becomes `Text`, an object an `Element`.
pub fn from_wire(value: &Value) -> Result<Node> {
    match value {
        Value::String(text) => Ok(Node::Text(text.clone())),
        Value::Object(object) => element_from_wire(object).map(Node::Element),
        other => Err(TelegraphError::Deserialization(format!(
            "content node must be a string or an object, got {}",
            kind_of(other)
        ))),
    }
}

/// Decode a content array.
pub fn nodes_from_wire(value: &Value) -> Result<Vec<Node>> {
    match value {
        Value::Array(items) => items.iter().map(from_wire).collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(TelegraphError::Deserialization(format!(
            "content must be an array, got {}",
            kind_of(other)
        ))),
    }
}

fn element_from_wire(object: &Map<String, Value>) -> Result<Element> {
    let tag = match object.get("tag") {
        Some(Value::String(tag)) => tag.clone(),
        _ => {
            return Err(TelegraphError::Deserialization(
                "content element is missing a string \"tag\"".to_string(),
            ))
        }
    };

    let attrs = match object.get("attrs") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(attrs)) => attrs
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => Ok((k.clone(), s.clone())),
                other => Err(TelegraphError::Deserialization(format!(
                    "attribute \"{k}\" must be a string, got {}",
                    kind_of(other)
                ))),
            })
            .collect::<Result<Vec<_>>>()?,
        Some(other) => {
            return Err(TelegraphError::Deserialization(format!(
                "\"attrs\" must be an object, got {}",
                kind_of(other)
            )))
        }
    };

    let children = match object.get("children") {
        None => Vec::new(),
        Some(children) => nodes_from_wire(children)?,
    };

    Ok(Element {
        tag,
        attrs,
        children,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        encode(self, true).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        from_wire(&value).map_err(de::Error::custom)
    }
}

/// `serialize_with` helper for content fields: encodes like `nodes_to_wire`.
pub fn serialize_nodes<S: Serializer>(
    nodes: &[Node],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let encoded = nodes_to_wire(nodes);
    let mut seq = serializer.serialize_seq(Some(encoded.len()))?;
    for value in &encoded {
        seq.serialize_element(value)?;
    }
    seq.end()
}
