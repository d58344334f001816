//! Template objects.

use serde_yaml::Value;

use crate::document::Node;
use crate::kind::Kind;

/// One declared template unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub api_version: String,
    pub kind: Kind,
    /// Null when the document had no metadata.
    pub metadata: Node,
    /// Kind-specific body. Null when absent.
    pub spec: Node,
}

impl Object {
    /// Build an object from one parsed document.
    ///
    /// `kind` is required; a missing `apiVersion` is empty; keys other than
    /// the four known ones are dropped.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let Value::Mapping(mut map) = value else {
            return Err("document is not a mapping".to_string());
        };

        let api_version = match map.remove("apiVersion") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(_) => return Err("apiVersion is not a string".to_string()),
        };

        let kind = match map.remove("kind") {
            Some(Value::String(s)) if !s.is_empty() => Kind::from(s),
            Some(_) => return Err("kind is not a non-empty string".to_string()),
            None => return Err("missing kind".to_string()),
        };

        let metadata = match map.remove("metadata") {
            Some(value) => Node::from_value(value)?,
            None => Node::null(),
        };
        let spec = match map.remove("spec") {
            Some(value) => Node::from_value(value)?,
            None => Node::null(),
        };

        Ok(Self {
            api_version,
            kind,
            metadata,
            spec,
        })
    }

    /// The object as a plain YAML value, in canonical key order.
    pub fn to_value(&self) -> Value {
        let mut map = serde_yaml::Mapping::new();
        map.insert("apiVersion".into(), self.api_version.clone().into());
        map.insert("kind".into(), self.kind.as_str().into());
        if !self.metadata.is_null() {
            map.insert("metadata".into(), self.metadata.to_value());
        }
        if !self.spec.is_null() {
            map.insert("spec".into(), self.spec.to_value());
        }
        Value::Mapping(map)
    }
}
