//! One-level lookups in a mapping node.
//!
//! [`locate`] never decides whether an absent key is a problem; it only
//! reports absence. Callers pick: [`require`] turns absence into
//! [`Error::MissingKey`], while collection lookups treat it as empty.

use crate::document::{Node, NodePath};
use crate::error::{Error, Result};

/// Find the value stored under `key` in a mapping node.
///
/// Only the immediate entries are scanned, and only string keys match.
/// Anything that is not a mapping has no children.
pub fn locate<'a>(node: &'a Node, key: &str) -> Option<&'a Node> {
    match node {
        Node::Mapping(entries) => entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v),
        _ => None,
    }
}

/// Mutable variant of [`locate`].
pub fn locate_mut<'a>(node: &'a mut Node, key: &str) -> Option<&'a mut Node> {
    match node {
        Node::Mapping(entries) => entries
            .iter_mut()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v),
        _ => None,
    }
}

/// Like [`locate`], but a missing key is an error. `at` names the node
/// being searched.
pub fn require<'a>(node: &'a Node, key: &str, at: &NodePath) -> Result<&'a Node> {
    locate(node, key).ok_or_else(|| Error::MissingKey {
        key: key.to_string(),
        context: at.to_string(),
    })
}

/// A required key whose value must be a string, number or bool.
pub fn require_text(node: &Node, key: &str, at: &NodePath) -> Result<String> {
    require(node, key, at)?
        .as_scalar()
        .and_then(|s| s.to_text())
        .ok_or_else(|| Error::decode(at.key(key).to_string(), "expected a string value"))
}
