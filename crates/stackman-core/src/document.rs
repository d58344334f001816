//! Generic document tree.
//!
//! Templates are only ever inspected at a handful of known positions, so
//! instead of a typed schema per kind the body of a template is kept as a
//! [`Node`] tree. The tree preserves key order and carries a [`RenderHint`]
//! on every scalar so that rewritten values serialise the way they were
//! intended.

use std::fmt;

use serde_yaml::Value;

use crate::locate::{locate, locate_mut};

/// How a scalar should be written out. Never changes the scalar's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderHint {
    /// Let the encoder pick; multi-line strings become literal blocks.
    #[default]
    Default,
    /// Keep the scalar on a single line, as used for `file://` references.
    Flow,
}

/// A scalar leaf: null, bool, number or string.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    value: Value,
    /// Serialisation hint.
    pub hint: RenderHint,
}

impl Scalar {
    fn new(value: Value) -> Self {
        Self {
            value,
            hint: RenderHint::Default,
        }
    }

    /// A string scalar with the default hint.
    pub fn string(text: impl Into<String>) -> Self {
        Self::new(Value::String(text.into()))
    }

    /// The raw value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The value if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// The textual form of a string, number or bool. Null has none.
    pub fn to_text(&self) -> Option<String> {
        match &self.value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Replace the value in place with a string.
    pub fn set_string(&mut self, text: impl Into<String>, hint: RenderHint) {
        self.value = Value::String(text.into());
        self.hint = hint;
    }
}

/// A node of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Mapping(Vec<(Scalar, Node)>),
    Sequence(Vec<Node>),
}

impl Node {
    /// The null scalar.
    pub fn null() -> Self {
        Node::Scalar(Scalar::new(Value::Null))
    }

    /// A string scalar with the default hint.
    pub fn string(text: impl Into<String>) -> Self {
        Node::Scalar(Scalar::string(text))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(s) if s.value.is_null())
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scalar_mut(&mut self) -> Option<&mut Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    /// Items of a sequence. Anything else has none.
    pub fn items(&self) -> &[Node] {
        match self {
            Node::Sequence(items) => items,
            _ => &[],
        }
    }

    /// Build a tree from a parsed YAML value.
    ///
    /// Tags and non-scalar mapping keys have no representation here and are
    /// rejected.
    pub fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Mapping(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map {
                    let key = match key {
                        Value::Mapping(_) | Value::Sequence(_) | Value::Tagged(_) => {
                            return Err(format!("unsupported mapping key {key:?}"));
                        }
                        key => Scalar::new(key),
                    };
                    entries.push((key, Node::from_value(value)?));
                }
                Ok(Node::Mapping(entries))
            }
            Value::Sequence(items) => items
                .into_iter()
                .map(Node::from_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Node::Sequence),
            Value::Tagged(tagged) => Err(format!("unsupported tag {}", tagged.tag)),
            scalar => Ok(Node::Scalar(Scalar::new(scalar))),
        }
    }

    /// Convert back into a plain YAML value, dropping render hints.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Scalar(s) => s.value.clone(),
            Node::Mapping(entries) => Value::Mapping(
                entries
                    .iter()
                    .map(|(k, v)| (k.value.clone(), v.to_value()))
                    .collect(),
            ),
            Node::Sequence(items) => Value::Sequence(items.iter().map(Node::to_value).collect()),
        }
    }
}

/// One step of a [`NodePath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// A stable address of a node inside a tree, relative to its root.
///
/// Locators hand these out instead of references so the tree can be
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath(Vec<PathSegment>);

impl NodePath {
    /// The path of the root itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// The path of a mapping child.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.0.push(PathSegment::Key(key.into()));
        path
    }

    /// The path of a sequence item.
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.0.push(PathSegment::Index(index));
        path
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn resolve<'a>(&self, root: &'a Node) -> Option<&'a Node> {
        self.0.iter().try_fold(root, |node, segment| match segment {
            PathSegment::Key(key) => locate(node, key),
            PathSegment::Index(i) => node.items().get(*i),
        })
    }

    pub fn resolve_mut<'a>(&self, root: &'a mut Node) -> Option<&'a mut Node> {
        self.0.iter().try_fold(root, |node, segment| match segment {
            PathSegment::Key(key) => locate_mut(node, key),
            PathSegment::Index(i) => match node {
                Node::Sequence(items) => items.get_mut(*i),
                _ => None,
            },
        })
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("spec")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}
