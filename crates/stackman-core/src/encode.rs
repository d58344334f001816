//! Multi-document template encoding.
//!
//! Nesting is written here, so that sequences are indented under their key
//! and each scalar's render hint is honoured. The text of every scalar, including block style, chomping and
//! indentation indicators, comes from `serde_yaml`.

use std::io::Write;

use serde_yaml::{Mapping, Value};

use crate::document::{Node, RenderHint, Scalar};
use crate::error::{Error, Result};
use crate::object::Object;

const INDENT: usize = 2;
const MAX_IMPLICIT_KEY: usize = 128;
const WRAPPER_KEY: &str = "k";

/// Writes objects as a `---` separated YAML stream.
pub struct Encoder<W: Write> {
    writer: W,
    documents: usize,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            documents: 0,
        }
    }

    /// Append one object to the stream.
    pub fn encode(&mut self, object: &Object) -> Result<()> {
        let mut out = String::new();
        if self.documents > 0 {
            out.push_str("---\n");
        }
        out.push_str(&encode_to_string(object));

        self.writer
            .write_all(out.as_bytes())
            .map_err(|source| Error::Encode { source })?;
        self.documents += 1;
        Ok(())
    }

    /// Number of documents written so far.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Flush and hand back the writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush().map_err(|source| Error::Encode { source })?;
        Ok(self.writer)
    }
}

/// Serialise a single object as one YAML document.
pub fn encode_to_string(object: &Object) -> String {
    let header = [
        (Scalar::string("apiVersion"), Node::string(object.api_version.as_str())),
        (Scalar::string("kind"), Node::string(object.kind.as_str())),
    ];
    let mut out = String::new();
    write_mapping(&mut out, &header, 0);

    for (key, node) in [("metadata", &object.metadata), ("spec", &object.spec)] {
        if !node.is_null() {
            write_entry(&mut out, &Scalar::string(key), node, 0);
        }
    }
    out
}

fn pad(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat(' ').take(indent));
}

fn write_mapping(out: &mut String, entries: &[(Scalar, Node)], indent: usize) {
    for (key, value) in entries {
        write_entry(out, key, value, indent);
    }
}

fn write_entry(out: &mut String, key: &Scalar, value: &Node, indent: usize) {
    pad(out, indent);
    let key = inline_scalar(key.value());
    if needs_explicit_key(&key) {
        out.push_str("? ");
        out.push_str(&key);
        out.push('\n');
        pad(out, indent);
    } else {
        out.push_str(&key);
    }
    out.push(':');
    write_value(out, value, indent);
}

/// Parsers cap implicit keys at 1024 characters; longer keys, and anything
/// past libyaml's own emitter threshold, use the `? key` form.
fn needs_explicit_key(rendered: &str) -> bool {
    rendered.len() > MAX_IMPLICIT_KEY
}

/// Everything after `key:` or `-`, up to and including the final newline.
fn write_value(out: &mut String, value: &Node, indent: usize) {
    match value {
        Node::Scalar(scalar) => {
            out.push(' ');
            write_scalar(out, scalar, indent);
        }
        Node::Mapping(entries) if entries.is_empty() => out.push_str(" {}\n"),
        Node::Sequence(items) if items.is_empty() => out.push_str(" []\n"),
        Node::Mapping(entries) => {
            out.push('\n');
            write_mapping(out, entries, indent + INDENT);
        }
        Node::Sequence(items) => {
            out.push('\n');
            write_sequence(out, items, indent + INDENT);
        }
    }
}

fn write_sequence(out: &mut String, items: &[Node], indent: usize) {
    for item in items {
        pad(out, indent);
        out.push('-');
        match item {
            Node::Mapping(entries) if !entries.is_empty() => {
                // First entry shares the dash line; the rest align with it.
                let (key, value) = &entries[0];
                let rendered = inline_scalar(key.value());
                if needs_explicit_key(&rendered) {
                    out.push('\n');
                    write_mapping(out, entries, indent + INDENT);
                } else {
                    out.push(' ');
                    out.push_str(&rendered);
                    out.push(':');
                    write_value(out, value, indent + INDENT);
                    write_mapping(out, &entries[1..], indent + INDENT);
                }
            }
            Node::Sequence(inner) if !inner.is_empty() => {
                out.push('\n');
                write_sequence(out, inner, indent + INDENT);
            }
            other => write_value(out, other, indent),
        }
    }
}

fn write_scalar(out: &mut String, scalar: &Scalar, indent: usize) {
    match (scalar.value(), scalar.hint) {
        (Value::String(text), RenderHint::Default) if text.contains('\n') => {
            write_multiline(out, text, indent)
        }
        (value, _) => {
            out.push_str(&inline_scalar(value));
            out.push('\n');
        }
    }
}

/// Multi-line text as `serde_yaml` renders it under a top-level key,
/// shifted right by `indent`.
///
/// The emitter picks a literal block with the chomping and indentation
/// indicators the text needs, or double quotes when no block can hold the
/// text exactly (tabs, carriage returns, trailing spaces on a line).
fn write_multiline(out: &mut String, text: &str, indent: usize) {
    let mut wrapper = Mapping::new();
    wrapper.insert(Value::from(WRAPPER_KEY), Value::from(text));

    let rendered = serde_yaml::to_string(&wrapper).ok();
    let Some(body) = rendered
        .as_deref()
        .and_then(|r| r.strip_prefix(WRAPPER_KEY))
        .and_then(|r| r.strip_prefix(':'))
    else {
        out.push_str(&double_quoted(text));
        out.push('\n');
        return;
    };

    let mut lines = body.trim_start_matches(' ').lines();
    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    out.push('\n');
    // A block kept open to the end of the stream is followed by `...`.
    for line in lines.filter(|line| *line != "...") {
        if !line.is_empty() {
            pad(out, indent);
            out.push_str(line);
        }
        out.push('\n');
    }
}

/// A scalar on a single line: plain when unambiguous, quoted otherwise.
fn inline_scalar(value: &Value) -> String {
    if let Value::String(text) = value {
        if text.chars().any(char::is_control) {
            return double_quoted(text);
        }
    }

    match serde_yaml::to_string(value) {
        Ok(rendered) => {
            let rendered = rendered.trim_end_matches('\n');
            if rendered.contains('\n') {
                fallback(value)
            } else {
                rendered.to_string()
            }
        }
        Err(_) => fallback(value),
    }
}

fn fallback(value: &Value) -> String {
    match value {
        Value::String(text) => double_quoted(text),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => "null".to_string(),
    }
}

// JSON string syntax is a subset of YAML's double-quoted style.
fn double_quoted(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("{text:?}"))
}
