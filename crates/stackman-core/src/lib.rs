//! Split InfluxDB stack templates into a browsable directory tree and unite
//! them again.
//!
//! A template stream is a sequence of YAML documents, each declaring one
//! object (dashboard, task, check, label, variable, ...). [`split`] writes
//! every object to `<dest>/<kind>/<name>/template.yml` and pulls its Flux
//! queries out into sibling `.flux` files, leaving `file://` references
//! behind. [`unite`] reverses this, optionally rendering every file through
//! strict templating against a JSON or YAML data file first.
//!
//! ```no_run
//! use std::fs::File;
//! use std::path::Path;
//!
//! # fn main() -> stackman_core::Result<()> {
//! let input = File::open("stack.yml").expect("open input");
//! stackman_core::split(Path::new("templates"), input)?;
//!
//! let mut output = Vec::new();
//! stackman_core::unite(Path::new("templates"), &mut output, None)?;
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod decode;
pub mod document;
pub mod encode;
pub mod error;
pub mod kind;
pub mod locate;
pub mod namer;
pub mod object;
pub mod registry;
mod render;
pub mod split;
pub mod unite;

use std::io::{Read, Write};
use std::path::Path;

pub use data::{load_data, DataFormat};
pub use decode::{decode_one, Decoder};
pub use document::{Node, NodePath, PathSegment, RenderHint, Scalar};
pub use encode::{encode_to_string, Encoder};
pub use error::{Error, Result};
pub use kind::Kind;
pub use locate::{locate, locate_mut, require};
pub use namer::{escape_name, object_dir_name, ScriptNamer};
pub use object::Object;
pub use registry::{KindRegistry, Locator, ScriptRef};
pub use split::{SplitReport, Splitter};
pub use unite::{UniteReport, Uniter};

/// File holding an object's template inside its directory.
pub const TEMPLATE_FILE: &str = "template.yml";

/// Prefix of a scalar that points at a sibling script file.
pub const REFERENCE_PREFIX: &str = "file://";

/// Split `input` into `destination` using the built-in kinds.
pub fn split<R: Read>(destination: &Path, input: R) -> Result<SplitReport> {
    Splitter::default().split(destination, input)
}

/// Unite `source` into `writer` using the built-in kinds.
pub fn unite<W: Write>(source: &Path, writer: W, data_file: Option<&Path>) -> Result<UniteReport> {
    Uniter::default().unite(source, writer, data_file)
}
