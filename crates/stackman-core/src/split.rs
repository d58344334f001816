//! Explode a template stream into a directory tree.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::decode::Decoder;
use crate::document::{Node, NodePath, RenderHint};
use crate::encode::encode_to_string;
use crate::error::{Error, Result};
use crate::locate::require_text;
use crate::namer::{object_dir_name, ScriptNamer};
use crate::object::Object;
use crate::registry::{KindRegistry, ScriptRef};
use crate::{REFERENCE_PREFIX, TEMPLATE_FILE};

/// What a split wrote.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SplitReport {
    /// Object directories, in stream order.
    pub objects: Vec<PathBuf>,
    /// Script files extracted across all objects.
    pub scripts: usize,
}

/// Writes each object of a stream to `<dest>/<kind>/<name>/` with its
/// embedded scripts pulled out into sibling `.flux` files.
#[derive(Default)]
pub struct Splitter {
    registry: KindRegistry,
}

impl Splitter {
    pub fn new(registry: KindRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Replace the contents of `destination` with the split form of `input`.
    ///
    /// The destination is cleared first. A failure part way through leaves
    /// whatever was already written.
    pub fn split<R: Read>(&self, destination: &Path, input: R) -> Result<SplitReport> {
        let span = tracing::info_span!("split", destination = %destination.display());
        let _guard = span.enter();

        clear_dir(destination)?;

        let mut seen = HashSet::new();
        let mut report = SplitReport::default();
        for (index, object) in Decoder::from_reader(input).enumerate() {
            let mut object = object?;
            let dir = object_dir(destination, &object)
                .map_err(|e| e.within(format_args!("template document {}", index + 1)))?;

            if !seen.insert(dir.clone()) {
                return Err(Error::NameCollision {
                    kind: object.kind.to_string(),
                    name: dir
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    path: dir,
                });
            }

            report.scripts += self.write_object(&dir, &mut object)?;
            report.objects.push(dir);
        }

        tracing::info!(
            objects = report.objects.len(),
            scripts = report.scripts,
            "split templates"
        );
        Ok(report)
    }

    fn write_object(&self, dir: &Path, object: &mut Object) -> Result<usize> {
        fs::create_dir_all(dir).map_err(|e| Error::io("create directory", dir, e))?;

        let scripts = self
            .registry
            .locate(&object.kind, &object.spec)
            .map_err(|e| e.within(dir.display()))?;

        let mut namer = ScriptNamer::new();
        for script in &scripts {
            let file_name = namer.next_name(&script.name);
            extract_script(dir, &file_name, script, &mut object.spec)?;
        }

        let template = dir.join(TEMPLATE_FILE);
        fs::write(&template, encode_to_string(object))
            .map_err(|e| Error::io("write template", &template, e))?;

        tracing::debug!(
            kind = %object.kind,
            dir = %dir.display(),
            scripts = scripts.len(),
            "wrote object"
        );
        Ok(scripts.len())
    }
}

/// `<destination>/<kind>/<escaped name>` for one object.
fn object_dir(destination: &Path, object: &Object) -> Result<PathBuf> {
    let name = require_text(&object.spec, "name", &NodePath::root())?;
    Ok(destination
        .join(object_dir_name(&object.kind, object.kind.as_str())?)
        .join(object_dir_name(&object.kind, &name)?))
}

/// Write one script to its own file and leave a reference in its place.
fn extract_script(dir: &Path, file_name: &str, script: &ScriptRef, spec: &mut Node) -> Result<()> {
    let not_text = || Error::decode(script.path.to_string(), "expected a string value").within(dir.display());

    let scalar = script
        .path
        .resolve_mut(spec)
        .and_then(Node::as_scalar_mut)
        .ok_or_else(not_text)?;
    let text = scalar.as_str().ok_or_else(not_text)?;

    let path = dir.join(file_name);
    fs::write(&path, text).map_err(|e| Error::io("write script", &path, e))?;
    tracing::debug!(script = %script.path, file = file_name, "extracted script");

    scalar.set_string(format!("{REFERENCE_PREFIX}{file_name}"), RenderHint::Flow);
    Ok(())
}

fn clear_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io("clear directory", dir, e)),
    }
    fs::create_dir_all(dir).map_err(|e| Error::io("create directory", dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TASK: &str = "\
apiVersion: influxdata.com/v2alpha1
kind: Task
metadata:
  name: nightly-task
spec:
  name: Nightly
  every: 1h
  query: |
    from(bucket: \"telegraf\")
      |> range(start: -1h)
";

    #[test]
    fn test_split_task() {
        let dest = tempdir().unwrap();
        let report = Splitter::default().split(dest.path(), TASK.as_bytes()).unwrap();

        let dir = dest.path().join("Task").join("Nightly");
        assert_eq!(report.objects, vec![dir.clone()]);
        assert_eq!(report.scripts, 1);

        let script = fs::read_to_string(dir.join("query.flux")).unwrap();
        assert_eq!(script, "from(bucket: \"telegraf\")\n  |> range(start: -1h)\n");

        let template = fs::read_to_string(dir.join(TEMPLATE_FILE)).unwrap();
        assert!(template.contains("  query: file://query.flux\n"), "{template}");
    }

    #[test]
    fn test_split_clears_destination() {
        let dest = tempdir().unwrap();
        let stale = dest.path().join("Stale");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("template.yml"), "kind: Stale\n").unwrap();

        Splitter::default().split(dest.path(), "".as_bytes()).unwrap();
        assert!(!stale.exists());
        assert!(dest.path().exists());
    }

    #[test]
    fn test_split_missing_name() {
        let dest = tempdir().unwrap();
        let err = Splitter::default()
            .split(dest.path(), "kind: Label\nspec:\n  color: red\n".as_bytes())
            .unwrap_err();
        match err {
            Error::MissingKey { key, context } => {
                assert_eq!(key, "name");
                assert_eq!(context, "template document 1: spec");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_split_rejects_non_string_query() {
        let dest = tempdir().unwrap();
        let err = Splitter::default()
            .split(dest.path(), "kind: Task\nspec:\n  name: t\n  query: 12\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }), "{err}");
    }

    #[test]
    fn test_split_escapes_names() {
        let dest = tempdir().unwrap();
        let report = Splitter::default()
            .split(dest.path(), "kind: Label\nspec:\n  name: \"a/b: c\"\n".as_bytes())
            .unwrap();
        assert_eq!(report.objects, vec![dest.path().join("Label").join("ab c")]);
    }
}
