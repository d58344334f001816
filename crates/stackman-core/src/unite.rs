//! Reassemble a directory tree into a template stream.

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use serde_json::Value;

use crate::data::load_data;
use crate::decode::decode_one;
use crate::document::{Node, RenderHint};
use crate::encode::Encoder;
use crate::error::{Error, Result};
use crate::kind::Kind;
use crate::object::Object;
use crate::registry::KindRegistry;
use crate::render::TemplateSet;
use crate::{REFERENCE_PREFIX, TEMPLATE_FILE};

/// What a unite read.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UniteReport {
    /// Object directories, in output order.
    pub objects: Vec<PathBuf>,
    /// Script files inlined across all objects.
    pub scripts: usize,
}

/// Reads `<source>/<kind>/<name>/` directories back into one stream.
#[derive(Default)]
pub struct Uniter {
    registry: KindRegistry,
}

impl Uniter {
    pub fn new(registry: KindRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Write the united form of `source` to `writer`.
    ///
    /// With a data file every template and script is rendered against its
    /// contents first, failing on any reference the data does not define.
    pub fn unite<W: Write>(
        &self,
        source: &Path,
        writer: W,
        data_file: Option<&Path>,
    ) -> Result<UniteReport> {
        let span = tracing::info_span!("unite", source = %source.display());
        let _guard = span.enter();

        let data = data_file.map(load_data).transpose()?;

        let mut encoder = Encoder::new(writer);
        let mut report = UniteReport::default();
        for kind_dir in self.kind_dirs(source)? {
            for dir in subdirectories(&kind_dir)?.into_iter().map(|(_, path)| path) {
                let (object, scripts) = self.read_object(&dir, data.as_ref())?;
                encoder.encode(&object)?;

                tracing::debug!(kind = %object.kind, dir = %dir.display(), scripts, "read object");
                report.scripts += scripts;
                report.objects.push(dir);
            }
        }
        encoder.finish()?;

        tracing::info!(
            objects = report.objects.len(),
            scripts = report.scripts,
            templated = data.is_some(),
            "united templates"
        );
        Ok(report)
    }

    /// Kind directories, highest priority first, then by name.
    fn kind_dirs(&self, source: &Path) -> Result<Vec<PathBuf>> {
        let mut dirs: Vec<_> = subdirectories(source)?
            .into_iter()
            .map(|(name, path)| (self.registry.priority(&Kind::from(name.as_str())), name, path))
            .collect();
        dirs.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        Ok(dirs.into_iter().map(|(_, _, path)| path).collect())
    }

    fn read_object(&self, dir: &Path, data: Option<&Value>) -> Result<(Object, usize)> {
        let template = dir.join(TEMPLATE_FILE);
        let templates = data.map(|data| TemplateSet::load(dir, data)).transpose()?;

        let text = match &templates {
            Some(set) if set.contains(TEMPLATE_FILE) => set.render(TEMPLATE_FILE)?,
            Some(_) => {
                let missing = io::Error::new(io::ErrorKind::NotFound, "no such file");
                return Err(Error::io("read template", &template, missing));
            }
            None => fs::read_to_string(&template)
                .map_err(|e| Error::io("read template", &template, e))?,
        };

        let mut object = decode_one(&text, &template.display().to_string())?;
        let scripts = self
            .registry
            .locate(&object.kind, &object.spec)
            .map_err(|e| e.within(template.display()))?;

        let mut inlined = 0;
        for script in &scripts {
            let Some(scalar) = script.path.resolve_mut(&mut object.spec).and_then(Node::as_scalar_mut)
            else {
                continue;
            };
            let Some(reference) = scalar.as_str().and_then(|s| s.strip_prefix(REFERENCE_PREFIX))
            else {
                continue;
            };

            let file_name = reference_file_name(reference, &template)?;
            let path = dir.join(file_name);
            if !path.is_file() {
                return Err(Error::MissingScriptFile { path, template });
            }

            let content = match &templates {
                Some(set) => set.render(file_name)?,
                None => fs::read_to_string(&path).map_err(|e| Error::io("read script", &path, e))?,
            };
            scalar.set_string(content, RenderHint::Default);
            inlined += 1;
        }

        Ok((object, inlined))
    }
}

/// A reference must name a file directly inside the object directory.
fn reference_file_name<'a>(reference: &'a str, template: &Path) -> Result<&'a str> {
    let mut components = Path::new(reference).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !reference.ends_with('/') => Ok(reference),
        _ => Err(Error::InvalidScriptReference {
            reference: format!("{REFERENCE_PREFIX}{reference}"),
            template: template.to_path_buf(),
        }),
    }
}

/// Immediate subdirectories of `dir` with their names, sorted by name.
fn subdirectories(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io("read directory", dir, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io("read directory", dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), path));
        }
    }
    dirs.sort();
    Ok(dirs)
}
