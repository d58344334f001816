//! Strict templating over the files of one object directory.

use std::fs;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde_json::Value;

use crate::error::{Error, Result};

/// Every regular file of an object directory, registered as a template
/// under its file name and rendered against one data value.
pub(crate) struct TemplateSet<'a> {
    registry: Handlebars<'static>,
    dir: PathBuf,
    data: &'a Value,
}

impl<'a> TemplateSet<'a> {
    pub(crate) fn load(dir: &Path, data: &'a Value) -> Result<Self> {
        let mut registry = Handlebars::new();
        // Unresolved references fail instead of rendering as empty text.
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);

        for (name, path) in template_files(dir)? {
            let content =
                fs::read_to_string(&path).map_err(|e| Error::io("read template", &path, e))?;
            registry
                .register_template_string(&name, content)
                .map_err(|source| Error::TemplateSyntax {
                    path: path.clone(),
                    source: Box::new(source),
                })?;
        }

        Ok(Self {
            registry,
            dir: dir.to_path_buf(),
            data,
        })
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }

    pub(crate) fn render(&self, name: &str) -> Result<String> {
        self.registry
            .render(name, self.data)
            .map_err(|source| Error::TemplateData {
                path: self.dir.join(name),
                source: Box::new(source),
            })
    }
}

/// Regular files of `dir`, sorted by name.
fn template_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io("read directory", dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io("read directory", dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            files.push((name.to_owned(), path));
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_renders_registered_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("template.yml"), "kind: Task\nspec:\n  name: {{name}}\n").unwrap();
        fs::write(dir.path().join("query.flux"), "from(bucket: \"{{bucket}}\")").unwrap();
        fs::write(dir.path().join(".hidden.flux"), "{{bucket}}").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let data = json!({"name": "nightly", "bucket": "a&b"});
        let set = TemplateSet::load(dir.path(), &data).unwrap();

        assert!(set.contains("template.yml"));
        assert!(set.contains(".hidden.flux"));
        assert!(!set.contains("nested"));
        assert_eq!(set.render("template.yml").unwrap(), "kind: Task\nspec:\n  name: nightly\n");
        assert_eq!(set.render("query.flux").unwrap(), "from(bucket: \"a&b\")");
    }

    #[test]
    fn test_missing_reference_is_strict() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("template.yml"), "name: {{absent}}\n").unwrap();

        let data = json!({});
        let set = TemplateSet::load(dir.path(), &data).unwrap();
        let err = set.render("template.yml").unwrap_err();
        match err {
            Error::TemplateData { path, .. } => assert!(path.ends_with("template.yml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_syntax_error_names_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("query.flux"), "from() {{broken").unwrap();

        let data = json!({});
        let err = TemplateSet::load(dir.path(), &data).err().unwrap();
        match err {
            Error::TemplateSyntax { path, .. } => assert!(path.ends_with("query.flux")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
