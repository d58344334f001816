use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use stackman_core::{unite, Error};
use tempfile::{tempdir, TempDir};

const TEMPLATE: &str = "\
apiVersion: influxdata.com/v2alpha1
kind: Task
metadata:
  name: downsample-task
spec:
  name: Downsample {{env}}
  every: 1h
  query: file://query.flux
";

const QUERY: &str = "from(bucket: \"{{bucket}}\")\n  |> range(start: -1h)\n";

/// A source tree with one templated task.
fn templated_tree() -> (TempDir, PathBuf) {
    let root = tempdir().unwrap();
    let dir = root.path().join("Task").join("Downsample");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("template.yml"), TEMPLATE).unwrap();
    fs::write(dir.join("query.flux"), QUERY).unwrap();
    (root, dir)
}

fn unite_with(source: &Path, data: &Path) -> stackman_core::Result<String> {
    let mut out = Vec::new();
    unite(source, &mut out, Some(data))?;
    Ok(String::from_utf8(out).unwrap())
}

const EXPECTED: &str = "\
apiVersion: influxdata.com/v2alpha1
kind: Task
metadata:
  name: downsample-task
spec:
  name: Downsample prod
  every: 1h
  query: |
    from(bucket: \"telegraf\")
      |> range(start: -1h)
";

#[test]
fn test_json_data() {
    let (root, _) = templated_tree();
    let data = root.path().join("data.json");
    fs::write(&data, r#"{"env": "prod", "bucket": "telegraf"}"#).unwrap();

    assert_eq!(unite_with(root.path(), &data).unwrap(), EXPECTED);
}

#[test]
fn test_yaml_data() {
    let (root, _) = templated_tree();
    for name in ["data.yaml", "data.yml"] {
        let data = root.path().join(name);
        fs::write(&data, "env: prod\nbucket: telegraf\n").unwrap();
        assert_eq!(unite_with(root.path(), &data).unwrap(), EXPECTED);
    }
}

#[test]
fn test_missing_data_key_fails() {
    let (root, dir) = templated_tree();
    let data = root.path().join("data.json");
    fs::write(&data, r#"{"env": "prod"}"#).unwrap();

    match unite_with(root.path(), &data).unwrap_err() {
        Error::TemplateData { path, .. } => assert_eq!(path, dir.join("query.flux")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_data_key_in_template_fails() {
    let (root, dir) = templated_tree();
    let data = root.path().join("data.json");
    fs::write(&data, r#"{"bucket": "telegraf"}"#).unwrap();

    match unite_with(root.path(), &data).unwrap_err() {
        Error::TemplateData { path, .. } => assert_eq!(path, dir.join("template.yml")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unsupported_data_format() {
    let (root, _) = templated_tree();
    let data = root.path().join("data.toml");
    fs::write(&data, "env = \"prod\"\n").unwrap();

    let err = unite_with(root.path(), &data).unwrap_err();
    assert!(matches!(err, Error::UnsupportedDataFormat { .. }), "{err}");
}

#[test]
fn test_without_data_templates_are_untouched() {
    let (root, _) = templated_tree();
    let mut out = Vec::new();
    unite(root.path(), &mut out, None).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("name: Downsample {{env}}"), "{text}");
    assert!(text.contains("from(bucket: \"{{bucket}}\")"), "{text}");
}
