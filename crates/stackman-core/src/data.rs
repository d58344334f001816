//! Data files for template substitution.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// Supported data file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
}

impl DataFormat {
    /// `.json`, `.yaml` and `.yml` are recognised; nothing else is.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Json),
            Some("yaml" | "yml") => Some(Self::Yaml),
            _ => None,
        }
    }

    fn parse(self, bytes: &[u8]) -> std::result::Result<Value, String> {
        match self {
            Self::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_slice(bytes).map_err(|e| e.to_string()),
        }
    }
}

/// Load the data made available to templates during `unite`.
pub fn load_data(path: &Path) -> Result<Value> {
    let format = DataFormat::from_path(path).ok_or_else(|| Error::UnsupportedDataFormat {
        path: path.to_path_buf(),
        extension: path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default(),
    })?;

    let bytes = fs::read(path).map_err(|e| Error::io("read data file", path, e))?;
    let data = format.parse(&bytes).map_err(|message| Error::DataParse {
        path: path.to_path_buf(),
        message,
    })?;

    tracing::debug!(path = %path.display(), ?format, "loaded template data");
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DataFormat::from_path(Path::new("d.json")), Some(DataFormat::Json));
        assert_eq!(DataFormat::from_path(Path::new("d.yaml")), Some(DataFormat::Yaml));
        assert_eq!(DataFormat::from_path(Path::new("d.yml")), Some(DataFormat::Yaml));
        assert_eq!(DataFormat::from_path(Path::new("d.toml")), None);
        assert_eq!(DataFormat::from_path(Path::new("data")), None);
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"bucket": "telegraf", "hosts": ["a", "b"]}"#).unwrap();
        assert_eq!(
            load_data(&path).unwrap(),
            json!({"bucket": "telegraf", "hosts": ["a", "b"]})
        );
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.yml");
        fs::write(&path, "bucket: telegraf\nretention: 30\n").unwrap();
        assert_eq!(load_data(&path).unwrap(), json!({"bucket": "telegraf", "retention": 30}));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_data(Path::new("/nowhere/data.toml")).unwrap_err();
        match err {
            Error::UnsupportedDataFormat { extension, .. } => assert_eq!(extension, ".toml"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_io() {
        let dir = tempdir().unwrap();
        let err = load_data(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_malformed_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_data(&path).unwrap_err(), Error::DataParse { .. }));
    }
}
