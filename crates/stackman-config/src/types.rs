//! Configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Directory templates are split into and united from.
    pub directory: PathBuf,
    /// Data file used for templating on `unite` and `push`.
    pub data_file: Option<PathBuf>,
    /// How to reach the `influx` CLI and the server behind it.
    pub influx: InfluxConfig,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("templates"),
            data_file: None,
            influx: InfluxConfig::default(),
        }
    }
}

/// Settings forwarded to the `influx` CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluxConfig {
    /// Command used to invoke the CLI.
    pub command: String,
    pub host: Option<String>,
    pub org: Option<String>,
    pub org_id: Option<String>,
    /// Name of the influx CLI configuration to use.
    pub active_config: Option<String>,
    /// Path to the influx CLI configurations file.
    pub configs_path: Option<String>,
    pub token: Option<String>,
    /// Skip TLS certificate verification.
    pub skip_verify: bool,
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            command: "influx".to_string(),
            host: None,
            org: None,
            org_id: None,
            active_config: None,
            configs_path: None,
            token: None,
            skip_verify: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StackConfig::default();
        assert_eq!(config.directory, PathBuf::from("templates"));
        assert!(config.data_file.is_none());
        assert_eq!(config.influx.command, "influx");
        assert!(!config.influx.skip_verify);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: StackConfig = serde_yaml::from_str("influx:\n  host: http://localhost:8086\n").unwrap();
        assert_eq!(config.directory, PathBuf::from("templates"));
        assert_eq!(config.influx.command, "influx");
        assert_eq!(config.influx.host.as_deref(), Some("http://localhost:8086"));
    }

    #[test]
    fn test_empty_document_is_default() {
        let config: StackConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, StackConfig::default());
    }
}
