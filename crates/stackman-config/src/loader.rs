//! Configuration file loading and parsing.

use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;

use crate::types::StackConfig;

/// Directory holding the project configuration.
pub const CONFIG_DIR: &str = ".stack-manager";

/// File name of the project configuration.
pub const CONFIG_FILE: &str = "config.yaml";

// `${VAR}` or `${VAR:-default}`.
const ENV_VAR_PATTERN: &str = r"\$\{([^}:]+)(?::-([^}]*))?\}";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },

    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

/// Configuration loader.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Where the project configuration is expected.
    pub fn config_path(&self) -> PathBuf {
        self.base_path.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load `.stack-manager/config.yaml`, or the defaults when it is absent.
    pub fn load(&self) -> Result<StackConfig, ConfigError> {
        let config_path = self.config_path();
        if !config_path.exists() {
            return Ok(StackConfig::default());
        }
        self.load_file(&config_path)
    }

    /// Load an explicitly named configuration file, which must exist.
    pub fn load_file(&self, path: &Path) -> Result<StackConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let expanded = self.expand_env_vars(&contents)?;

        let config = if expanded.trim().is_empty() {
            StackConfig::default()
        } else {
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?
        };

        self.validate(&config)?;
        Ok(config)
    }

    /// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
    pub fn expand_env_vars(&self, content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(ENV_VAR_PATTERN)?;

        let mut result = String::with_capacity(content.len());
        let mut last = 0;
        for cap in re.captures_iter(content) {
            let Some(full_match) = cap.get(0) else {
                continue;
            };
            let var_name = &cap[1];
            let default = cap.get(2).map(|m| m.as_str());

            let value = match std::env::var(var_name) {
                Ok(v) => v,
                Err(_) => match default {
                    Some(d) => d.to_string(),
                    None => {
                        return Err(ConfigError::EnvVarNotFound {
                            var: var_name.to_string(),
                        })
                    }
                },
            };

            result.push_str(&content[last..full_match.start()]);
            result.push_str(&value);
            last = full_match.end();
        }
        result.push_str(&content[last..]);

        Ok(result)
    }

    /// Validate configuration values.
    pub fn validate(&self, config: &StackConfig) -> Result<(), ConfigError> {
        if config.directory.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "directory must not be empty".to_string(),
            });
        }

        if config.influx.command.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "influx.command must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}
