//! Invoking the `influx` CLI.

use std::path::Path;
use std::process::{Command, Stdio};

use clap::Args;
use stackman_config::InfluxConfig;

use crate::error::CliError;

/// Flags forwarded to the `influx` CLI.
#[derive(Debug, Clone, Default, Args)]
pub struct InfluxArgs {
    /// Config name to use for the command
    #[arg(short = 'C', long)]
    pub active_config: Option<String>,

    /// Path to the influx CLI configurations
    #[arg(long)]
    pub configs_path: Option<String>,

    /// HTTP address of InfluxDB
    #[arg(long)]
    pub host: Option<String>,

    /// The name of the organization
    #[arg(short, long)]
    pub org: Option<String>,

    /// The ID of the organization
    #[arg(long)]
    pub org_id: Option<String>,

    /// Skip TLS certificate chain and host name verification
    #[arg(long)]
    pub skip_verify: bool,

    /// Authentication token
    #[arg(short, long)]
    pub token: Option<String>,

    /// Command used to call the influx CLI [default: influx]
    #[arg(long, value_name = "COMMAND")]
    pub influx_cmd: Option<String>,
}

impl InfluxArgs {
    /// Merge with the configured values; flags win.
    pub fn resolve(&self, config: &InfluxConfig) -> Influx {
        let pick = |flag: &Option<String>, configured: &Option<String>| {
            flag.clone().or_else(|| configured.clone()).filter(|v| !v.is_empty())
        };

        Influx {
            command: self
                .influx_cmd
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| config.command.clone()),
            active_config: pick(&self.active_config, &config.active_config),
            configs_path: pick(&self.configs_path, &config.configs_path),
            host: pick(&self.host, &config.host),
            org: pick(&self.org, &config.org),
            org_id: pick(&self.org_id, &config.org_id),
            token: pick(&self.token, &config.token),
            skip_verify: self.skip_verify || config.skip_verify,
        }
    }
}

/// A fully resolved `influx` invocation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Influx {
    pub command: String,
    pub active_config: Option<String>,
    pub configs_path: Option<String>,
    pub host: Option<String>,
    pub org: Option<String>,
    pub org_id: Option<String>,
    pub token: Option<String>,
    pub skip_verify: bool,
}

impl Influx {
    /// Connection flags, in a fixed order. Unset values are left out.
    pub fn generate_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for (name, value) in [
            ("active-config", &self.active_config),
            ("configs-path", &self.configs_path),
            ("host", &self.host),
            ("org", &self.org),
            ("org-id", &self.org_id),
            ("token", &self.token),
        ] {
            if let Some(value) = value {
                args.push(format!("--{name}"));
                args.push(value.clone());
            }
        }

        if self.skip_verify {
            args.push("--skip-verify".to_string());
        }
        args
    }

    /// Arguments for `influx export stack`.
    pub fn export_args(&self, stack_id: &str) -> Vec<String> {
        let mut args = vec!["export".to_string(), "stack".to_string(), stack_id.to_string()];
        args.extend(self.generate_args());
        args
    }

    /// Arguments for `influx apply` of a template file to a stack.
    pub fn apply_args(&self, stack_id: &str, file: &Path, force: bool) -> Vec<String> {
        let mut args = vec![
            "apply".to_string(),
            "--stack-id".to_string(),
            stack_id.to_string(),
            "-f".to_string(),
            file.display().to_string(),
        ];
        args.extend(self.generate_args());
        if force {
            args.push("--force".to_string());
            args.push("yes".to_string());
        }
        args
    }

    /// The command line as it would be typed.
    pub fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.command.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run with captured output and return stdout.
    pub fn capture(&self, args: &[String]) -> Result<Vec<u8>, CliError> {
        tracing::debug!(command = %self.command, ?args, "running influx");
        let output = Command::new(&self.command)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CliError::command(
                format!("{} failed ({}): {}", self.command, output.status, stderr.trim()),
                self.command.clone(),
            ));
        }
        Ok(output.stdout)
    }

    /// Run attached to this process's stdin, stdout and stderr.
    pub fn run(&self, args: &[String]) -> Result<(), CliError> {
        tracing::debug!(command = %self.command, ?args, "running influx");
        let status = Command::new(&self.command)
            .args(args)
            .status()
            .map_err(|e| self.spawn_error(e))?;

        if !status.success() {
            return Err(CliError::command(
                format!("{} failed ({status})", self.command),
                self.command.clone(),
            ));
        }
        Ok(())
    }

    fn spawn_error(&self, source: std::io::Error) -> CliError {
        CliError::Command {
            message: format!("unable to run {}: {source}", self.command),
            command: self.command.clone(),
            source: Some(source),
        }
    }
}
