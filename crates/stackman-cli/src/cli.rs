//! CLI argument definitions using clap derive macros.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use stackman_config::{ConfigLoader, StackConfig};

use crate::commands::{PullCommand, PushCommand, SplitCommand, UniteCommand};
use crate::error::CliError;

/// InfluxDB Stack Manager
///
/// Manage InfluxDB stack templates as a directory tree of readable
/// templates and Flux scripts.
#[derive(Debug, Parser)]
#[command(
    name = "influxdb-stack-manager",
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "STACK_MANAGER_CONFIG",
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Split a local template file
    Split(SplitCommand),

    /// Unite a set of split templates into a local template file
    Unite(UniteCommand),

    /// Fetch a stack template from InfluxDB and split it
    Pull(PullCommand),

    /// Apply template changes to a stack in InfluxDB
    Push(PushCommand),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Split(_) => "split",
            Command::Unite(_) => "unite",
            Command::Pull(_) => "pull",
            Command::Push(_) => "push",
        }
    }
}

impl Cli {
    /// Load configuration from `--config` or the current project.
    pub fn load_config(&self) -> Result<StackConfig, CliError> {
        let config = match &self.config {
            Some(path) => {
                let project_dir = path.parent().unwrap_or_else(|| Path::new("."));
                ConfigLoader::new(project_dir).load_file(path)?
            }
            None => ConfigLoader::default().load()?,
        };
        Ok(config)
    }

    /// Execute the selected command
    pub fn execute(self, config: StackConfig) -> Result<(), CliError> {
        let ctx = CommandContext { config };

        match self.command {
            Command::Split(cmd) => cmd.execute(&ctx),
            Command::Unite(cmd) => cmd.execute(&ctx),
            Command::Pull(cmd) => cmd.execute(&ctx),
            Command::Push(cmd) => cmd.execute(&ctx),
        }
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: StackConfig,
}

impl CommandContext {
    /// The template directory: the flag if given, else the configured one.
    pub fn directory(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.directory.clone())
    }

    /// The data file: the flag if given, else the configured one.
    pub fn data_file(&self, flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf)
            .or_else(|| self.config.data_file.clone())
    }
}
