//! Push command implementation.

use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Parser, ValueHint};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::influx::InfluxArgs;

/// Apply local template changes to a stack in InfluxDB.
#[derive(Debug, Parser)]
pub struct PushCommand {
    /// ID of the stack to apply to
    pub stack_id: String,

    #[command(flatten)]
    pub influx: InfluxArgs,

    /// Directory to read templates from [default: templates]
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub directory: Option<PathBuf>,

    /// JSON or YAML file with data for templating
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub data_file: Option<PathBuf>,

    /// Apply destructive changes without asking
    #[arg(long)]
    pub force: bool,

    /// Print the influx command instead of running it, and keep the
    /// united template file
    #[arg(long)]
    pub dry_run: bool,
}

impl PushCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let influx = self.influx.resolve(&ctx.config.influx);
        let directory = ctx.directory(self.directory.as_deref());
        let data_file = ctx.data_file(self.data_file.as_deref());

        let mut template = tempfile::Builder::new()
            .prefix("stack-")
            .suffix(".yml")
            .tempfile()
            .map_err(|e| CliError::io("unable to create temporary template file", e))?;
        let report = stackman_core::unite(
            &directory,
            BufWriter::new(template.as_file_mut()),
            data_file.as_deref(),
        )?;
        tracing::debug!(objects = report.objects.len(), path = %template.path().display(), "united stack");

        if self.dry_run {
            let (_, path) = template
                .keep()
                .map_err(|e| CliError::io("unable to keep temporary template file", e.error))?;
            let args = influx.apply_args(&self.stack_id, &path, self.force);
            println!("{}", influx.command_line(&args));
            tracing::info!(path = %path.display(), "dry run, template file kept");
            return Ok(());
        }

        let args = influx.apply_args(&self.stack_id, template.path(), self.force);
        influx.run(&args)?;

        tracing::info!(stack_id = %self.stack_id, objects = report.objects.len(), "pushed stack");
        Ok(())
    }
}
