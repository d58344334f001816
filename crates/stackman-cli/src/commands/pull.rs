//! Pull command implementation.

use std::path::PathBuf;

use clap::{Parser, ValueHint};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::influx::InfluxArgs;

/// Fetch a stack template from InfluxDB and split it.
///
/// Warning: the template directory is cleared first.
#[derive(Debug, Parser)]
pub struct PullCommand {
    /// ID of the stack to export
    pub stack_id: String,

    #[command(flatten)]
    pub influx: InfluxArgs,

    /// Directory to write templates to [default: templates]
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub directory: Option<PathBuf>,
}

impl PullCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let influx = self.influx.resolve(&ctx.config.influx);
        let directory = ctx.directory(self.directory.as_deref());

        let template = influx.capture(&influx.export_args(&self.stack_id))?;
        let report = stackman_core::split(&directory, template.as_slice())?;

        tracing::info!(
            stack_id = %self.stack_id,
            directory = %directory.display(),
            objects = report.objects.len(),
            "pulled stack"
        );
        Ok(())
    }
}
