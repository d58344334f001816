//! Unite command implementation.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Parser, ValueHint};

use crate::cli::CommandContext;
use crate::error::CliError;

/// Unite a directory tree of templates into a single template file.
#[derive(Debug, Parser)]
pub struct UniteCommand {
    /// Directory containing the split templates
    #[arg(value_hint = ValueHint::DirPath)]
    pub src: PathBuf,

    /// Template file to write
    #[arg(value_hint = ValueHint::FilePath)]
    pub dest: PathBuf,

    /// JSON or YAML file with data for templating
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub data_file: Option<PathBuf>,
}

impl UniteCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let data_file = ctx.data_file(self.data_file.as_deref());
        let file = File::create(&self.dest)
            .map_err(|e| CliError::io_with_path("unable to create template file", e, &self.dest))?;

        let report = stackman_core::unite(&self.src, BufWriter::new(file), data_file.as_deref())?;
        tracing::info!(
            src = %self.src.display(),
            dest = %self.dest.display(),
            objects = report.objects.len(),
            "unite complete"
        );
        Ok(())
    }
}
