//! Split command implementation.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::{Parser, ValueHint};

use crate::cli::CommandContext;
use crate::error::CliError;

/// Split a local template file into a directory tree.
///
/// Warning: the destination directory is cleared first.
#[derive(Debug, Parser)]
pub struct SplitCommand {
    /// Template file to split
    #[arg(value_hint = ValueHint::FilePath)]
    pub src: PathBuf,

    /// Directory to write the split templates to
    #[arg(value_hint = ValueHint::DirPath)]
    pub dest: PathBuf,
}

impl SplitCommand {
    pub fn execute(&self, _ctx: &CommandContext) -> Result<(), CliError> {
        let file = File::open(&self.src)
            .map_err(|e| CliError::io_with_path("unable to open template file", e, &self.src))?;

        let report = stackman_core::split(&self.dest, BufReader::new(file))?;
        tracing::info!(
            src = %self.src.display(),
            dest = %self.dest.display(),
            objects = report.objects.len(),
            "split complete"
        );
        Ok(())
    }
}
