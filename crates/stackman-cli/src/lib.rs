//! InfluxDB stack manager CLI library.

pub mod cli;
pub mod commands;
pub mod error;
pub mod influx;

pub use error::CliError;
