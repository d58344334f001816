//! Configuration for the InfluxDB stack manager.
//!
//! Settings live in `.stack-manager/config.yaml` inside the project
//! directory. Every field is optional; command-line flags take precedence
//! over anything read here.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;
