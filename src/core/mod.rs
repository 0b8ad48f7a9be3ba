/*!
# Core Module

Error handling and configuration management shared by the grafter library
and the CLI.
*/

pub mod errors;
pub mod config;

pub use errors::{ErrorKind, GraftError, GraftResult};
pub use config::{GraftConfig, InsertionSettings, OutputFormat, OutputSettings};
