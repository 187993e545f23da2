//! CLI module for maso
//!
//! Provides command-line interface for:
//! - serve: Connect storage and run the HTTP API
//! - diagnose: Print the storage diagnostic report

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, ServeArgs, StorageArgs};
pub use commands::{connect_storage, diagnose_command, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
