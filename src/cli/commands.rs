//! CLI command implementations
//!
//! Boot sequence for `serve`: resolve configuration, connect storage, bind
//! the listener. Storage that cannot be opened does not stop the server; the
//! API then answers storage-backed requests with 500.

use std::io::Write;

use crate::http_server::{diagnose, HttpServer, ServerConfig};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::storage::StorageHandle;

use super::args::{Command, ServeArgs, StorageArgs};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve(args) => serve(&args),
        Command::Diagnose(args) => diagnose_command(&args),
    }
}

/// Opens storage as configured, logging the outcome.
pub fn connect_storage(config: &ServerConfig) -> StorageHandle {
    let handle = StorageHandle::connect(config.database_url.as_deref(), config.database_name.as_deref());
    match handle.unavailable_reason() {
        None => log_event_with_fields(
            Event::StorageOpened,
            &[("database", config.database_name.as_deref().unwrap_or_default())],
        ),
        Some(reason) => log_event_with_fields(Event::StorageUnavailable, &[("reason", reason)]),
    }
    handle
}

/// Start the HTTP server and serve until Ctrl-C
pub fn serve(args: &ServeArgs) -> CliResult<()> {
    log_event(Event::BootStart);

    let config = args.to_config();
    if config.host.trim().is_empty() {
        return Err(CliError::config_error("--host must not be empty"));
    }
    let port = config.port.to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("host", &config.host),
            ("port", &port),
            ("database_url_set", bool_str(config.database_url_set())),
            ("database_name_set", bool_str(config.database_name_set())),
        ],
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    let storage = connect_storage(&config);
    let server = HttpServer::new(config, storage);
    log_event(Event::BootComplete);

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print the diagnostic report for the configured storage
pub fn diagnose_command(args: &StorageArgs) -> CliResult<()> {
    let config = args.to_config();
    let storage = connect_storage(&config);
    let report = diagnose(&storage, &config);

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report)?;
    writeln!(stdout)?;
    Ok(())
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
