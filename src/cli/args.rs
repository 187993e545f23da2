//! CLI argument definitions using clap
//!
//! Commands:
//! - maso serve [--host <host>] [--port <port>] [--database-url <url>] [--database-name <name>]
//! - maso diagnose [--database-url <url>] [--database-name <name>]
//!
//! Every flag falls back to its environment variable.

use clap::{Args, Parser, Subcommand};

use crate::http_server::ServerConfig;

/// Maso - production-order management backend
#[derive(Parser, Debug)]
#[command(name = "maso")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server
    Serve(ServeArgs),

    /// Print the storage diagnostic report as JSON and exit
    Diagnose(StorageArgs),
}

/// Storage connection settings
#[derive(Args, Debug, Clone, Default)]
pub struct StorageArgs {
    /// Storage connection string (`memory://`, `file://<dir>` or a directory)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Database name inside the storage location
    #[arg(long, env = "DATABASE_NAME")]
    pub database_name: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    #[command(flatten)]
    pub storage: StorageArgs,
}

impl StorageArgs {
    /// Server configuration with default listener settings
    pub fn to_config(&self) -> ServerConfig {
        ServerConfig::default().with_database(self.database_url.clone(), self.database_name.clone())
    }
}

impl ServeArgs {
    pub fn to_config(&self) -> ServerConfig {
        let mut config = self.storage.to_config();
        config.host = self.host.clone();
        config.port = self.port;
        config
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "maso",
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--database-url",
            "memory://",
            "--database-name",
            "maso",
        ])
        .unwrap();

        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = args.to_config();
        assert_eq!(config.socket_addr(), "127.0.0.1:9000");
        assert_eq!(config.database_url.as_deref(), Some("memory://"));
        assert_eq!(config.database_name.as_deref(), Some("maso"));
    }

    #[test]
    fn test_diagnose_blank_flags_are_unset() {
        let cli = Cli::try_parse_from(["maso", "diagnose", "--database-url", "", "--database-name", "maso"]).unwrap();
        let Command::Diagnose(args) = cli.command else {
            panic!("expected diagnose");
        };
        let config = args.to_config();
        assert!(!config.database_url_set());
        assert!(config.database_name_set());
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(Cli::try_parse_from(["maso", "serve", "--port", "http"]).is_err());
    }
}
