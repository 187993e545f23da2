//! HTTP server configuration
//!
//! Host and port of the listener plus the storage settings the diagnostic
//! endpoint reports on. Values come from CLI flags or their environment
//! fallbacks (`HOST`, `PORT`, `DATABASE_URL`, `DATABASE_NAME`).

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Storage connection string
    #[serde(default)]
    pub database_url: Option<String>,

    /// Storage database name
    #[serde(default)]
    pub database_name: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            database_name: None,
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Set the storage settings. Blank values count as unset.
    pub fn with_database(mut self, url: Option<String>, name: Option<String>) -> Self {
        self.database_url = url.filter(|s| !s.trim().is_empty());
        self.database_name = name.filter(|s| !s.trim().is_empty());
        self
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn database_url_set(&self) -> bool {
        self.database_url.is_some()
    }

    pub fn database_name_set(&self) -> bool {
        self.database_name.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert!(!config.database_url_set());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_blank_database_settings_are_unset() {
        let config = ServerConfig::default().with_database(Some("  ".into()), Some("maso".into()));
        assert!(!config.database_url_set());
        assert!(config.database_name_set());
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: ServerConfig = serde_json::from_str(r#"{"database_name": "maso"}"#).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.database_name.as_deref(), Some("maso"));
    }
}
