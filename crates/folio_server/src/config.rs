//! # Server Configuration
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8080
//! log_filter = "info,tower_http=debug"
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Listener and logging settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
            log_filter: "info,tower_http=info".to_owned(),
        }
    }
}

impl ServerConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::ConfigParse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(source: &str) -> ServerResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::ConfigRead`] if the file cannot be read,
    /// otherwise as [`ServerConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ServerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidConfig`] if `host` is not an IP address.
    pub fn socket_addr(&self) -> ServerResult<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            ServerError::InvalidConfig(format!("host {:?} is not an IP address", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(ServerConfig::from_toml_str("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = ServerConfig::from_toml_str("port = 8080").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            ServerConfig::from_toml_str("prot = 1"),
            Err(ServerError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "0.0.0.0".into(),
            port: 9000,
            ..ServerConfig::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:9000");

        let bad = ServerConfig {
            host: "localhost".into(),
            ..ServerConfig::default()
        };
        assert!(matches!(bad.socket_addr(), Err(ServerError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = ServerConfig::from_toml_file("/nonexistent/folio.toml").unwrap_err();
        assert!(matches!(err, ServerError::ConfigRead { .. }));
    }
}
