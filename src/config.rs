//! Environment-driven configuration for the server and the terminal client.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Port used when `NOTES_PORT` is unset.
pub const DEFAULT_PORT: u16 = 17020;
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Base URL used when `NOTES_URL` is unset.
pub const DEFAULT_URL: &str = "http://127.0.0.1:17020/api";

/// Server settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (from NOTES_HOST)
    pub host: String,
    /// TCP port (from NOTES_PORT)
    pub port: u16,
    /// SQLite file (from NOTES_DB_PATH); `None` means the platform data directory
    pub db_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load server configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load server configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("NOTES_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("NOTES_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("NOTES_PORT is not a valid port: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let db_path = lookup("NOTES_DB_PATH")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            db_path,
        })
    }

    /// Override the port (e.g. from a command-line flag).
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: None,
        }
    }
}

/// Client settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL including the `/api` prefix (from NOTES_URL)
    pub base_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::default().with_base_url(lookup("NOTES_URL"))
    }

    /// Override the base URL, e.g. from `--url`. Empty values are ignored.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn server_config_defaults_without_env() {
        let config = ServerConfig::from_lookup(vars(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn server_config_reads_env() {
        let config = ServerConfig::from_lookup(vars(&[
            ("NOTES_HOST", "0.0.0.0"),
            ("NOTES_PORT", "8080"),
            ("NOTES_DB_PATH", "/tmp/notes/test.db"),
        ]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/notes/test.db")));
        assert_eq!(config.bind_addr().unwrap().port(), 8080);
    }

    #[test]
    fn server_config_rejects_bad_port() {
        let result = ServerConfig::from_lookup(vars(&[("NOTES_PORT", "not-a-port")]));
        assert!(result.is_err());
    }

    #[test]
    fn port_flag_overrides_env() {
        let config = ServerConfig::from_lookup(vars(&[("NOTES_PORT", "8080")]))
            .unwrap()
            .with_port(Some(9000));
        assert_eq!(config.port, 9000);

        let unchanged = ServerConfig::default().with_port(None);
        assert_eq!(unchanged.port, DEFAULT_PORT);
    }

    #[test]
    fn client_config_strips_trailing_slash() {
        let config = ClientConfig::from_lookup(vars(&[("NOTES_URL", "http://notes.local/api/")]));
        assert_eq!(config.base_url, "http://notes.local/api");
    }

    #[test]
    fn client_config_defaults_without_env() {
        assert_eq!(ClientConfig::from_lookup(vars(&[])), ClientConfig::default());
    }

    #[test]
    fn url_flag_overrides_env_with_same_normalisation() {
        let config = ClientConfig::from_lookup(vars(&[("NOTES_URL", "http://env.local/api")]))
            .with_base_url(Some("http://flag.local/api/".to_string()));
        assert_eq!(config.base_url, "http://flag.local/api");

        let unchanged = ClientConfig::from_lookup(vars(&[("NOTES_URL", "http://env.local/api")]))
            .with_base_url(Some(String::new()));
        assert_eq!(unchanged.base_url, "http://env.local/api");
    }
}
