// src/config.rs
// =============================================================================
// Settings for all subcommands, with sensible defaults.
//
// Values come from three layers, later ones winning:
// 1. Settings::default()
// 2. an optional TOML file (--config settings.toml)
// 3. command-line flags (applied in main.rs)
//
// Example file:
//
//   [crawl]
//   seed_url = "https://example.com"
//   max_depth = 2
//   workers = 8
//
//   [database]
//   path = "index.db"
//
//   [server]
//   port = 8080
// =============================================================================

use crate::web::DEFAULT_USER_AGENT;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("config error: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub crawl: CrawlSettings,
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlSettings {
    /// Where the crawl starts; required by `crawl` only
    pub seed_url: Option<String>,
    /// 1 = only the seed page
    pub max_depth: usize,
    pub workers: usize,
    /// Per-request timeout
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            seed_url: None,
            max_depth: 1,
            workers: 4,
            timeout_seconds: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("wordcrawl.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Settings {
    /// Reads settings from a TOML file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` if given, otherwise returns the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    // Checks:
    // - crawl.max_depth must be at least 1
    // - crawl.workers must be at least 1
    // - crawl.timeout_seconds must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crawl.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        if self.crawl.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".into()));
        }
        if self.crawl.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn seed_url(&self) -> Result<&str, ConfigError> {
        self.crawl
            .seed_url
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("no seed URL given (argument or crawl.seed_url)".into()))
    }

    // Resolves the listen host (an IP literal or a name such as
    // "localhost") and takes the first address it maps to
    pub async fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.server.host.as_str();
        let port = self.server.port;
        let invalid = |reason: String| {
            ConfigError::Invalid(format!("invalid listen address {host}:{port}: {reason}"))
        };

        let mut addrs = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| invalid(e.to_string()))?;
        addrs
            .next()
            .ok_or_else(|| invalid("host resolves to no address".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_settings(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.crawl.max_depth, 1);
        assert_eq!(settings.crawl.workers, 4);
        assert_eq!(settings.crawl.timeout_seconds, 10);
        assert_eq!(settings.database.path, PathBuf::from("wordcrawl.db"));
        assert_eq!(settings.server.port, 8080);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let file = write_settings(
            r#"
            [crawl]
            seed_url = "https://example.com"
            max_depth = 3

            [server]
            port = 9000
            "#,
        );
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.seed_url().unwrap(), "https://example.com");
        assert_eq!(settings.crawl.max_depth, 3);
        assert_eq!(settings.crawl.workers, 4);
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let file = write_settings("[crawl]\nmax_dept = 3\n");
        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(Settings::load_or_default(None).unwrap(), Settings::default());
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut settings = Settings::default();
        settings.crawl.max_depth = 0;
        assert!(settings.validate().unwrap_err().to_string().contains("max_depth"));

        let mut settings = Settings::default();
        settings.crawl.workers = 0;
        assert!(settings.validate().unwrap_err().to_string().contains("workers"));

        let mut settings = Settings::default();
        settings.crawl.timeout_seconds = 0;
        assert!(settings.validate().unwrap_err().to_string().contains("timeout"));
    }

    #[test]
    fn test_missing_seed_url() {
        assert!(Settings::default().seed_url().is_err());
    }

    #[tokio::test]
    async fn test_socket_addr_from_ip() {
        let addr = Settings::default().socket_addr().await.unwrap();
        assert_eq!(addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
    }

    #[tokio::test]
    async fn test_socket_addr_resolves_hostname() {
        let mut settings = Settings::default();
        settings.server.host = "localhost".into();
        settings.server.port = 9000;

        let addr = settings.socket_addr().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9000);
    }
}
