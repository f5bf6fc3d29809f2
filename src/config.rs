use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Glycotrack";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
/// 20 MB, multipart overhead included.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "glycotrack=info,tower_http=warn"
}

/// Get the application data directory
/// ~/Glycotrack/ on all platforms, falling back to the working directory.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default SQLite database location.
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("glycotrack.db")
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Settings for the hosted summarization model.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// `None` keeps the server up; summarization fails per request instead.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

/// Server configuration. Built once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Origin allowed by CORS, with credentials. `None` allows any origin
    /// without credentials.
    pub frontend_origin: Option<String>,
    pub database_path: PathBuf,
    pub max_upload_bytes: usize,
    pub llm: LlmConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            frontend_origin: None,
            database_path: default_database_path(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            llm: LlmConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset so `FOO=` in a shell profile
    /// does not override a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let bind_addr = match get("BIND_ADDR") {
            Some(v) => parse_value("BIND_ADDR", &v)?,
            None => defaults.bind_addr,
        };
        let port = match get("PORT") {
            Some(v) => parse_value("PORT", &v)?,
            None => defaults.port,
        };
        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(v) => parse_value("MAX_UPLOAD_BYTES", &v)?,
            None => defaults.max_upload_bytes,
        };
        let timeout_secs = match get("LLM_TIMEOUT_SECS") {
            Some(v) => parse_value("LLM_TIMEOUT_SECS", &v)?,
            None => defaults.llm.timeout_secs,
        };

        Ok(Self {
            bind_addr,
            port,
            frontend_origin: get("FRONTEND_ORIGIN"),
            database_path: get("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            max_upload_bytes,
            llm: LlmConfig {
                api_key: get("ANTHROPIC_API_KEY"),
                model: get("ANTHROPIC_MODEL").unwrap_or(defaults.llm.model),
                base_url: get("ANTHROPIC_BASE_URL").unwrap_or(defaults.llm.base_url),
                timeout_secs,
            },
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_empty() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.llm.model, DEFAULT_ANTHROPIC_MODEL);
        assert_eq!(config.llm.base_url, DEFAULT_ANTHROPIC_BASE_URL);
        assert!(config.llm.api_key.is_none());
        assert!(config.frontend_origin.is_none());
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn reads_all_keys() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "8081"),
            ("BIND_ADDR", "127.0.0.1"),
            ("FRONTEND_ORIGIN", "http://localhost:5173"),
            ("DATABASE_PATH", "/tmp/a1c.db"),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("ANTHROPIC_MODEL", "claude-test"),
            ("LLM_TIMEOUT_SECS", "5"),
            ("MAX_UPLOAD_BYTES", "1024"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8081");
        assert_eq!(config.frontend_origin.as_deref(), Some("http://localhost:5173"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/a1c.db"));
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.llm.model, "claude-test");
        assert_eq!(config.llm.timeout_secs, 5);
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("ANTHROPIC_MODEL", "  "), ("PORT", "")])).unwrap();
        assert_eq!(config.llm.model, DEFAULT_ANTHROPIC_MODEL);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "PORT",
                value: "eighty".into()
            }
        );
    }

    #[test]
    fn database_path_under_app_data() {
        assert!(default_database_path().starts_with(app_data_dir()));
        assert!(app_data_dir().ends_with("Glycotrack"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
