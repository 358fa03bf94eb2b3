use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::messages::Language;

/// Application-level constants
pub const APP_NAME: &str = "Medattest";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default polling ceiling for document analysis, in seconds.
pub const DEFAULT_ANALYZE_TIMEOUT_SECS: u64 = 120;

/// Default bind address for the HTTP API.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:7071";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Runtime settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub analyzer_endpoint: String,
    pub analyzer_key: String,
    pub analyzer_id: String,
    pub analyze_timeout: Duration,
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub default_lang: Language,
}

impl Settings {
    /// Resolve settings from the process environment.
    ///
    /// The analyzer endpoint, key and analyzer id are required; everything
    /// else has a sensible default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let analyzer_endpoint = required("ANALYZER_ENDPOINT")?;
        let analyzer_key = required("ANALYZER_KEY")?;
        let analyzer_id = required("ANALYZER_ID")?;

        let analyze_timeout = match std::env::var("ANALYZER_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidVar {
                    var: "ANALYZER_TIMEOUT_SECS",
                    reason: format!("expected whole seconds, got {raw:?}"),
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_ANALYZE_TIMEOUT_SECS),
        };

        let db_path = std::env::var("MEDATTEST_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_db_path());

        let bind_addr = std::env::var("MEDATTEST_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidVar {
                var: "MEDATTEST_ADDR",
                reason: format!("{e}"),
            })?;

        let default_lang = std::env::var("MEDATTEST_LANG")
            .unwrap_or_default()
            .parse()
            .unwrap_or_default();

        Ok(Self {
            analyzer_endpoint,
            analyzer_key,
            analyzer_id,
            analyze_timeout,
            db_path,
            bind_addr,
            default_lang,
        })
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

/// Get the application data directory
/// ~/Medattest/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

fn default_db_path() -> PathBuf {
    app_data_dir().join("medattest.db")
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "info,medattest=debug"
}
