//! Configuration for the function runtime.
//!
//! Loaded from an optional TOML file; CLI flags and `SWITCHER_*` environment
//! variables are applied on top by the binary.
//!
//! ```toml
//! [function]
//! default-ttl-seconds = 60
//!
//! [server]
//! address = "0.0.0.0:9443"
//! tls-certs-dir = "/tls/server"
//!
//! [logging]
//! debug = false
//! format = "json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// TTL attached to every response unless configured otherwise.
pub const DEFAULT_TTL_SECONDS: u64 = 60;

/// Address composition functions conventionally listen on.
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:9443";

fn default_ttl_seconds() -> u64 {
    DEFAULT_TTL_SECONDS
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SwitcherConfig {
    #[serde(default)]
    pub function: FunctionConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings passed to the run orchestrator.
#[derive(Debug, Clone, bon::Builder, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FunctionConfig {
    /// TTL hint set on every response, in seconds.
    #[builder(default = DEFAULT_TTL_SECONDS)]
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FunctionConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }
}

/// gRPC listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,

    /// Directory holding `tls.crt`, `tls.key` and `ca.crt` for mutual TLS.
    pub tls_certs_dir: Option<PathBuf>,

    /// Serve plaintext gRPC.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            tls_certs_dir: None,
            insecure: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl SwitcherConfig {
    /// Load configuration from `path`, or defaults when no path is given.
    ///
    /// An explicitly named file that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            tracing::debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_toml(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(?path, "Loaded config");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}
