//! Service configuration, read from a JSON file at startup.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_PATH_ENV: &str = "INSTAFAKE_CONFIG_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener and CORS
    pub server: ServerConfig,
    /// Model artifact location
    pub model: ModelConfig,
    /// Profile lookups for `/predict/username`
    pub fetcher: FetcherConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Origins allowed by CORS (credentials are allowed for these)
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// JSON manifest: feature columns + classifier
    pub manifest_path: PathBuf,
    /// Intra-op threads for ONNX sessions
    pub onnx_threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Profile API origin
    pub base_url: String,
    /// Value of the `x-ig-app-id` header
    pub app_id: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Upper bound on a whole lookup, enforced by the API layer
    pub lookup_timeout_secs: u64,
    /// Report every lookup failure as 404 "not found"
    pub collapse_errors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from("model/instafake.json"),
            onnx_threads: 1,
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://i.instagram.com".to_string(),
            app_id: "936619743392459".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string(),
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
            lookup_timeout_secs: 15,
            collapse_errors: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl FetcherConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

impl AppConfig {
    /// Load from a JSON file if present, otherwise defaults. A file that
    /// exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail later, at server startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // credentialed CORS cannot use a wildcard origin
        if let Some(origin) = self.server.cors_origins.iter().find(|o| o.trim() == "*") {
            return Err(ConfigError::WildcardCorsOrigin(origin.clone()));
        }
        Ok(())
    }

    /// Config path: explicit argument, then [`CONFIG_PATH_ENV`], then `config.json`.
    pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    }
}
