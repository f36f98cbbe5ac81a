use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_ranking_file")]
    pub ranking_file: PathBuf,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { ranking_file: default_ranking_file(), max_entries: default_max_entries() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }
fn default_ranking_file() -> PathBuf { PathBuf::from("ranking.json") }
fn default_max_entries() -> usize { 100 }
fn default_log_format() -> String { "compact".into() }

/// Load from `CONFIG_PATH` (default `config.toml`); without a file, fall back to
/// environment variables on top of the defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if std::path::Path::new(&path).exists() {
        load_from_file(&path)
    } else {
        AppConfig::from_lookup(|key| std::env::var(key).ok())
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build a config from a key lookup (normally the process environment).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = AppConfig::default();
        if let Some(host) = lookup("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            cfg.server.port = port
                .parse()
                .map_err(|e| anyhow!("SERVER_PORT is not a valid port: {e}"))?;
        }
        if let Some(threads) = lookup("TOKIO_WORKER_THREADS") {
            cfg.server.worker_threads = Some(
                threads
                    .parse()
                    .map_err(|e| anyhow!("TOKIO_WORKER_THREADS is not a number: {e}"))?,
            );
        }
        if let Some(file) = lookup("RANKING_FILE") {
            cfg.storage.ranking_file = PathBuf::from(file);
        }
        if let Some(max) = lookup("RANKING_MAX_ENTRIES") {
            cfg.storage.max_entries = max
                .parse()
                .map_err(|e| anyhow!("RANKING_MAX_ENTRIES is not a number: {e}"))?;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            cfg.logging.format = format;
        }
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ranking_file.as_os_str().is_empty() {
            return Err(anyhow!("storage.ranking_file must not be empty"));
        }
        if self.max_entries == 0 {
            return Err(anyhow!("storage.max_entries must be >= 1"));
        }
        Ok(())
    }
}
