use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wsc_registry::db::PoolSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Application cluster whose view of the registry commands operate on.
    #[serde(default = "default_application_cluster")]
    pub application_cluster: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_secs: u64,
}

fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("WSCCTL_DB_PATH") {
        return PathBuf::from(path);
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wsc")
        .join("registry.db")
}

fn default_application_cluster() -> Option<String> {
    std::env::var("WSCCTL_APPLICATION_CLUSTER")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

fn default_max_connections() -> u32 {
    std::env::var("WSCCTL_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5)
}

fn default_acquire_timeout() -> u64 {
    std::env::var("WSCCTL_ACQUIRE_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(30)
}

fn default_busy_timeout() -> u64 {
    std::env::var("WSCCTL_BUSY_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            application_cluster: default_application_cluster(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            busy_timeout_secs: default_busy_timeout(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Read a JSON config file; missing keys fall back to the environment defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn with_overrides(
        mut self,
        db_path: Option<PathBuf>,
        application_cluster: Option<String>,
    ) -> Self {
        if let Some(db_path) = db_path {
            self.db_path = db_path;
        }
        if let Some(application_cluster) = application_cluster {
            self.application_cluster = Some(application_cluster);
        }
        self
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections.max(1),
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
            busy_timeout: Duration::from_secs(self.busy_timeout_secs),
        }
    }
}
