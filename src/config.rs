use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AnimaConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub retrieval: RetrievalConfig,
    pub emotion: EmotionConfig,
    pub maintenance: MaintenanceConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    pub default_character: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_limit: usize,
    pub default_min_importance: f64,
    pub max_keywords: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmotionConfig {
    pub default_duration_secs: u64,
    pub history_hours: u32,
    pub history_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MaintenanceConfig {
    pub retention_days: u32,
    pub importance_floor: f64,
    pub access_floor: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            log_level: "info".into(),
            host: "127.0.0.1".into(),
            port: 5003,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_anima_dir()
            .join("anima.db")
            .to_string_lossy()
            .into_owned();
        Self {
            db_path,
            default_character: "companion".into(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            default_min_importance: 0.0,
            max_keywords: 10,
        }
    }
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: 3600,
            history_hours: 24,
            history_limit: 50,
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            retention_days: 365,
            importance_floor: 0.3,
            access_floor: 5,
        }
    }
}

/// Returns `~/.anima/`, or `./.anima/` when no home directory is known.
pub fn default_anima_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".anima")
}

/// Returns the default config file path: `~/.anima/config.toml`
pub fn default_config_path() -> PathBuf {
    default_anima_dir().join("config.toml")
}

impl AnimaConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            AnimaConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (ANIMA_DB, ANIMA_CHARACTER, ANIMA_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ANIMA_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("ANIMA_CHARACTER") {
            self.storage.default_character = val;
        }
        if let Ok(val) = std::env::var("ANIMA_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
