use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "SIGESCD_CONFIG";
pub const LOG_ENV: &str = "SIGESCD_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("maxRows must be at least 1")]
    ZeroMaxRows,
}

/// Sidecar settings. Grading policy (weights, threshold, rounding) is not here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub decimal_separator: char,
    pub max_rows: usize,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decimal_separator: ',',
            max_rows: 2000,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if cfg.max_rows == 0 {
            return Err(ConfigError::ZeroMaxRows);
        }
        Ok(cfg)
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    /// Defaults, then the file named by `SIGESCD_CONFIG`, then `SIGESCD_LOG`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = match std::env::var_os(CONFIG_ENV) {
            Some(p) if !p.is_empty() => Self::load_file(Path::new(&p))?,
            _ => Self::default(),
        };
        if let Ok(filter) = std::env::var(LOG_ENV) {
            if !filter.trim().is_empty() {
                cfg.log_filter = filter;
            }
        }
        Ok(cfg)
    }
}
