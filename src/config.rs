//! Application Configuration Module
//! JSON settings file with a default for every field.

use crate::scoring::{BuyerWeights, ScoringModel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable pointing at an alternative settings file.
pub const CONFIG_ENV_VAR: &str = "GREENLENS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "greenlens.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Open the containing folder after writing a report.
    pub open_after_export: bool,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            open_after_export: false,
            chart_width: 900,
            chart_height: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// CSV loaded at start-up instead of the bundled sample.
    pub data_path: Option<PathBuf>,
    pub max_upload_mb: u64,
    pub scoring_model: ScoringModel,
    pub buyer_weights: BuyerWeights,
    pub default_top_n: usize,
    pub export: ExportSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            max_upload_mb: 200,
            scoring_model: ScoringModel::default(),
            buyer_weights: BuyerWeights::default(),
            default_top_n: 10,
            export: ExportSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings from `GREENLENS_CONFIG` or `./greenlens.json`.
    /// A missing default file is silent; any other problem logs a warning
    /// and falls back to defaults.
    pub fn load() -> Self {
        let (path, explicit) = match std::env::var(CONFIG_ENV_VAR) {
            Ok(p) => (PathBuf::from(p), true),
            Err(_) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !explicit && !path.exists() {
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(config) => {
                info!(path = %path.display(), "Configuration loaded");
                config
            }
            Err(e) => {
                warn!(error = %e, "Using default configuration");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.max_upload_mb, 200);
        assert_eq!(config.max_upload_bytes(), 200 * 1024 * 1024);
        assert_eq!(config.default_top_n, 10);
        assert_eq!(config.scoring_model, ScoringModel::Balanced);
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"max_upload_mb": 5, "buyer_weights": {{"lead_time": 40}}, "scoring_model": {{"kind": "weighted"}}}}"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_upload_mb, 5);
        assert_eq!(config.buyer_weights.lead_time, 40.0);
        assert_eq!(config.buyer_weights.sustainability, 50.0);
        assert!(matches!(config.scoring_model, ScoringModel::Weighted { .. }));
        assert_eq!(config.export.chart_width, 900);
    }

    #[test]
    fn test_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            AppConfig::from_file(Path::new("/nonexistent/greenlens.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
