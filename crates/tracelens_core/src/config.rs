use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ApiError;

/// Endpoint assumed when the config file does not name one. Matches the
/// default bind address of the reference backend.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:6006";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the observability backend.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl AppConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }
}

pub struct AppConfigStore {
    path: PathBuf,
}

impl AppConfigStore {
    pub fn new() -> Result<Self, ApiError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ApiError::Io(std::io::Error::other("Could not find config directory")))?;

        let app_dir = config_dir.join("tracelens");
        fs::create_dir_all(&app_dir).map_err(ApiError::Io)?;

        Ok(Self {
            path: app_dir.join("config.json"),
        })
    }

    pub fn from_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<AppConfig, ApiError> {
        if !self.path.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.path).map_err(ApiError::Io)?;
        let config: AppConfig =
            serde_json::from_str(&content).map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(config)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = AppConfigStore::from_path(dir.path().join("config.json"));

        let config = store.load().unwrap();
        assert!(config.endpoint.is_none());
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn endpoint_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"endpoint": "https://obs.internal:8443"}"#).unwrap();

        let config = AppConfigStore::from_path(path).load().unwrap();
        assert_eq!(config.endpoint(), "https://obs.internal:8443");
    }

    #[test]
    fn malformed_file_reports_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        let error = AppConfigStore::from_path(path).load().unwrap_err();
        assert!(matches!(error, ApiError::InvalidConfig(_)));
    }
}
