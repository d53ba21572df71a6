use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::Path;
use thiserror::Error;

use crate::domain::models::settings::{BackendKind, Settings};

/// Settings validation errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Database URL cannot be empty for the sqlite backend")]
    EmptyDatabaseUrl,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid acquire_timeout_secs: {0}. Must be at least 1")]
    InvalidAcquireTimeout(u64),
}

const ENV_PREFIX: &str = "CONFSTORE_";
const PROJECT_CONFIG: &str = ".confstore/config.yaml";
const LOCAL_CONFIG: &str = ".confstore/local.yaml";

/// Settings loader with hierarchical merging
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. .confstore/config.yaml
    /// 3. .confstore/local.yaml (optional)
    /// 4. Environment variables (CONFSTORE_* prefix, `__` for nesting)
    pub fn load() -> Result<Settings> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Yaml::file(PROJECT_CONFIG))
            .merge(Yaml::file(LOCAL_CONFIG))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::extract(&figment).context("Failed to extract settings from figment")
    }

    /// Load settings from a specific file. Environment variables still win.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Settings> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Settings file not found: {}", path.display());
        }

        let figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::extract(&figment).with_context(|| format!("Failed to load settings from {}", path.display()))
    }

    fn extract(figment: &Figment) -> Result<Settings> {
        let settings: Settings = figment.extract()?;
        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Validate settings after loading
    pub fn validate(settings: &Settings) -> Result<(), SettingsError> {
        let backend = &settings.backend;
        if backend.kind == BackendKind::Sqlite && backend.database_url.trim().is_empty() {
            return Err(SettingsError::EmptyDatabaseUrl);
        }

        if backend.max_connections == 0 {
            return Err(SettingsError::InvalidMaxConnections(backend.max_connections));
        }

        if backend.acquire_timeout_secs == 0 {
            return Err(SettingsError::InvalidAcquireTimeout(backend.acquire_timeout_secs));
        }

        let logging = &settings.logging;
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(SettingsError::InvalidLogLevel(logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&logging.format.as_str()) {
            return Err(SettingsError::InvalidLogFormat(logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&logging.rotation.as_str()) {
            return Err(SettingsError::InvalidRotation(logging.rotation.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.backend.kind, BackendKind::Sqlite);
        assert_eq!(settings.backend.database_url, "sqlite:.confstore/confstore.db");
        assert_eq!(settings.backend.max_connections, 5);
        assert_eq!(settings.logging.level, "info");
        SettingsLoader::validate(&settings).expect("Default settings should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
backend:
  kind: memory
  max_connections: 2
logging:
  level: debug
  format: json
  log_dir: /var/log/confstore
  rotation: hourly
";

        let settings: Settings = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(settings.backend.kind, BackendKind::Memory);
        assert_eq!(settings.backend.max_connections, 2);
        assert_eq!(settings.backend.database_url, "sqlite:.confstore/confstore.db");
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.format, "json");
        assert_eq!(settings.logging.log_dir.as_deref(), Some("/var/log/confstore"));
        assert_eq!(settings.logging.rotation, "hourly");

        SettingsLoader::validate(&settings).expect("Parsed settings should be valid");
    }

    #[test]
    fn test_validate_zero_max_connections() {
        let mut settings = Settings::default();
        settings.backend.max_connections = 0;

        assert!(matches!(
            SettingsLoader::validate(&settings),
            Err(SettingsError::InvalidMaxConnections(0))
        ));
    }

    #[test]
    fn test_validate_empty_database_url() {
        let mut settings = Settings::default();
        settings.backend.database_url = "  ".to_string();
        assert!(matches!(
            SettingsLoader::validate(&settings),
            Err(SettingsError::EmptyDatabaseUrl)
        ));

        settings.backend.kind = BackendKind::Memory;
        assert!(SettingsLoader::validate(&settings).is_ok());
    }

    #[test]
    fn test_validate_zero_acquire_timeout() {
        let mut settings = Settings::default();
        settings.backend.acquire_timeout_secs = 0;
        assert!(matches!(
            SettingsLoader::validate(&settings),
            Err(SettingsError::InvalidAcquireTimeout(0))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "loud".to_string();

        match SettingsLoader::validate(&settings).unwrap_err() {
            SettingsError::InvalidLogLevel(level) => assert_eq!(level, "loud"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut settings = Settings::default();
        settings.logging.format = "xml".to_string();
        assert!(matches!(
            SettingsLoader::validate(&settings),
            Err(SettingsError::InvalidLogFormat(f)) if f == "xml"
        ));
    }

    #[test]
    fn test_validate_invalid_rotation() {
        let mut settings = Settings::default();
        settings.logging.rotation = "weekly".to_string();
        assert!(matches!(
            SettingsLoader::validate(&settings),
            Err(SettingsError::InvalidRotation(r)) if r == "weekly"
        ));
    }

    #[test]
    fn test_load_from_file() {
        let file = write_yaml("backend:\n  database_url: sqlite:/tmp/custom.db\n");
        let settings = SettingsLoader::load_from_file(file.path()).unwrap();
        assert_eq!(settings.backend.database_url, "sqlite:/tmp/custom.db");
        assert_eq!(settings.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = SettingsLoader::load_from_file("/nonexistent/confstore.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file_rejects_invalid() {
        let file = write_yaml("logging:\n  format: xml\n");
        let err = SettingsLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.chain().any(|cause| cause.to_string().contains("xml")));
    }

    #[test]
    fn test_env_override() {
        let file = write_yaml("logging:\n  level: warn\n");

        temp_env::with_vars(
            [
                ("CONFSTORE_LOGGING__LEVEL", Some("debug")),
                ("CONFSTORE_BACKEND__MAX_CONNECTIONS", Some("7")),
                ("CONFSTORE_BACKEND__KIND", Some("memory")),
            ],
            || {
                let settings = SettingsLoader::load_from_file(file.path()).unwrap();
                assert_eq!(settings.logging.level, "debug");
                assert_eq!(settings.backend.max_connections, 7);
                assert_eq!(settings.backend.kind, BackendKind::Memory);
            },
        );
    }
}
