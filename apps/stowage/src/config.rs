//! # Configuration
//!
//! Application configuration loaded from an optional TOML file.
//!
//! ```toml
//! [rules]
//! capacity_per_strength = 4
//! encumbered_above_percent = 50
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! cors_origins = ["http://localhost:30000"]
//! ```
//!
//! ## Environment Overrides
//!
//! - `STOWAGE_API_KEY`: API key required as a Bearer token (empty disables)
//! - `STOWAGE_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*"

use serde::{Deserialize, Serialize};
use std::path::Path;
use stowage_core::{Rules, StowageError};

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "STOWAGE_API_KEY";

/// Environment variable holding the allowed CORS origins.
pub const ENV_CORS_ORIGINS: &str = "STOWAGE_CORS_ORIGINS";

/// Maximum configuration file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// CONFIG STRUCTURES
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. `None` allows localhost only; `["*"]` allows all.
    pub cors_origins: Option<Vec<String>>,
    /// Bearer API key. `None` disables authentication.
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: None,
            api_key: None,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// House rules for weighing and encumbrance.
    pub rules: Rules,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, StowageError> {
        toml::from_str(text).map_err(|e| {
            StowageError::DeserializationError(format!("Failed to parse config TOML: {}", e))
        })
    }

    /// Load configuration from `path` (defaults when `None`) and apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, StowageError> {
        let config = match path {
            Some(path) => {
                let metadata = std::fs::metadata(path).map_err(|e| {
                    StowageError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
                })?;
                if metadata.len() > MAX_CONFIG_FILE_SIZE {
                    return Err(StowageError::IoError(format!(
                        "Config file size {} bytes exceeds maximum allowed {} bytes",
                        metadata.len(),
                        MAX_CONFIG_FILE_SIZE
                    )));
                }
                let text = std::fs::read_to_string(path)
                    .map_err(|e| StowageError::IoError(format!("Read config: {}", e)))?;
                let config = Self::from_toml_str(&text)?;
                tracing::info!(path = %path.display(), "Configuration loaded");
                config
            }
            None => Self::default(),
        };

        Ok(config.with_env_overrides(
            std::env::var(ENV_API_KEY).ok(),
            std::env::var(ENV_CORS_ORIGINS).ok(),
        ))
    }

    /// Apply override values as read from the environment.
    ///
    /// An empty API key disables authentication; origins are split on commas.
    #[must_use]
    pub fn with_env_overrides(mut self, api_key: Option<String>, cors: Option<String>) -> Self {
        if let Some(key) = api_key {
            self.server.api_key = Some(key);
        }
        if let Some(origins) = cors {
            self.server.cors_origins = Some(
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }
        self.server.api_key = self.server.api_key.filter(|k| !k.is_empty());
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn house_rules_and_server_section() {
        let config = AppConfig::from_toml_str(
            r#"
            [rules]
            capacity_per_strength = 5
            heavy_ammo_unit_weight = 1

            [server]
            port = 9000
            cors_origins = ["http://localhost:30000"]
            "#,
        )
        .unwrap();

        assert_eq!(config.rules.capacity_per_strength, 5);
        assert_eq!(config.rules.heavy_ammo_unit_weight.hundredths(), 100);
        assert_eq!(config.rules.encumbered_above_percent, 50);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(
            config.server.cors_origins,
            Some(vec!["http://localhost:30000".to_string()])
        );
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            AppConfig::from_toml_str("[server]\nport = \"high\""),
            Err(StowageError::DeserializationError(_))
        ));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let config = AppConfig::default().with_env_overrides(
            Some("secret".to_string()),
            Some("http://a.test, http://b.test,".to_string()),
        );
        assert_eq!(config.server.api_key.as_deref(), Some("secret"));
        assert_eq!(
            config.server.cors_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
    }

    #[test]
    fn empty_api_key_disables_auth() {
        let mut config = AppConfig::default();
        config.server.api_key = Some("from-file".to_string());
        let config = config.with_env_overrides(Some(String::new()), None);
        assert_eq!(config.server.api_key, None);
    }
}
