use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Environment variable holding the booking API bearer token. The token is
/// never written to the config file.
pub const TOKEN_ENV_VAR: &str = "BOOKING_API_TOKEN";

/// Top-level configuration for the maitre application.
///
/// Loaded from a TOML file; each section corresponds to one concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaitreConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: BookingApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl MaitreConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MaitreConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Maximum accepted chat message length in characters.
    pub max_message_length: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_message_length: 500,
        }
    }
}

/// Outbound booking API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingApiConfig {
    /// URL prefix up to but excluding the restaurant segment.
    pub base_url_prefix: String,
    /// Restaurant (microsite) name appended to the prefix.
    pub restaurant: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl BookingApiConfig {
    /// Full base URL for restaurant-scoped endpoints.
    pub fn base_url(&self) -> String {
        format!("{}/{}", self.base_url_prefix, self.restaurant)
    }

    /// Read the bearer token from the environment.
    pub fn token_from_env() -> Result<String> {
        std::env::var(TOKEN_ENV_VAR).map_err(|_| {
            crate::error::MaitreError::Config(format!(
                "{} environment variable is required",
                TOKEN_ENV_VAR
            ))
        })
    }
}

impl Default for BookingApiConfig {
    fn default() -> Self {
        Self {
            base_url_prefix: "http://localhost:8547/api/ConsumerApi/v1/Restaurant".to_string(),
            restaurant: "TheHungryUnicorn".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Inbound chat server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
        }
    }
}
