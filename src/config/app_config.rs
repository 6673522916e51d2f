use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::store::{
    FileStoreConfig, InMemoryStoreConfig, StoreConfig, StoreType,
};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub store: StoreSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// History store settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Backend name, see `StoreType::from_str`
    pub backend: String,
    /// Root directory for the file backend
    pub path: String,
    /// Optional size quota for the in-memory backend
    pub quota_bytes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            path: ".ai-studio/history".to_string(),
            quota_bytes: None,
        }
    }
}

impl StoreSettings {
    /// Resolves the settings into a concrete store configuration
    pub fn to_store_config(&self) -> Result<StoreConfig, DomainError> {
        match StoreType::from_str(&self.backend) {
            Some(StoreType::InMemory) => {
                let mut config = InMemoryStoreConfig::default();

                if let Some(quota) = self.quota_bytes {
                    config = config.with_quota_bytes(quota);
                }

                Ok(StoreConfig::InMemory(config))
            }
            Some(StoreType::File) => Ok(StoreConfig::File(FileStoreConfig::new(&self.path))),
            None => Err(DomainError::configuration(format!(
                "Unknown store backend '{}'",
                self.backend
            ))),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
