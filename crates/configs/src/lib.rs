//! # configs
//!
//! Typed application configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. `config/bloglist.toml` (optional)
//! 3. `BLOGLIST__SECTION__KEY` environment variables (after `.env` is loaded)
//! 4. the legacy variables `PORT`, `SECRET` and `MONGODB_URI`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "config/bloglist.toml";
pub const ENV_PREFIX: &str = "BLOGLIST";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("token signing secret is not set (BLOGLIST__AUTH__TOKEN_SECRET or SECRET)")]
    MissingSecret,

    #[error("unsupported storage url `{0}`: only `memory:` is built in")]
    UnsupportedStorage(String),
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Connection string of the document store.
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
}

impl StorageConfig {
    pub fn backend(&self) -> Result<StorageBackend, ConfigError> {
        match self.url.split_once(':').map(|(scheme, _)| scheme) {
            Some("memory") => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::UnsupportedStorage(self.url.clone())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    pub token_secret: SecretString,
    /// Tokens never expire when unset.
    #[serde(default)]
    pub token_ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

/// Loads `.env` into the process environment.
///
/// Returns the file's path, or `None` when there is no `.env`. Nothing is
/// logged here since this runs before tracing is initialised.
pub fn load_env_file() -> Result<Option<PathBuf>, dotenvy::Error> {
    env_file_outcome(dotenvy::dotenv())
}

fn env_file_outcome(
    result: Result<PathBuf, dotenvy::Error>,
) -> Result<Option<PathBuf>, dotenvy::Error> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

impl AppConfig {
    /// Reads the process environment and the default file. Call
    /// [`load_env_file`] first for `.env` values to be visible.
    pub fn load() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars, Some(Path::new(DEFAULT_CONFIG_FILE)))
    }

    /// Builds the configuration from an explicit variable map.
    pub fn from_vars(
        vars: &HashMap<String, String>,
        file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3003_i64)?
            .set_default("storage.url", "memory:")?
            .set_default("auth.token_secret", "")?
            .set_default("log.level", "info")?
            .set_default("log.format", "json")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            )
            .set_override_option("server.port", vars.get("PORT").cloned())?
            .set_override_option("auth.token_secret", vars.get("SECRET").cloned())?
            .set_override_option("storage.url", vars.get("MONGODB_URI").cloned())?
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        self.storage.backend()?;
        Ok(())
    }
}
