//! Configuration System
//!
//! Layered configuration for the backend connection, marker resolution limits and
//! logging. Sources, lowest precedence first: defaults, the global config file,
//! workspace config files, then `WHEN__*` environment variables.

use crate::context::ResolverSettings;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

mod sources;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhenConfig {
    /// Backend solver connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Context marker resolution limits
    #[serde(default)]
    pub resolver: ResolverSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base url; policies are posted to `{url}/solver`
    #[serde(default = "default_backend_url")]
    pub url: String,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl BackendConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("Backend url cannot be empty".to_string());
        }
        let url = reqwest::Url::parse(&self.url)
            .map_err(|e| format!("Invalid backend url '{}': {}", self.url, e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!("Backend url must be http or https, got '{}'", url.scheme()));
        }
        if self.connect_timeout_ms == 0 || self.request_timeout_ms == 0 {
            return Err("Backend timeouts must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Backend(String),
    Resolver(String),
    Logging(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Backend(msg) => write!(f, "Backend: {}", msg),
            ValidationError::Resolver(msg) => write!(f, "Resolver: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl WhenConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.backend.validate() {
            errors.push(ValidationError::Backend(e));
        }
        if self.resolver.max_passes == 0 {
            errors.push(ValidationError::Resolver(
                "max_passes must be greater than zero".to_string(),
            ));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding every problem into one error
    pub fn validated(self) -> Result<Self, ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }

    pub fn to_toml_string(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self).map_err(|e| ApiError::ConfigError(e.to_string()))
    }
}

/// Loads `WhenConfig` from the layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace root
    pub fn load(workspace_root: &Path) -> Result<WhenConfig, ApiError> {
        let builder = Config::builder();
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let config = builder.add_source(Self::environment()).build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load configuration from one explicit file (environment still applies)
    pub fn load_from_file(path: &Path) -> Result<WhenConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(true))
            .add_source(Self::environment())
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        sources::global_file::global_config_path()
    }

    fn environment() -> Environment {
        Environment::with_prefix("WHEN")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }
}
