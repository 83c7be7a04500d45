use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::errors::{Result, ViError};
use crate::core::models::max_count::MaxCount;

/// Default vim25 API version announced in the `SOAPAction` header.
pub const DEFAULT_API_VERSION: &str = "7.0";

/// Top-level configuration read from `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub collector: CollectorSection,
}

impl AppConfig {
    /// Default config location: `{config_dir}/vievents/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("vievents").join("config.toml"))
    }

    /// Load and validate the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ViError::InvalidConfig {
                detail: format!("{} not found", path.display()),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| ViError::InvalidConfig {
            detail: format!("Failed to parse {}: {e}", path.display()),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given, else the default location if it exists,
    /// else built-in defaults. An explicit path that does not exist is an error.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.server.url {
            validate_url(url)?;
        }
        if self.server.timeout_secs == 0 {
            return Err(ViError::InvalidConfig {
                detail: "server.timeout_secs must be greater than zero".into(),
            });
        }
        let max_count = MaxCount::try_from(self.collector.max_count).map_err(|e| ViError::InvalidConfig {
            detail: format!("collector.max_count: {e}"),
        })?;
        if max_count.get() < 0 {
            return Err(ViError::InvalidConfig {
                detail: format!("collector.max_count must not be negative, got {max_count}"),
            });
        }
        Ok(())
    }
}

/// The `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// SDK endpoint, e.g. `https://vcenter.example.com/sdk`.
    pub url: Option<String>,
    pub username: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl ServerSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// The `[collector]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorSection {
    /// Events requested per history read.
    #[serde(default = "default_max_count")]
    pub max_count: i64,
}

impl Default for CollectorSection {
    fn default() -> Self {
        Self {
            max_count: default_max_count(),
        }
    }
}

fn default_max_count() -> i64 {
    100
}

/// Check that `url` is an absolute http(s) URL.
pub fn validate_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(ViError::InvalidConfig {
            detail: format!("server URL must start with http:// or https://, got '{url}'"),
        }),
    }
}
