//! # Console Configuration
//!
//! Sources, highest priority first:
//!
//! 1. Environment variables (`ADMIN_CONSOLE_API_URL`, `ADMIN_CONSOLE_TIMEOUT_SECS`,
//!    `ADMIN_CONSOLE_PAGE_SIZE`, `ADMIN_CONSOLE_CREDENTIALS_DIR`)
//! 2. `config.json` in the config directory
//! 3. Defaults
//!
//! ```json
//! {
//!   "apiBaseUrl": "https://admin.example.com/api",
//!   "requestTimeoutSecs": 15,
//!   "defaultPageSize": 25
//! }
//! ```

use crate::error::ConsoleError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "ADMIN_CONSOLE_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "ADMIN_CONSOLE_TIMEOUT_SECS";
pub const ENV_PAGE_SIZE: &str = "ADMIN_CONSOLE_PAGE_SIZE";
pub const ENV_CREDENTIALS_DIR: &str = "ADMIN_CONSOLE_CREDENTIALS_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Page size of every store until a caller changes it.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Capacity of each store's request channel.
    #[serde(default = "default_store_buffer")]
    pub store_buffer: usize,

    #[serde(default = "default_credentials_dir")]
    pub credentials_dir: PathBuf,
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api".to_owned()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    store_framework::DEFAULT_PAGE_SIZE
}

fn default_store_buffer() -> usize {
    32
}

fn default_credentials_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("credentials"))
        .unwrap_or_else(|| PathBuf::from(".admin-console").join("credentials"))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "admin-console", "admin-console")
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            default_page_size: default_page_size(),
            store_buffer: default_store_buffer(),
            credentials_dir: default_credentials_dir(),
        }
    }
}

impl ConsoleConfig {
    /// Reads `config.json` from `dir`. A missing file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self, ConsoleError> {
        let path = dir.join(CONFIG_FILE);
        let config = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };
        config.validated()
    }

    /// Loads from the platform config directory, then applies the environment.
    pub fn load_default() -> Result<Self, ConsoleError> {
        let config = match project_dirs() {
            Some(dirs) => Self::load(dirs.config_dir())?,
            None => Self::default(),
        };
        let config = config.apply_env()?;
        info!(api = %config.api_base_url, page_size = config.default_page_size, "Configuration loaded");
        Ok(config)
    }

    pub fn apply_env(self) -> Result<Self, ConsoleError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConsoleError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = parse(ENV_TIMEOUT_SECS, &secs)?;
        }
        if let Some(size) = lookup(ENV_PAGE_SIZE) {
            self.default_page_size = parse(ENV_PAGE_SIZE, &size)?;
        }
        if let Some(dir) = lookup(ENV_CREDENTIALS_DIR) {
            self.credentials_dir = PathBuf::from(dir);
        }
        self.validated()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validated(self) -> Result<Self, ConsoleError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConsoleError::Config("API base URL is empty".into()));
        }
        if self.default_page_size == 0 {
            return Err(ConsoleError::Config("Page size must be at least 1".into()));
        }
        if self.store_buffer == 0 {
            return Err(ConsoleError::Config("Store buffer must be at least 1".into()));
        }
        Ok(self)
    }
}

fn parse<N: std::str::FromStr>(name: &str, value: &str) -> Result<N, ConsoleError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConsoleError::Config(format!("{name} is not a number: {value}")))
}
