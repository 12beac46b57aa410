//! Configuration management
//!
//! Reads `config.json` from the arthabit directory:
//! ```json
//! {
//!   "authBaseUrl": "http://localhost:9898",
//!   "userBaseUrl": "http://localhost:9810",
//!   "expenseBaseUrl": "http://localhost:9820",
//!   "requestTimeoutSecs": 30
//! }
//! ```
//! Every field has a default, so a missing file is fine. Base URLs can also
//! be overridden per-invocation via `ARTHABIT_AUTH_URL`, `ARTHABIT_USER_URL`
//! and `ARTHABIT_EXPENSE_URL` (for tests and non-standard deployments).

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default base URL of the auth service
pub const DEFAULT_AUTH_BASE_URL: &str = "http://localhost:9898";
/// Default base URL of the user service
pub const DEFAULT_USER_BASE_URL: &str = "http://localhost:9810";
/// Default base URL of the expense service
pub const DEFAULT_EXPENSE_BASE_URL: &str = "http://localhost:9820";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

fn default_auth_base_url() -> String {
    DEFAULT_AUTH_BASE_URL.to_string()
}

fn default_user_base_url() -> String {
    DEFAULT_USER_BASE_URL.to_string()
}

fn default_expense_base_url() -> String {
    DEFAULT_EXPENSE_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Raw config.json structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default = "default_auth_base_url")]
    auth_base_url: String,
    #[serde(default = "default_user_base_url")]
    user_base_url: String,
    #[serde(default = "default_expense_base_url")]
    expense_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
    /// Fields we don't manage, preserved across saves
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            auth_base_url: default_auth_base_url(),
            user_base_url: default_user_base_url(),
            expense_base_url: default_expense_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            other: HashMap::new(),
        }
    }
}

/// Arthabit configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub auth_base_url: String,
    pub user_base_url: String,
    pub expense_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_base_url: default_auth_base_url(),
            user_base_url: default_user_base_url(),
            expense_base_url: default_expense_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config from the arthabit directory
    pub fn load(arthabit_dir: &Path) -> Result<Self> {
        let config_path = arthabit_dir.join("config.json");

        let raw: ConfigFile = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            ConfigFile::default()
        };

        let auth_base_url = std::env::var("ARTHABIT_AUTH_URL").unwrap_or(raw.auth_base_url);
        let user_base_url = std::env::var("ARTHABIT_USER_URL").unwrap_or(raw.user_base_url);
        let expense_base_url =
            std::env::var("ARTHABIT_EXPENSE_URL").unwrap_or(raw.expense_base_url);

        Ok(Self {
            auth_base_url: normalize_base_url(&auth_base_url, "auth")?,
            user_base_url: normalize_base_url(&user_base_url, "user")?,
            expense_base_url: normalize_base_url(&expense_base_url, "expense")?,
            request_timeout_secs: raw.request_timeout_secs,
        })
    }

    /// Save config to the arthabit directory.
    /// Preserves settings in the file that this struct doesn't manage.
    pub fn save(&self, arthabit_dir: &Path) -> Result<()> {
        let config_path = arthabit_dir.join("config.json");

        let mut raw = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str::<ConfigFile>(&content).unwrap_or_default()
        } else {
            ConfigFile::default()
        };

        raw.auth_base_url = self.auth_base_url.clone();
        raw.user_base_url = self.user_base_url.clone();
        raw.expense_base_url = self.expense_base_url.clone();
        raw.request_timeout_secs = self.request_timeout_secs;

        let content = serde_json::to_string_pretty(&raw)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Validate a base URL and strip any trailing slash so endpoint paths can be
/// appended with a plain `format!`.
fn normalize_base_url(raw: &str, service: &str) -> Result<String> {
    let trimmed = raw.trim();
    Url::parse(trimmed).with_context(|| format!("Invalid {} base URL: {}", service, trimmed))?;
    Ok(trimmed.trim_end_matches('/').to_string())
}
