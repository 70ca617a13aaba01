use std::time::Duration;
use url::Url;

use super::error::{Result, XbrlError};

pub const DEFAULT_BASE_URL: &str = "https://csuite.xbrl.us/php/dispatch.php";
pub const DEFAULT_API_KEY_VAR: &str = "XBRLUS_API_KEY";
pub const DEFAULT_USER_AGENT: &str = "xbrlus/0.1.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Settings {
    pub base_url: Url,
    /// Name of the environment variable holding the API key
    pub api_key_var: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let base_url = var("XBRLUS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)
            .map_err(|e| XbrlError::config(format!("invalid XBRLUS_BASE_URL {}: {}", base_url, e)))?;

        let api_key_var = var("XBRLUS_API_KEY_VAR").unwrap_or_else(|| DEFAULT_API_KEY_VAR.to_string());

        let user_agent = var("XBRLUS_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let timeout_secs = match var("XBRLUS_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                XbrlError::config(format!("XBRLUS_TIMEOUT_SECS must be a whole number of seconds, got {}", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            api_key_var,
            user_agent,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            api_key_var: DEFAULT_API_KEY_VAR.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
