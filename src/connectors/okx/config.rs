//! OKX provider configuration

use serde::{Deserialize, Serialize};
use std::env;

use super::constants::*;
use crate::types::FeeSchedule;

/// Connection and credential settings for [`super::OkxRestClient`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkxConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub api_passphrase: Option<String>,
    /// HTTP request timeout (seconds)
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Values used for fee fields the account endpoint does not return
    pub fallback_fees: FeeSchedule,
}

impl Default for OkxConfig {
    fn default() -> Self {
        Self {
            base_url: OKX_API_URL.to_string(),
            api_key: None,
            api_secret: None,
            api_passphrase: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fallback_fees: FeeSchedule::default(),
        }
    }
}

impl OkxConfig {
    /// Fills any missing credential from `OKX_API_KEY`, `OKX_API_SECRET`
    /// and `OKX_API_PASSPHRASE`. Configured values take precedence.
    pub fn with_env_credentials(mut self) -> Self {
        self.api_key = self.api_key.filter(|v| !v.is_empty()).or_else(|| read_env(API_KEY_ENV));
        self.api_secret = self.api_secret.filter(|v| !v.is_empty()).or_else(|| read_env(API_SECRET_ENV));
        self.api_passphrase = self
            .api_passphrase
            .filter(|v| !v.is_empty())
            .or_else(|| read_env(API_PASSPHRASE_ENV));
        self
    }

    pub fn has_credentials(&self) -> bool {
        [&self.api_key, &self.api_secret, &self.api_passphrase]
            .iter()
            .all(|v| v.as_deref().map_or(false, |s| !s.is_empty()))
    }
}

fn read_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OkxConfig::default();
        assert_eq!(config.base_url, "https://www.okx.com");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.user_agent, "OKX-Instrument-Analyzer/1.0");
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_configured_credentials_win_over_env() {
        let config = OkxConfig {
            api_key: Some("key".to_string()),
            api_secret: Some("secret".to_string()),
            api_passphrase: Some("pass".to_string()),
            ..OkxConfig::default()
        }
        .with_env_credentials();

        assert!(config.has_credentials());
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.api_secret.as_deref(), Some("secret"));
    }

    #[test]
    fn test_partial_credentials_are_incomplete() {
        let config = OkxConfig {
            api_key: Some("key".to_string()),
            api_secret: Some(String::new()),
            ..OkxConfig::default()
        };
        assert!(!config.has_credentials());
    }
}
