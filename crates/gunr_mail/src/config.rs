//! Mailgun credentials.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{MailError, MailResult};

/// API key environment variable.
pub const API_KEY_ENV: &str = "MAILGUN_API_KEY";
/// Sending domain environment variable.
pub const API_DOMAIN_ENV: &str = "MAILGUN_API_DOMAIN";
/// Optional API base override, e.g. `https://api.eu.mailgun.net`.
pub const API_BASE_ENV: &str = "MAILGUN_API_BASE";

pub const DEFAULT_API_BASE: &str = "https://api.mailgun.net";

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

/// Mailgun client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailgunConfig {
    pub api_key: String,
    pub api_domain: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl MailgunConfig {
    pub fn new(api_key: impl Into<String>, api_domain: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_domain: api_domain.into(),
            base_url: default_base_url(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a config from the environment alone.
    pub fn from_env() -> MailResult<Self> {
        Self::resolve(None, None)
    }

    /// Build a config from explicit values, falling back to
    /// `MAILGUN_API_KEY` / `MAILGUN_API_DOMAIN` for whatever is missing.
    pub fn resolve(api_key: Option<String>, api_domain: Option<String>) -> MailResult<Self> {
        Self::from_parts(
            api_key.or_else(|| env::var(API_KEY_ENV).ok()),
            api_domain.or_else(|| env::var(API_DOMAIN_ENV).ok()),
            env::var(API_BASE_ENV).ok(),
        )
    }

    fn from_parts(
        api_key: Option<String>,
        api_domain: Option<String>,
        base_url: Option<String>,
    ) -> MailResult<Self> {
        let api_key = required(api_key, "apiKey")?;
        let api_domain = required(api_domain, "apiDomain")?;
        let config = Self::new(api_key, api_domain);
        Ok(match base_url.filter(|url| !url.is_empty()) {
            Some(url) => config.with_base_url(url),
            None => config,
        })
    }

    /// Messages endpoint for the configured domain.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/v3/{}/messages",
            self.base_url.trim_end_matches('/'),
            self.api_domain
        )
    }
}

fn required(value: Option<String>, key: &'static str) -> MailResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(MailError::MissingCredential(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        let config = MailgunConfig::from_parts(
            Some("key-123".to_string()),
            Some("mg.example.com".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(config.api_key, "key-123");
        assert_eq!(config.base_url, DEFAULT_API_BASE);
        assert_eq!(
            config.messages_url(),
            "https://api.mailgun.net/v3/mg.example.com/messages"
        );
    }

    #[test]
    fn test_missing_key_is_named() {
        let err = MailgunConfig::from_parts(None, Some("mg.example.com".to_string()), None)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Mailgun requires key \"apiKey\" but was not found."
        );

        let err =
            MailgunConfig::from_parts(Some("key".to_string()), Some(String::new()), None)
                .unwrap_err();
        assert!(matches!(err, MailError::MissingCredential("apiDomain")));
    }

    #[test]
    fn test_base_url_override() {
        let config = MailgunConfig::from_parts(
            Some("key".to_string()),
            Some("mg.example.com".to_string()),
            Some("https://api.eu.mailgun.net/".to_string()),
        )
        .unwrap();
        assert_eq!(
            config.messages_url(),
            "https://api.eu.mailgun.net/v3/mg.example.com/messages"
        );
    }

    #[test]
    fn test_explicit_values_win() {
        let config = MailgunConfig::resolve(
            Some("explicit-key".to_string()),
            Some("explicit.example.com".to_string()),
        )
        .unwrap();
        assert_eq!(config.api_key, "explicit-key");
        assert_eq!(config.api_domain, "explicit.example.com");
    }
}
