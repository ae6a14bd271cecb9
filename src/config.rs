use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{GatewayError, Result};

pub const DEFAULT_BASE_URL: &str = "https://stage-api.mypayr.co.uk";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const ENV_BASE_URL: &str = "GATEWAY_API_URL";
pub const ENV_INSTITUTION_EMAIL: &str = "GATEWAY_INSTITUTION_EMAIL";
pub const ENV_INSTITUTION_PASSWORD: &str = "GATEWAY_INSTITUTION_PASSWORD";
pub const ENV_TIMEOUT_MS: &str = "GATEWAY_TIMEOUT_MS";

/// payment gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub base_url: String,
    /// institution login, not the tenant's
    #[serde(default)]
    pub institution_email: Option<String>,
    #[serde(default, skip_serializing)]
    pub institution_password: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// institution credentials borrowed from a config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            institution_email: None,
            institution_password: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.institution_email = Some(email.into());
        self.institution_password = Some(password.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// load from process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// load through an arbitrary key lookup; unset or blank keys keep defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get(ENV_BASE_URL) {
            cfg.base_url = v;
        }
        cfg.institution_email = get(ENV_INSTITUTION_EMAIL);
        cfg.institution_password = get(ENV_INSTITUTION_PASSWORD);
        if let Some(v) = get(ENV_TIMEOUT_MS) {
            cfg.timeout_ms = v.trim().parse().unwrap_or(cfg.timeout_ms);
        }
        cfg
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// join an endpoint path onto the base url
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// institution credentials, or a configuration error if either is missing
    pub fn credentials(&self) -> Result<Credentials<'_>> {
        let email = self.institution_email.as_deref().map(str::trim).unwrap_or("");
        let password = self.institution_password.as_deref().unwrap_or("");

        if email.is_empty() || password.is_empty() {
            return Err(GatewayError::Configuration {
                message: format!(
                    "{} and {} must be configured",
                    ENV_INSTITUTION_EMAIL, ENV_INSTITUTION_PASSWORD
                ),
            });
        }

        Ok(Credentials { email, password })
    }
}
