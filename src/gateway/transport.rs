use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::errors::{GatewayError, Result};

pub const UNAUTHORIZED: u16 = 401;

/// raw gateway reply, status plus body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
}

impl GatewayResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == UNAUTHORIZED
    }

    /// body as json
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).map_err(|e| GatewayError::Decode {
            message: e.to_string(),
        })
    }
}

/// how the client reaches the gateway
///
/// Implementations return every HTTP status as a response; only failures to
/// get a response at all are errors.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// POST a json body, with `Authorization: Token <auth_token>` when given
    async fn post_json(
        &self,
        url: &str,
        auth_token: Option<&str>,
        body: &Value,
    ) -> Result<GatewayResponse>;
}

/// transport over a reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// client with the configured request timeout
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::Configuration {
                message: format!("http client: {e}"),
            })?;
        Ok(Self::new(http))
    }
}

#[async_trait]
impl GatewayTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        auth_token: Option<&str>,
        body: &Value,
    ) -> Result<GatewayResponse> {
        let mut req = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        if let Some(token) = auth_token {
            req = req.header(AUTHORIZATION, format!("Token {token}"));
        }

        let resp = req.send().await.map_err(|e| GatewayError::Transport {
            message: e.to_string(),
        })?;
        let status = resp.status().as_u16();
        let text = resp.text().await.map_err(|e| GatewayError::Transport {
            message: e.to_string(),
        })?;

        Ok(GatewayResponse::new(status, text))
    }
}
