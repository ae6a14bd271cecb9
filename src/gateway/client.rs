use hourglass_rs::{SafeTimeProvider, TimeSource};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::GatewayConfig;
use crate::errors::{GatewayError, Result};
use crate::gateway::payload::OnboardingPayload;
use crate::gateway::token::{GatewayToken, TokenCache};
use crate::gateway::transport::{GatewayResponse, GatewayTransport, ReqwestTransport};
use crate::gateway::{rewrite_redirect_url, LOGIN_PATH, ONBOARDING_PATH, USER_LOGIN_PATH};

/// sends per outbound request: the first try and one retry after a 401
pub const MAX_ATTEMPTS: u32 = 2;

/// where an authenticated request stands
enum AuthState {
    NeedToken,
    HaveToken(GatewayToken),
}

/// result of a checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    /// payment page to send the tenant to
    pub url: String,
    /// onboarding ran during this checkout; the caller should persist that
    pub onboarded_now: bool,
}

/// payment gateway client
///
/// Every call authenticates through the shared [`TokenCache`]. A 401 from the
/// gateway drops the token and the request is sent once more with a fresh one;
/// any other non-2xx status is returned as is.
pub struct GatewayClient<T = ReqwestTransport> {
    transport: T,
    config: GatewayConfig,
    tokens: Arc<TokenCache>,
    time: SafeTimeProvider,
}

impl GatewayClient<ReqwestTransport> {
    /// reqwest-backed client with its own token cache and the system clock
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self::new(
            transport,
            config,
            Arc::new(TokenCache::new()),
            SafeTimeProvider::new(TimeSource::System),
        ))
    }
}

impl<T: GatewayTransport> GatewayClient<T> {
    pub fn new(
        transport: T,
        config: GatewayConfig,
        tokens: Arc<TokenCache>,
        time: SafeTimeProvider,
    ) -> Self {
        Self {
            transport,
            config,
            tokens,
            time,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    /// register a tenant with the gateway
    ///
    /// Not deduplicated here: callers track whether the tenant is already
    /// onboarded and skip the call. A repeat is forwarded as is.
    #[instrument(skip(self, payload), fields(method = "POST", path = ONBOARDING_PATH))]
    pub async fn onboard(&self, payload: &OnboardingPayload) -> Result<()> {
        let body = payload.to_wire()?;
        info!(
            target: "gateway",
            email = %payload.email,
            tenancies = payload.tenant.len(),
            installments = payload.installments.len(),
            "onboarding request"
        );

        let resp = self.send_authenticated(ONBOARDING_PATH, &body).await?;

        info!(
            target: "gateway",
            status = resp.status,
            body = if resp.body.is_empty() { "(empty body)" } else { resp.body.as_str() },
            "onboarding response"
        );
        Ok(())
    }

    /// open a payment session for a tenant, returning the redirect url
    #[instrument(skip(self), fields(method = "POST", path = USER_LOGIN_PATH))]
    pub async fn start_payment_session(&self, email: &str) -> Result<String> {
        let body = json!({ "email": email });
        info!(target: "gateway", email = %email, "payment session request");

        let resp = self.send_authenticated(USER_LOGIN_PATH, &body).await?;
        let data = resp.json()?;

        let url = match data.get("url").and_then(Value::as_str) {
            Some(url) if !url.trim().is_empty() => url,
            _ => return Err(response_shape_error("url", &data)),
        };

        let redirect = rewrite_redirect_url(url);
        info!(target: "gateway", status = resp.status, url = %redirect, "payment session response");
        Ok(redirect)
    }

    /// onboard when needed, then start a payment session
    #[instrument(skip(self, payload))]
    pub async fn checkout(
        &self,
        payload: &OnboardingPayload,
        already_onboarded: bool,
    ) -> Result<CheckoutOutcome> {
        if !payload.has_email() {
            return Err(GatewayError::IncompleteProfile {
                message: "profile email is required before paying".to_string(),
            });
        }

        if !already_onboarded {
            self.onboard(payload).await?;
        }

        let url = self.start_payment_session(payload.email.trim()).await?;
        Ok(CheckoutOutcome {
            url,
            onboarded_now: !already_onboarded,
        })
    }

    /// POST with the cached token, re-authenticating once on 401
    async fn send_authenticated(&self, path: &str, body: &Value) -> Result<GatewayResponse> {
        let url = self.config.endpoint(path);
        let mut state = AuthState::NeedToken;
        let mut attempts = 0;

        loop {
            state = match state {
                AuthState::NeedToken => AuthState::HaveToken(self.token().await?),
                AuthState::HaveToken(token) => {
                    attempts += 1;
                    let resp = self
                        .transport
                        .post_json(&url, Some(token.value()), body)
                        .await?;
                    debug!(
                        target: "gateway",
                        path = %path,
                        status = resp.status,
                        attempt = attempts,
                        "gateway response"
                    );

                    if resp.is_unauthorized() {
                        self.tokens.invalidate(&token).await;
                        if attempts >= MAX_ATTEMPTS {
                            warn!(
                                target: "gateway",
                                path = %path,
                                attempts = attempts,
                                "token rejected after re-authentication"
                            );
                            return Err(GatewayError::Authentication {
                                status: resp.status,
                                body: resp.body,
                            });
                        }
                        warn!(
                            target: "gateway",
                            path = %path,
                            token = %token.redacted(),
                            "token rejected, re-authenticating"
                        );
                        AuthState::NeedToken
                    } else if !resp.is_success() {
                        warn!(
                            target: "gateway",
                            path = %path,
                            status = resp.status,
                            body = %resp.body,
                            "gateway error response"
                        );
                        return Err(GatewayError::Upstream {
                            status: resp.status,
                            body: resp.body,
                        });
                    } else {
                        return Ok(resp);
                    }
                }
            };
        }
    }

    /// cached token, or a fresh login shared with concurrent callers
    async fn token(&self) -> Result<GatewayToken> {
        self.tokens.get_or_fetch(|| self.login()).await
    }

    async fn login(&self) -> Result<GatewayToken> {
        let credentials = self.config.credentials()?;
        info!(
            target: "gateway",
            method = "POST",
            path = LOGIN_PATH,
            email = %credentials.email,
            "gateway login"
        );

        let body = json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        let resp = self
            .transport
            .post_json(&self.config.endpoint(LOGIN_PATH), None, &body)
            .await?;

        if !resp.is_success() {
            warn!(target: "gateway", status = resp.status, "gateway login rejected");
            return Err(GatewayError::Authentication {
                status: resp.status,
                body: resp.body,
            });
        }

        let data = resp.json()?;
        match data.get("token").and_then(Value::as_str) {
            Some(value) if !value.is_empty() => {
                let token = GatewayToken::new(value, self.time.now());
                info!(target: "gateway", token = %token.redacted(), "gateway login ok");
                Ok(token)
            }
            _ => Err(response_shape_error("token", &data)),
        }
    }
}

/// shape error naming the keys that were present
fn response_shape_error(missing_field: &str, data: &Value) -> GatewayError {
    let present_keys = data
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();
    GatewayError::ResponseShape {
        missing_field: missing_field.to_string(),
        present_keys,
    }
}
