use chrono::{DateTime, Utc};
use std::fmt;
use std::future::Future;
use tokio::sync::Mutex;

use crate::errors::Result;

/// authentication token issued by the gateway login endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayToken {
    value: String,
    pub fetched_at: DateTime<Utc>,
}

impl GatewayToken {
    pub fn new(value: impl Into<String>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            fetched_at,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// first characters only, for logs
    pub fn redacted(&self) -> String {
        let prefix: String = self.value.chars().take(8).collect();
        format!("{prefix}...")
    }
}

impl fmt::Debug for GatewayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayToken")
            .field("value", &self.redacted())
            .field("fetched_at", &self.fetched_at)
            .finish()
    }
}

/// holds at most one gateway token, shared by every caller of a client
///
/// The slot lock is held for the whole of a refresh, so concurrent callers
/// that find the slot empty queue behind the first one and reuse its token.
/// Writes are a single replace under the lock; a refresh cancelled midway
/// leaves the previous contents untouched.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: Mutex<Option<GatewayToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// cached token, if any
    pub async fn current(&self) -> Option<GatewayToken> {
        self.slot.lock().await.clone()
    }

    /// replace the cached token unconditionally
    pub async fn store(&self, token: GatewayToken) {
        *self.slot.lock().await = Some(token);
    }

    pub async fn clear(&self) {
        *self.slot.lock().await = None;
    }

    /// clear only if `stale` is still the cached token
    ///
    /// Returns whether anything was dropped. A token another caller already
    /// refreshed is left in place.
    pub async fn invalidate(&self, stale: &GatewayToken) -> bool {
        let mut slot = self.slot.lock().await;
        if slot.as_ref() == Some(stale) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// cached token, or the result of `fetch` stored under the lock
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<GatewayToken>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<GatewayToken>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }
        let token = fetch().await?;
        *slot = Some(token.clone());
        Ok(token)
    }
}
