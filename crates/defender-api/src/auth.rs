//! Token acquisition via the OAuth client-credential grant
//!
//! The query client depends on a `TokenSource` capability rather than
//! on the identity provider directly, so tests can substitute a canned
//! token without network access.

use crate::client::REQUEST_TIMEOUT;
use crate::config::{DefenderConfig, API_SCOPE};
use crate::error::{ApiError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Refuse to reuse a cached token this close to its expiry
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Default token lifetime when the provider omits `expires_in`
const DEFAULT_LIFETIME_SECS: u64 = 3600;

/// Source of bearer tokens for API requests
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Return a valid bearer token, acquiring one if necessary
    async fn token(&self) -> Result<String>;
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    error_description: Option<String>,
}

/// A token with its expiry deadline
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + EXPIRY_MARGIN < self.expires_at
    }
}

/// Token source backed by the Azure AD client-credential grant
///
/// Tries the cached token first (silent path); performs a new grant
/// only when the cache is empty or near expiry.
pub struct ClientCredentialTokenSource {
    http: reqwest::Client,
    config: DefenderConfig,
    token_url: String,
    cache: RwLock<Option<CachedToken>>,
}

impl ClientCredentialTokenSource {
    /// Create a source against the tenant's Azure AD token endpoint
    pub fn new(config: DefenderConfig) -> Self {
        let token_url = config.token_url();
        Self::with_token_url(config, token_url)
    }

    /// Create a source against a custom token endpoint (tests, sovereign clouds)
    pub fn with_token_url(config: DefenderConfig, token_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            config,
            token_url: token_url.into(),
            cache: RwLock::new(None),
        }
    }

    /// Perform the client-credential grant against the token endpoint
    async fn acquire(&self) -> Result<CachedToken> {
        debug!("Acquiring token from {}", self.token_url);

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", API_SCOPE),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        match body.access_token {
            Some(token) if !token.is_empty() => {
                let lifetime = body.expires_in.unwrap_or(DEFAULT_LIFETIME_SECS);
                Ok(CachedToken {
                    value: token,
                    expires_at: Instant::now() + Duration::from_secs(lifetime),
                })
            }
            _ => Err(ApiError::Authentication(format!(
                "Failed to acquire token: {}",
                body.error_description
                    .unwrap_or_else(|| "Unknown error".to_string())
            ))),
        }
    }
}

#[async_trait]
impl TokenSource for ClientCredentialTokenSource {
    async fn token(&self) -> Result<String> {
        // Silent path: reuse the cached token when it is still fresh
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_fresh() {
                    return Ok(cached.value.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(cached) = cache.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.value.clone());
            }
        }

        let fresh = self.acquire().await?;
        let token = fresh.value.clone();
        *cache = Some(fresh);
        Ok(token)
    }
}

/// Token source returning a fixed token, for tests
pub struct StaticTokenSource(pub String);

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
