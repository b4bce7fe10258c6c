//! Credential configuration
//!
//! Credentials are loaded once at startup and injected into the query
//! client. All three values must be present or the process must not
//! start.

use crate::error::{ApiError, Result};

/// Defender API base URL
pub const API_BASE_URL: &str = "https://api.security.microsoft.com";

/// OAuth scope for the Defender security center API
pub const API_SCOPE: &str = "https://api.securitycenter.microsoft.com/.default";

/// Environment variables required for the client-credential grant
const REQUIRED_VARS: [&str; 3] = ["TENANT_ID", "CLIENT_ID", "CLIENT_SECRET"];

/// Client-credential configuration for the Defender API
///
/// Immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct DefenderConfig {
    /// Azure AD tenant identifier
    pub tenant_id: String,

    /// Application (client) identifier
    pub client_id: String,

    /// Application client secret
    pub client_secret: String,
}

impl DefenderConfig {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Load configuration from the environment
    ///
    /// Fails fast with the exact list of missing variables so the
    /// process can refuse to start before any network call.
    pub fn from_env() -> Result<Self> {
        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .filter(|var| std::env::var(var).map(|v| v.is_empty()).unwrap_or(true))
            .copied()
            .collect();

        if !missing.is_empty() {
            return Err(ApiError::Config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            tenant_id: std::env::var("TENANT_ID").unwrap_or_default(),
            client_id: std::env::var("CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("CLIENT_SECRET").unwrap_or_default(),
        })
    }

    /// Azure AD authority URL for this tenant
    pub fn authority_url(&self) -> String {
        format!("https://login.microsoftonline.com/{}", self.tenant_id)
    }

    /// Token endpoint for the client-credential grant
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.authority_url())
    }
}
