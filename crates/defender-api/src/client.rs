//! Authenticated query client
//!
//! Issues read-only GET requests against the Defender API and returns
//! the decoded JSON body. Each call acquires a token, opens one
//! request-scoped connection, and propagates any failure unretried.

use crate::auth::TokenSource;
use crate::config::API_BASE_URL;
use crate::error::{ApiError, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Overall deadline for a single API request
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Alert field the date filter compares against
const ALERT_TIME_FIELD: &str = "alertCreationTime";

/// Parameters for an alert query
///
/// When `device_id` is set the query targets the per-device alert
/// sub-collection and the date bounds are dropped, matching the
/// device-scoped endpoint's behavior.
#[derive(Debug, Clone)]
pub struct AlertQuery {
    /// Maximum number of alerts to request (`$top`)
    pub limit: u32,

    /// Inclusive lower bound on alert creation time (ISO-8601)
    pub start_date: Option<String>,

    /// Inclusive upper bound on alert creation time (ISO-8601)
    pub end_date: Option<String>,

    /// Restrict to a single device's alerts
    pub device_id: Option<String>,
}

impl Default for AlertQuery {
    fn default() -> Self {
        Self {
            limit: 30,
            start_date: None,
            end_date: None,
            device_id: None,
        }
    }
}

impl AlertQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    pub fn device_id(mut self, id: impl Into<String>) -> Self {
        self.device_id = Some(id.into());
        self
    }

    /// Request path for this query
    ///
    /// Device-specific alerts come from a different endpoint, with the
    /// device id embedded in the path rather than a filter clause.
    pub fn path(&self) -> String {
        match &self.device_id {
            Some(id) => format!("/api/machines/{}/alerts", id),
            None => "/api/alerts".to_string(),
        }
    }

    /// Query parameters for this query
    ///
    /// `$top` is always present. `$filter` joins the present date
    /// bounds with `and` (`ge` for start, `le` for end) against the
    /// alert creation time, and is omitted entirely on the per-device
    /// path.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("$top".to_string(), self.limit.to_string())];

        if self.device_id.is_some() {
            return params;
        }

        let mut filters = Vec::new();
        if let Some(start) = &self.start_date {
            filters.push(format!("{} ge {}", ALERT_TIME_FIELD, start));
        }
        if let Some(end) = &self.end_date {
            filters.push(format!("{} le {}", ALERT_TIME_FIELD, end));
        }

        if !filters.is_empty() {
            params.push(("$filter".to_string(), filters.join(" and ")));
        }

        params
    }
}

/// Authenticated client for the Defender API
pub struct DefenderClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl DefenderClient {
    /// Create a client against the production API base URL
    pub fn new(tokens: Arc<dyn TokenSource>) -> Self {
        Self::with_base_url(API_BASE_URL, tokens)
    }

    /// Create a client against a custom base URL (tests, sovereign clouds)
    pub fn with_base_url(base_url: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            tokens,
        }
    }

    /// GET a path with query parameters, returning the decoded JSON body
    async fn get(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        let token = self.tokens.token().await?;
        let url = format!("{}{}", self.base_url, path);

        debug!("GET {} params={:?}", url, params);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// List all devices in the inventory
    ///
    /// Expected shape: `{ "value": [DeviceRecord...] }`.
    pub async fn list_devices(&self) -> Result<Value> {
        self.get("/api/machines", &[]).await
    }

    /// Get recent alerts matching a query
    ///
    /// Expected shape: `{ "value": [AlertRecord...] }`.
    pub async fn get_alerts(&self, query: &AlertQuery) -> Result<Value> {
        self.get(&query.path(), &query.params()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(params: &[(String, String)], key: &str) -> Option<String> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    #[test]
    fn test_default_query() {
        let query = AlertQuery::new();
        assert_eq!(query.path(), "/api/alerts");
        let params = query.params();
        assert_eq!(param(&params, "$top").as_deref(), Some("30"));
        assert_eq!(param(&params, "$filter"), None);
    }

    #[test]
    fn test_device_query_uses_device_path() {
        let query = AlertQuery::new()
            .limit(5)
            .start_date("2024-01-01T00:00:00Z")
            .device_id("abc");
        assert_eq!(query.path(), "/api/machines/abc/alerts");

        // Device-scoped path carries only the limit, no date filter
        let params = query.params();
        assert_eq!(params.len(), 1);
        assert_eq!(param(&params, "$top").as_deref(), Some("5"));
    }

    #[test]
    fn test_date_range_filter() {
        let query = AlertQuery::new()
            .limit(5)
            .start_date("2024-01-01T00:00:00Z")
            .end_date("2024-02-01T00:00:00Z");
        assert_eq!(query.path(), "/api/alerts");
        let params = query.params();
        assert_eq!(param(&params, "$top").as_deref(), Some("5"));
        assert_eq!(
            param(&params, "$filter").as_deref(),
            Some(
                "alertCreationTime ge 2024-01-01T00:00:00Z \
                 and alertCreationTime le 2024-02-01T00:00:00Z"
            )
        );
    }

    #[test]
    fn test_single_bound_filters() {
        let start_only = AlertQuery::new().start_date("2024-01-01T00:00:00Z");
        assert_eq!(
            param(&start_only.params(), "$filter").as_deref(),
            Some("alertCreationTime ge 2024-01-01T00:00:00Z")
        );

        let end_only = AlertQuery::new().end_date("2024-02-01T00:00:00Z");
        assert_eq!(
            param(&end_only.params(), "$filter").as_deref(),
            Some("alertCreationTime le 2024-02-01T00:00:00Z")
        );
    }
}
