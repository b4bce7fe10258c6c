//! Defender tools - alert and device queries exposed over MCP

use crate::tool::{Tool, ToolDef};
use crate::types::McpToolResult;
use async_trait::async_trait;
use defender_api::{AlertQuery, DefenderClient};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Default alert limit when the caller omits one
const DEFAULT_ALERT_LIMIT: u32 = 100;

fn default_limit() -> u32 {
    DEFAULT_ALERT_LIMIT
}

#[derive(Debug, Deserialize)]
struct GetAlertsParams {
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    device_id: Option<String>,
}

/// Tool returning raw alert JSON with optional date and device filters
pub struct GetAlertsTool {
    client: Arc<DefenderClient>,
}

impl GetAlertsTool {
    pub fn new(client: Arc<DefenderClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetAlertsTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder(
            "get_alerts",
            "Get Defender alerts with optional filters for date range and device ID.",
        )
        .integer_param("limit", "Maximum number of alerts to return", false)
        .string_param(
            "start_date",
            "Only alerts created on or after this date (YYYY-MM-DDTHH:mm:ssZ)",
            false,
        )
        .string_param(
            "end_date",
            "Only alerts created on or before this date (YYYY-MM-DDTHH:mm:ssZ)",
            false,
        )
        .string_param("device_id", "Only alerts for a specific device ID", false)
        .build()
    }

    async fn execute(&self, arguments: Value) -> McpToolResult {
        let params: GetAlertsParams = match serde_json::from_value(arguments) {
            Ok(p) => p,
            Err(e) => return McpToolResult::error(format!("Invalid parameters: {}", e)),
        };

        let mut query = AlertQuery::new().limit(params.limit);
        if let Some(start) = params.start_date {
            query = query.start_date(start);
        }
        if let Some(end) = params.end_date {
            query = query.end_date(end);
        }
        if let Some(device) = params.device_id {
            query = query.device_id(device);
        }

        debug!("get_alerts tool: {} {:?}", query.path(), query.params());

        match self.client.get_alerts(&query).await {
            Ok(body) => McpToolResult::success(
                serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string()),
            ),
            Err(e) => McpToolResult::error(e.to_string()),
        }
    }
}

/// Tool returning the raw device inventory JSON
pub struct ListDevicesTool {
    client: Arc<DefenderClient>,
}

impl ListDevicesTool {
    pub fn new(client: Arc<DefenderClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListDevicesTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder("list_devices", "List Defender devices.").build()
    }

    async fn execute(&self, _arguments: Value) -> McpToolResult {
        match self.client.list_devices().await {
            Ok(body) => McpToolResult::success(
                serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string()),
            ),
            Err(e) => McpToolResult::error(e.to_string()),
        }
    }
}
