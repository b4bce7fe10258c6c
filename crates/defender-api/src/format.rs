//! Text formatters for console display
//!
//! Pure functions over the raw JSON responses. Missing fields render
//! as placeholders instead of failing, since display must tolerate
//! schema drift from the upstream API.

use serde_json::Value;

/// Maximum number of alerts rendered per listing
const MAX_ALERT_DISPLAY: usize = 10;

/// Block separator line
const SEPARATOR: &str = "--------------------------------------------------";

/// Read a string field from a record, falling back to a placeholder
fn field<'a>(record: &'a Value, name: &str, fallback: &'a str) -> &'a str {
    record.get(name).and_then(Value::as_str).unwrap_or(fallback)
}

/// Format an alert list response for display
///
/// Renders at most the first 10 alerts, in the order received.
pub fn format_alerts(alerts: &Value) -> String {
    let records = match alerts.get("value").and_then(Value::as_array) {
        Some(records) if !records.is_empty() => records,
        _ => return "No alerts found".to_string(),
    };

    let mut result = Vec::new();
    for alert in records.iter().take(MAX_ALERT_DISPLAY) {
        result.push(format!("\nAlert: {}", field(alert, "title", "No title")));
        result.push(format!("Severity: {}", field(alert, "severity", "Unknown")));
        result.push(format!("Status: {}", field(alert, "status", "Unknown")));
        result.push(format!("Category: {}", field(alert, "category", "Unknown")));
        if let Some(description) = alert.get("description").and_then(Value::as_str) {
            if !description.is_empty() {
                result.push(format!("Description: {}", description));
            }
        }
        result.push(SEPARATOR.to_string());
    }

    result.join("\n")
}

/// Format a device list response for display
///
/// Renders every device, in the order received.
pub fn format_devices(devices: &Value) -> String {
    let records = match devices.get("value").and_then(Value::as_array) {
        Some(records) if !records.is_empty() => records,
        _ => return "No devices found".to_string(),
    };

    let mut result = Vec::new();
    for device in records {
        result.push(format!(
            "\nDevice: {}",
            field(device, "computerDnsName", "Unknown")
        ));
        result.push(format!(
            "OS: {} {}",
            field(device, "osPlatform", "Unknown"),
            field(device, "osVersion", "")
        ));
        result.push(format!(
            "Health Status: {}",
            field(device, "healthStatus", "Unknown")
        ));
        result.push(format!("Last Seen: {}", field(device, "lastSeen", "Unknown")));
        result.push(SEPARATOR.to_string());
    }

    result.join("\n")
}
