//! End-to-end MCP session over in-memory stdio

use defender_api::{DefenderClient, StaticTokenSource};
use defender_mcp::{GetAlertsTool, ListDevicesTool, McpServer, ToolRegistry};
use serde_json::Value;
use std::sync::Arc;

fn server_with_defender_tools(base_url: &str) -> McpServer {
    let tokens = Arc::new(StaticTokenSource("canned-token".to_string()));
    let client = Arc::new(DefenderClient::with_base_url(base_url, tokens));

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(GetAlertsTool::new(client.clone())));
    registry.register(Arc::new(ListDevicesTool::new(client)));
    McpServer::new(registry)
}

async fn run_session(server: &McpServer, requests: &[&str]) -> Vec<Value> {
    let mut input = String::new();
    for request in requests {
        input.push_str(request);
        input.push('\n');
    }

    let mut output = Vec::new();
    server
        .run(input.as_bytes(), &mut output)
        .await
        .expect("session failed");

    std::str::from_utf8(&output)
        .expect("non-utf8 output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("invalid response line"))
        .collect()
}

#[tokio::test]
async fn handshake_then_list_exposes_both_tools() {
    let server = server_with_defender_tools("http://127.0.0.1:1");

    let responses = run_session(
        &server,
        &[
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","clientInfo":{"name":"test","version":"0"},"capabilities":{}}}"#,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        ],
    )
    .await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "defender-alerts");

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["get_alerts", "list_devices"]);
}

#[tokio::test]
async fn unreachable_api_surfaces_as_tool_error() {
    // Nothing listens on port 1; the client error must come back as an
    // error result, not a protocol failure.
    let server = server_with_defender_tools("http://127.0.0.1:1");

    let responses = run_session(
        &server,
        &[r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"list_devices","arguments":{}}}"#],
    )
    .await;

    assert_eq!(responses.len(), 1);
    let result = &responses[0]["result"];
    assert_eq!(result["isError"], true);
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Network error"), "unexpected text: {}", text);
}

#[tokio::test]
async fn unknown_tool_name_is_reported_in_result() {
    let server = server_with_defender_tools("http://127.0.0.1:1");

    let responses = run_session(
        &server,
        &[r#"{"jsonrpc":"2.0","id":9,"method":"tools/call","params":{"name":"drop_tables","arguments":{}}}"#],
    )
    .await;

    let result = &responses[0]["result"];
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("not found"));
}
