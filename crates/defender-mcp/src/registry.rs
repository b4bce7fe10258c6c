//! Tool Registry - manages the tools exposed by the server

use crate::tool::{Tool, ToolDef};
use crate::types::McpToolResult;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registry of available tools
///
/// Tools are kept in name order so `tools/list` output is stable.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool definitions (for `tools/list`)
    pub fn definitions(&self) -> Vec<ToolDef> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, arguments: Value) -> McpToolResult {
        match self.get(name) {
            Some(tool) => tool.execute(arguments).await,
            None => McpToolResult::error(format!("Tool '{}' not found", name)),
        }
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
