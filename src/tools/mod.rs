//! Tool implementations and the registry resolving them by name.
//!
//! Tools are pure request/response units: they receive the raw argument
//! string from the model and return a JSON payload string. They know nothing
//! about sessions, envelopes, or transports; the dispatcher owns all of that.

mod datetime;
mod dispatcher;
mod weather;

pub use datetime::DateTimeTool;
pub use dispatcher::{DispatchError, ToolDispatcher, ToolRequest, ToolResult};
pub use weather::WeatherTool;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::BridgeConfig;

/// Failure inside a tool implementation.
///
/// These never abort the session: the dispatcher encodes them into an
/// error-shaped result payload and the conversation continues.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Upstream HTTP call failed (timeout, connect, non-success status).
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Tool produced a payload that could not be serialized.
    #[error("{0}")]
    Serialize(#[from] serde_json::Error),
}

/// One invocable tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to invoke this tool.
    fn name(&self) -> &'static str;

    /// Execute with the raw argument string from the `toolUse` event.
    /// Returns the JSON payload to report back.
    async fn invoke(&self, arguments: &str) -> Result<String, ToolError>;
}

/// Name-indexed set of tools available to a session.
pub struct ToolRegistry {
    tools: HashMap<&'static str, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Registry with the built-in tool set.
    pub fn builtin(config: &BridgeConfig) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };
        registry.register(Arc::new(DateTimeTool::new()));
        registry.register(Arc::new(WeatherTool::new(config)));
        registry
    }

    /// Add a tool, replacing any existing entry with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name(), tool);
    }

    /// Look up a tool by the name the model sent.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_contents() {
        let registry = ToolRegistry::builtin(&BridgeConfig::default());
        assert!(registry.get("getDateAndTimeTool").is_some());
        assert!(registry.get("getWeatherTool").is_some());
        assert!(registry.get("noSuchTool").is_none());
    }

    #[test]
    fn test_register_replaces_by_name() {
        let mut registry = ToolRegistry::builtin(&BridgeConfig::default());
        registry.register(Arc::new(DateTimeTool::new()));
        assert!(registry.get("getDateAndTimeTool").is_some());
    }
}
