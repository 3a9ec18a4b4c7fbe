//! Asynchronous tool dispatch.
//!
//! Dispatch runs each tool invocation on its own tracked task so a slow
//! tool never stalls event routing. The request is an immutable snapshot
//! taken at dispatch time; by the time a result lands, session state may
//! have moved on, and nothing here reads it.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};
use uuid::Uuid;

use super::ToolRegistry;

/// Snapshot of one tool invocation, captured when the enclosing TOOL
/// content block closes.
#[derive(Debug, Clone)]
pub struct ToolRequest {
    /// Prompt id of the completion cycle the invocation belongs to.
    pub prompt_id: String,
    /// Invocation id assigned by the model.
    pub tool_use_id: String,
    /// Tool name as the model sent it.
    pub tool_name: String,
    /// Raw argument string from the `toolUse` event.
    pub arguments: String,
}

/// Outcome of a completed dispatch.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Prompt id echoed from the request.
    pub prompt_id: String,
    /// Fresh content id assigned to the result block, one per dispatch.
    pub content_id: String,
    /// Invocation id echoed from the request.
    pub tool_use_id: String,
    /// JSON payload to report back, success or error shaped.
    pub content: String,
}

/// Dispatch-level failure, distinct from a tool returning an error payload.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Request is missing an id or the tool name; nothing can be
    /// correlated, so no result is reported at all.
    #[error("tool request is missing promptId, toolUseId, or toolName")]
    MissingParameters,

    /// The execution task itself failed (panic or runtime shutdown).
    #[error("tool execution task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// Runs tool invocations on tracked background tasks.
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    tracker: TaskTracker,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            tracker: TaskTracker::new(),
        }
    }

    /// Tracker shared with callers that spawn completion handling.
    pub fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }

    /// Close the tracker and wait for in-flight invocations to finish.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }

    /// Execute one invocation to completion.
    ///
    /// Tool-level failures come back as an error-shaped [`ToolResult`]
    /// payload; only task-level failures surface as [`DispatchError`].
    pub async fn dispatch(&self, request: ToolRequest) -> Result<ToolResult, DispatchError> {
        if request.prompt_id.is_empty()
            || request.tool_use_id.is_empty()
            || request.tool_name.is_empty()
        {
            return Err(DispatchError::MissingParameters);
        }

        info!(
            tool_name = %request.tool_name,
            tool_use_id = %request.tool_use_id,
            "Dispatching tool invocation"
        );

        let registry = Arc::clone(&self.registry);
        let handle = self.tracker.spawn(async move {
            let content = match registry.get(&request.tool_name) {
                Some(tool) => match tool.invoke(&request.arguments).await {
                    Ok(payload) => payload,
                    Err(err) => {
                        debug!(tool_name = %request.tool_name, error = %err, "Tool returned error");
                        serde_json::json!({
                            "error": format!("Tool execution failed: {}", err)
                        })
                        .to_string()
                    }
                },
                None => serde_json::json!({
                    "error": format!("Unsupported tool: {}", request.tool_name)
                })
                .to_string(),
            };
            ToolResult {
                prompt_id: request.prompt_id,
                content_id: Uuid::new_v4().to_string(),
                tool_use_id: request.tool_use_id,
                content,
            }
        });

        Ok(handle.await?)
    }
}
