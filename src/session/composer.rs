//! Tool-result triplet composition toward the model stream.

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::protocol::OutboundEnvelope;
use crate::tools::ToolResult;
use crate::transport::{MessageSink, RelayRoute};

/// Composes and sends the `contentStart` / `toolResult` / `contentEnd`
/// triplet reporting a tool outcome back into the model stream.
///
/// The three envelopes of one outcome always share one content id and are
/// sent back to back, so the model never observes a half-open tool content
/// block.
pub struct OutboundComposer {
    model_sink: Arc<dyn MessageSink>,
}

impl OutboundComposer {
    pub fn new(model_sink: Arc<dyn MessageSink>) -> Self {
        Self { model_sink }
    }

    /// Report a completed invocation, success or tool-level error payload.
    pub async fn emit_result(&self, result: &ToolResult) {
        info!(
            tool_use_id = %result.tool_use_id,
            "Sending tool result"
        );
        self.emit_triplet(
            &result.prompt_id,
            &result.content_id,
            &result.tool_use_id,
            &result.content,
        )
        .await;
    }

    /// Report a dispatch-infrastructure failure for an invocation that never
    /// produced a result: fresh error content id, original invocation id.
    pub async fn emit_failure(&self, prompt_id: &str, tool_use_id: &str, message: &str) {
        error!(
            tool_use_id = %tool_use_id,
            message = %message,
            "Tool dispatch failed"
        );
        let payload = serde_json::json!({
            "error": format!("Tool execution failed: {}", message)
        })
        .to_string();
        let content_id = Uuid::new_v4().to_string();
        self.emit_triplet(prompt_id, &content_id, tool_use_id, &payload)
            .await;
    }

    async fn emit_triplet(
        &self,
        prompt_id: &str,
        content_id: &str,
        tool_use_id: &str,
        content: &str,
    ) {
        let envelopes = [
            OutboundEnvelope::tool_content_start(prompt_id, content_id, tool_use_id),
            OutboundEnvelope::tool_result(prompt_id, content_id, content),
            OutboundEnvelope::tool_content_end(prompt_id, content_id),
        ];
        for envelope in &envelopes {
            match serde_json::to_string(envelope) {
                Ok(text) => self.model_sink.send(RelayRoute::Text(text)).await,
                Err(err) => {
                    error!(error = %err, "Failed to serialize tool-result envelope");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ChannelSink;
    use serde_json::Value;

    async fn collect(rx: &mut tokio::sync::mpsc::Receiver<RelayRoute>) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(route) = rx.try_recv() {
            match route {
                RelayRoute::Text(text) => frames.push(serde_json::from_str(&text).unwrap()),
                other => panic!("Expected text frame, got {:?}", other),
            }
        }
        frames
    }

    #[tokio::test]
    async fn test_emit_result_triplet() {
        let (sink, mut rx) = ChannelSink::pair(8);
        let composer = OutboundComposer::new(Arc::new(sink));

        composer
            .emit_result(&ToolResult {
                prompt_id: "p1".to_string(),
                content_id: "result-block".to_string(),
                tool_use_id: "t1".to_string(),
                content: r#"{"weather_data":{}}"#.to_string(),
            })
            .await;

        let frames = collect(&mut rx).await;
        assert_eq!(frames.len(), 3);

        let start = &frames[0]["event"]["contentStart"];
        let result = &frames[1]["event"]["toolResult"];
        let end = &frames[2]["event"]["contentEnd"];

        assert_eq!(start["toolResultInputConfiguration"]["toolUseId"], "t1");
        assert_eq!(result["content"], r#"{"weather_data":{}}"#);

        // All three envelopes share the result's content id
        assert_eq!(start["contentName"], "result-block");
        assert_eq!(result["contentName"], "result-block");
        assert_eq!(end["contentName"], "result-block");
        assert_eq!(start["promptName"], "p1");
        assert_eq!(end["promptName"], "p1");
    }

    #[tokio::test]
    async fn test_emit_failure_uses_original_tool_use_id() {
        let (sink, mut rx) = ChannelSink::pair(8);
        let composer = OutboundComposer::new(Arc::new(sink));

        composer.emit_failure("p1", "t9", "task cancelled").await;

        let frames = collect(&mut rx).await;
        assert_eq!(frames.len(), 3);

        let start = &frames[0]["event"]["contentStart"];
        assert_eq!(start["toolResultInputConfiguration"]["toolUseId"], "t9");
        assert_eq!(
            frames[1]["event"]["toolResult"]["content"],
            r#"{"error":"Tool execution failed: task cancelled"}"#
        );

        // Failure path mints its own error content id
        let content_id = start["contentName"].as_str().unwrap();
        assert!(Uuid::parse_str(content_id).is_ok());
        assert_eq!(frames[2]["event"]["contentEnd"]["contentName"], content_id);
    }
}
