//! Outbound tool-result envelope construction.
//!
//! A completed tool invocation is reported back into the model stream as a
//! triplet of envelopes: `contentStart` opening a TOOL content block,
//! `toolResult` carrying the payload, and `contentEnd` closing the block by
//! the same prompt/content id pair.

use serde::Serialize;

use super::{BLOCK_TYPE_TOOL, ROLE_TOOL};

/// Media type of tool-result text content.
const TEXT_MEDIA_TYPE: &str = "text/plain";

/// Input type marker within the tool-result configuration.
const INPUT_TYPE_TEXT: &str = "TEXT";

/// Envelope wrapper producing `{"event": {<kindName>: {...}}}`.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEnvelope {
    event: OutboundEvent,
}

/// Event kinds emitted back into the model stream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OutboundEvent {
    ContentStart(ToolContentStart),
    ToolResult(ToolResultEvent),
    ContentEnd(ToolContentEnd),
}

/// `contentStart` opening a tool-result content block.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolContentStart {
    pub prompt_name: String,
    pub content_name: String,
    pub interactive: bool,
    #[serde(rename = "type")]
    pub block_type: &'static str,
    pub role: &'static str,
    pub tool_result_input_configuration: ToolResultInputConfiguration,
}

/// Nested tool-result input configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultInputConfiguration {
    pub tool_use_id: String,
    #[serde(rename = "type")]
    pub input_type: &'static str,
    pub text_input_configuration: TextInputConfiguration,
}

/// Text input configuration within a tool-result block.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInputConfiguration {
    pub media_type: &'static str,
}

/// `toolResult` payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultEvent {
    pub prompt_name: String,
    pub content_name: String,
    /// JSON-serialized result payload, success or error shaped.
    pub content: String,
}

/// `contentEnd` closing a tool-result content block.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolContentEnd {
    pub prompt_name: String,
    pub content_name: String,
}

impl OutboundEnvelope {
    /// Build the opening `contentStart` envelope of a tool-result triplet.
    pub fn tool_content_start(prompt_id: &str, content_id: &str, tool_use_id: &str) -> Self {
        Self {
            event: OutboundEvent::ContentStart(ToolContentStart {
                prompt_name: prompt_id.to_string(),
                content_name: content_id.to_string(),
                interactive: false,
                block_type: BLOCK_TYPE_TOOL,
                role: ROLE_TOOL,
                tool_result_input_configuration: ToolResultInputConfiguration {
                    tool_use_id: tool_use_id.to_string(),
                    input_type: INPUT_TYPE_TEXT,
                    text_input_configuration: TextInputConfiguration {
                        media_type: TEXT_MEDIA_TYPE,
                    },
                },
            }),
        }
    }

    /// Build the `toolResult` envelope carrying the payload.
    pub fn tool_result(prompt_id: &str, content_id: &str, content: &str) -> Self {
        Self {
            event: OutboundEvent::ToolResult(ToolResultEvent {
                prompt_name: prompt_id.to_string(),
                content_name: content_id.to_string(),
                content: content.to_string(),
            }),
        }
    }

    /// Build the closing `contentEnd` envelope of a tool-result triplet.
    pub fn tool_content_end(prompt_id: &str, content_id: &str) -> Self {
        Self {
            event: OutboundEvent::ContentEnd(ToolContentEnd {
                prompt_name: prompt_id.to_string(),
                content_name: content_id.to_string(),
            }),
        }
    }
}
