//! Inbound event envelope decoding.
//!
//! The model stream delivers JSON text frames. Each frame is decoded exactly
//! once into an [`InboundEvent`]; the router then matches exhaustively over
//! the variants. Kinds outside the recognized set map to a single explicit
//! [`InboundEvent::Unknown`] case so new upstream events degrade to verbatim
//! relay instead of errors.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while decoding an inbound envelope.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Frame is not valid JSON.
    #[error("invalid JSON frame: {0}")]
    Json(#[from] serde_json::Error),

    /// Frame has no `event` object at the top level.
    #[error("envelope is missing the event object")]
    MissingEvent,

    /// The `event` object carries no kind key.
    #[error("envelope event object is empty")]
    EmptyEvent,

    /// A recognized kind carried a payload of the wrong shape.
    #[error("malformed {kind} payload: {source}")]
    Payload {
        /// Event kind name as it appeared on the wire.
        kind: String,
        /// Underlying decode failure.
        source: serde_json::Error,
    },
}

/// One decoded inbound event.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// Start of a completion cycle; establishes the prompt id.
    CompletionStart(CompletionStart),
    /// Start of a content block; may carry role and generation stage.
    ContentStart(ContentStart),
    /// Text chunk for the current content block.
    TextOutput(TextOutput),
    /// Audio chunk for the current content block.
    AudioOutput(AudioOutput),
    /// Tool invocation request; internal bookkeeping only.
    ToolUse(ToolUse),
    /// End of a content block; TOOL-typed ends trigger dispatch.
    ContentEnd(ContentEnd),
    /// End of the completion cycle.
    CompletionEnd(CompletionEnd),
    /// Usage metrics pass-through.
    Usage(Value),
    /// Any kind outside the recognized set.
    Unknown {
        /// Kind key as it appeared on the wire.
        kind: String,
    },
}

/// `completionStart` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionStart {
    pub prompt_name: String,
}

/// `contentStart` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentStart {
    pub content_id: String,
    /// Block type (TEXT, AUDIO, TOOL). Absent on partial frames.
    #[serde(rename = "type")]
    pub block_type: Option<String>,
    /// USER, ASSISTANT, or TOOL.
    pub role: Option<String>,
    /// JSON string carrying `generationStage` among other model fields.
    pub additional_model_fields: Option<String>,
}

/// `textOutput` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextOutput {
    pub content: Option<String>,
}

/// `audioOutput` payload. The audio itself is relayed verbatim, never decoded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioOutput {
    pub content: Option<String>,
}

/// `toolUse` payload. All three fields arrive together in this protocol;
/// missing fields decode to empty strings and fail dispatch validation later.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolUse {
    pub tool_use_id: String,
    pub content: String,
    pub tool_name: String,
}

/// `contentEnd` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentEnd {
    pub content_id: String,
    #[serde(rename = "type")]
    pub block_type: Option<String>,
    pub stop_reason: Option<String>,
}

impl ContentEnd {
    /// Whether this closes a TOOL content block.
    pub fn is_tool_block(&self) -> bool {
        self.block_type.as_deref() == Some(super::BLOCK_TYPE_TOOL)
    }
}

/// `completionEnd` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionEnd {
    pub stop_reason: Option<String>,
}

impl InboundEvent {
    /// Decode one raw frame into a typed event.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let root: Value = serde_json::from_str(text)?;
        let event = root
            .get("event")
            .and_then(Value::as_object)
            .ok_or(ProtocolError::MissingEvent)?;
        let (kind, payload) = event.iter().next().ok_or(ProtocolError::EmptyEvent)?;

        let decoded = match kind.as_str() {
            "completionStart" => InboundEvent::CompletionStart(Self::payload(kind, payload)?),
            "contentStart" => InboundEvent::ContentStart(Self::payload(kind, payload)?),
            "textOutput" => InboundEvent::TextOutput(Self::payload(kind, payload)?),
            "audioOutput" => InboundEvent::AudioOutput(Self::payload(kind, payload)?),
            "toolUse" => InboundEvent::ToolUse(Self::payload(kind, payload)?),
            "contentEnd" => InboundEvent::ContentEnd(Self::payload(kind, payload)?),
            "completionEnd" => InboundEvent::CompletionEnd(Self::payload(kind, payload)?),
            "usageEvent" => InboundEvent::Usage(payload.clone()),
            other => InboundEvent::Unknown {
                kind: other.to_string(),
            },
        };
        Ok(decoded)
    }

    fn payload<T: serde::de::DeserializeOwned>(
        kind: &str,
        value: &Value,
    ) -> Result<T, ProtocolError> {
        serde_json::from_value(value.clone()).map_err(|source| ProtocolError::Payload {
            kind: kind.to_string(),
            source,
        })
    }
}
