//! Inbound event routing.
//!
//! The router is the single consumer of the model's event stream. Each raw
//! frame is decoded once, state is updated, and the frame is either relayed
//! verbatim to the UI or suppressed. Tool activity never reaches the UI; it
//! turns into background dispatch whose results flow back into the model
//! stream through the [`OutboundComposer`].

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{GenerationStage, OutboundComposer, PendingToolUse, SessionState};
use crate::protocol::{ContentStart, InboundEvent, ProtocolError};
use crate::tools::{DispatchError, ToolDispatcher, ToolRequest};
use crate::transport::{MessageSink, RelayRoute, CLOSE_INTERNAL_ERROR, CLOSE_NORMAL};

/// Routes inbound model events for one session.
pub struct EventRouter {
    state: SessionState,
    ui_sink: Arc<dyn MessageSink>,
    dispatcher: Arc<ToolDispatcher>,
    composer: Arc<OutboundComposer>,
}

impl EventRouter {
    pub fn new(
        ui_sink: Arc<dyn MessageSink>,
        model_sink: Arc<dyn MessageSink>,
        dispatcher: Arc<ToolDispatcher>,
    ) -> Self {
        Self {
            state: SessionState::new(),
            ui_sink,
            dispatcher,
            composer: Arc::new(OutboundComposer::new(model_sink)),
        }
    }

    /// Committed transcript so far.
    pub fn transcript(&self) -> &[super::ChatTurn] {
        self.state.transcript()
    }

    /// Process one raw frame from the model stream.
    ///
    /// Valid JSON without an event envelope relays untouched; frames that
    /// fail to decode otherwise are logged and skipped. One malformed frame
    /// never takes the session down.
    pub async fn process(&mut self, raw: &str) {
        let event = match InboundEvent::decode(raw) {
            Ok(event) => event,
            Err(ProtocolError::MissingEvent) => {
                debug!("Relaying frame without an event envelope");
                self.relay(raw).await;
                return;
            }
            Err(err) => {
                warn!(error = %err, "Skipping undecodable frame");
                return;
            }
        };

        match event {
            InboundEvent::CompletionStart(start) => {
                info!(prompt_id = %start.prompt_name, "Completion cycle started");
                self.state.prompt_id = start.prompt_name;
                self.relay(raw).await;
            }
            InboundEvent::ContentStart(start) => {
                if let Some(role) = &start.role {
                    self.state.role = role.clone();
                }
                if let Some(stage) = resolve_stage(&start) {
                    self.state.generation_stage = stage;
                }
                // Partial frame without a block type still mutates state but
                // carries nothing the UI can render
                if start.block_type.is_none() {
                    debug!(content_id = %start.content_id, "Suppressing typeless contentStart");
                    return;
                }
                self.relay(raw).await;
            }
            InboundEvent::TextOutput(text) => {
                if let Some(content) = &text.content {
                    if !self.state.generation_stage.is_speculative() {
                        let role = self.state.role.clone();
                        self.state.record_turn(role, content.clone());
                    }
                }
                self.relay(raw).await;
            }
            InboundEvent::AudioOutput(_) => {
                self.relay(raw).await;
            }
            InboundEvent::ToolUse(tool_use) => {
                debug!(
                    tool_name = %tool_use.tool_name,
                    tool_use_id = %tool_use.tool_use_id,
                    "Captured tool invocation"
                );
                self.state.set_pending_tool_use(PendingToolUse {
                    tool_use_id: tool_use.tool_use_id,
                    tool_name: tool_use.tool_name,
                    raw_content: tool_use.content,
                });
            }
            InboundEvent::ContentEnd(end) => {
                if end.is_tool_block() {
                    self.begin_tool_dispatch();
                } else {
                    self.relay(raw).await;
                }
            }
            InboundEvent::CompletionEnd(end) => {
                info!(stop_reason = ?end.stop_reason, "Completion cycle ended");
                self.relay(raw).await;
            }
            InboundEvent::Usage(_) => {
                self.relay(raw).await;
            }
            InboundEvent::Unknown { kind } => {
                debug!(kind = %kind, "Relaying unrecognized event kind");
                self.relay(raw).await;
            }
        }
    }

    /// Handle normal end of the model stream: log the transcript, drain
    /// in-flight tool work, and close the UI connection.
    pub async fn complete(&mut self) {
        info!(chat_history = %self.state.chat_history_json(), "Session complete");
        self.dispatcher.shutdown().await;
        self.ui_sink
            .send(RelayRoute::Close {
                code: CLOSE_NORMAL,
                reason: "Output complete".to_string(),
            })
            .await;
    }

    /// Handle a fatal model-stream error: close the UI connection with the
    /// error reason.
    pub async fn fail(&mut self, message: &str) {
        warn!(message = %message, "Session failed");
        self.ui_sink
            .send(RelayRoute::Close {
                code: CLOSE_INTERNAL_ERROR,
                reason: format!("Error occurred: {}", message),
            })
            .await;
    }

    /// Launch background dispatch for the pending invocation.
    ///
    /// The request is a snapshot; routing continues immediately and the
    /// completion task reports the outcome through the composer whenever it
    /// lands.
    fn begin_tool_dispatch(&mut self) {
        let Some(pending) = self.state.take_pending_tool_use() else {
            warn!("TOOL content block closed with no pending invocation");
            return;
        };

        let request = ToolRequest {
            prompt_id: self.state.prompt_id.clone(),
            tool_use_id: pending.tool_use_id,
            tool_name: pending.tool_name,
            arguments: pending.raw_content,
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        let composer = Arc::clone(&self.composer);
        self.dispatcher.tracker().spawn(async move {
            let prompt_id = request.prompt_id.clone();
            let tool_use_id = request.tool_use_id.clone();
            match dispatcher.dispatch(request).await {
                Ok(result) => composer.emit_result(&result).await,
                Err(DispatchError::MissingParameters) => {
                    warn!("Dropping tool invocation with missing parameters");
                }
                Err(err) => {
                    composer
                        .emit_failure(&prompt_id, &tool_use_id, &err.to_string())
                        .await;
                }
            }
        });
    }

    async fn relay(&self, raw: &str) {
        self.ui_sink.send(RelayRoute::Text(raw.to_string())).await;
    }
}

/// Extract the generation stage from the `additionalModelFields` JSON string.
///
/// `None` when the field is absent: the current stage stays in effect, so an
/// intervening content block without model fields (audio, for instance) does
/// not reset a speculative run.
fn resolve_stage(start: &ContentStart) -> Option<GenerationStage> {
    let fields = start.additional_model_fields.as_ref()?;
    let stage = serde_json::from_str::<Value>(fields)
        .ok()
        .and_then(|value| {
            value
                .get("generationStage")
                .and_then(Value::as_str)
                .map(GenerationStage::parse)
        })
        .unwrap_or(GenerationStage::Unspecified);
    Some(stage)
}
