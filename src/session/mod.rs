//! Per-connection session state and event routing.
//!
//! One [`SessionState`] exists per active connection. It is created at
//! connection open, mutated exclusively by the single-threaded
//! [`EventRouter`] processing inbound events in arrival order, and dropped at
//! connection close. Tool dispatch tasks never read live session state; they
//! work from an immutable snapshot taken at dispatch time.

mod composer;
mod router;

pub use composer::OutboundComposer;
pub use router::EventRouter;

use serde::Serialize;

/// Generation stage of the current content block.
///
/// `Final` is the only option for USER content. ASSISTANT text arrives as
/// `Speculative` before audio generation and again as `Final` afterwards;
/// only non-speculative text is committed to the transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenerationStage {
    /// No stage announced yet for this session.
    #[default]
    Unspecified,
    /// Provisional assistant text, not yet committed.
    Speculative,
    /// Committed text.
    Final,
}

impl GenerationStage {
    /// Parse the wire representation; unrecognized values map to
    /// `Unspecified` (treated as committed).
    pub fn parse(s: &str) -> Self {
        match s {
            "SPECULATIVE" => GenerationStage::Speculative,
            "FINAL" => GenerationStage::Final,
            _ => GenerationStage::Unspecified,
        }
    }

    /// Whether text in this stage is excluded from the transcript.
    pub fn is_speculative(self) -> bool {
        matches!(self, GenerationStage::Speculative)
    }
}

/// One committed conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Tool invocation captured from a `toolUse` event, waiting for the
/// enclosing TOOL-typed `contentEnd`.
#[derive(Debug, Clone, Default)]
pub struct PendingToolUse {
    pub tool_use_id: String,
    pub tool_name: String,
    pub raw_content: String,
}

/// Mutable correlation state for one session.
///
/// Pure data holder: every field is replaced atomically by the router, and
/// no policy lives here.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Correlation id for the current completion cycle.
    pub prompt_id: String,
    /// Role announced by the most recent `contentStart` (USER, ASSISTANT,
    /// TOOL). Overwritten, never merged.
    pub role: String,
    /// Generation stage announced by the most recent `contentStart`.
    pub generation_stage: GenerationStage,
    transcript: Vec<ChatTurn>,
    pending_tool_use: Option<PendingToolUse>,
}

impl SessionState {
    /// Fresh state for a newly opened connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one committed turn to the transcript.
    pub fn record_turn(&mut self, role: String, content: String) {
        self.transcript.push(ChatTurn { role, content });
    }

    /// Committed turns in arrival order.
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Store the invocation awaiting its enclosing `contentEnd`.
    pub fn set_pending_tool_use(&mut self, pending: PendingToolUse) {
        self.pending_tool_use = Some(pending);
    }

    /// Consume the pending invocation as a unit.
    pub fn take_pending_tool_use(&mut self) -> Option<PendingToolUse> {
        self.pending_tool_use.take()
    }

    /// Serialize the transcript as `{"chatHistory": [...]}` for logging.
    pub fn chat_history_json(&self) -> String {
        serde_json::json!({ "chatHistory": self.transcript }).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_stage_parse() {
        assert_eq!(
            GenerationStage::parse("SPECULATIVE"),
            GenerationStage::Speculative
        );
        assert_eq!(GenerationStage::parse("FINAL"), GenerationStage::Final);
        assert_eq!(
            GenerationStage::parse("anything-else"),
            GenerationStage::Unspecified
        );
        assert!(GenerationStage::parse("SPECULATIVE").is_speculative());
        assert!(!GenerationStage::parse("FINAL").is_speculative());
    }

    #[test]
    fn test_transcript_append_order() {
        let mut state = SessionState::new();
        state.record_turn("USER".to_string(), "hi".to_string());
        state.record_turn("ASSISTANT".to_string(), "hello".to_string());

        let transcript = state.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, "USER");
        assert_eq!(transcript[1].content, "hello");
    }

    #[test]
    fn test_pending_tool_use_consumed_once() {
        let mut state = SessionState::new();
        state.set_pending_tool_use(PendingToolUse {
            tool_use_id: "t1".to_string(),
            tool_name: "getDateAndTimeTool".to_string(),
            raw_content: "{}".to_string(),
        });

        assert!(state.take_pending_tool_use().is_some());
        assert!(state.take_pending_tool_use().is_none());
    }

    #[test]
    fn test_chat_history_json_shape() {
        let mut state = SessionState::new();
        state.record_turn("ASSISTANT".to_string(), "hello".to_string());

        let value: serde_json::Value =
            serde_json::from_str(&state.chat_history_json()).unwrap();
        assert_eq!(value["chatHistory"][0]["role"], "ASSISTANT");
        assert_eq!(value["chatHistory"][0]["content"], "hello");
    }
}
