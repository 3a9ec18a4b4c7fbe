//! Wire protocol for the duplex model stream.
//!
//! Every message in both directions is an envelope of the shape
//! `{"event": {<kindName>: {...fields...}}}` with exactly one kind key per
//! envelope. Inbound envelopes are decoded once at the boundary into the
//! closed [`InboundEvent`] variant set; outbound tool-result envelopes are
//! built through [`OutboundEnvelope`].

mod events;
mod outbound;

pub use events::{
    AudioOutput, CompletionEnd, CompletionStart, ContentEnd, ContentStart, InboundEvent,
    ProtocolError, TextOutput, ToolUse,
};
pub use outbound::{
    OutboundEnvelope, OutboundEvent, TextInputConfiguration, ToolContentEnd, ToolContentStart,
    ToolResultEvent, ToolResultInputConfiguration,
};

/// Content-block type marker for tool activity.
pub const BLOCK_TYPE_TOOL: &str = "TOOL";

/// Role marker for tool-result content blocks.
pub const ROLE_TOOL: &str = "TOOL";
