//! Bidirectional event bridge for real-time speech-to-speech sessions.
//!
//! Sits between a duplex model-inference event stream and a UI connection.
//! Inbound model events are decoded once, routed to the UI or suppressed
//! according to a fixed per-kind table, and tool invocations are executed on
//! background tasks with their results composed back into the model stream.
//!
//! # Architecture
//!
//! - [`protocol`] - envelope decoding and tool-result envelope construction
//! - [`session`] - per-connection state, the event router, and the outbound
//!   composer
//! - [`tools`] - the tool trait, built-in tools, and the async dispatcher
//! - [`transport`] - sink seams the surrounding server plugs sockets into
//! - [`config`] - environment-driven settings for the tool layer
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use voicebridge::config::BridgeConfig;
//! use voicebridge::session::EventRouter;
//! use voicebridge::tools::{ToolDispatcher, ToolRegistry};
//! use voicebridge::transport::ChannelSink;
//!
//! # async fn run() {
//! let config = BridgeConfig::from_env();
//! let (ui_sink, _ui_rx) = ChannelSink::pair(64);
//! let (model_sink, _model_rx) = ChannelSink::pair(64);
//! let dispatcher = Arc::new(ToolDispatcher::new(ToolRegistry::builtin(&config)));
//!
//! let mut router = EventRouter::new(Arc::new(ui_sink), Arc::new(model_sink), dispatcher);
//! router
//!     .process(r#"{"event":{"completionStart":{"promptName":"p1"}}}"#)
//!     .await;
//! router.complete().await;
//! # }
//! ```

pub mod config;
pub mod protocol;
pub mod session;
pub mod tools;
pub mod transport;

pub use config::BridgeConfig;
pub use session::EventRouter;
pub use tools::{ToolDispatcher, ToolRegistry};

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber from `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; subsequent calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
