//! Transport seams for the session bridge.
//!
//! The bridge owns no sockets. The UI-bound relay and the model-bound event
//! stream are both reached through the [`MessageSink`] trait, so the
//! surrounding server wires in whatever transport it actually runs (an axum
//! WebSocket, a provider SDK stream, a test channel).

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

/// Close code for normal session completion.
pub const CLOSE_NORMAL: u16 = 1000;

/// Close code for an unrecoverable session error.
pub const CLOSE_INTERNAL_ERROR: u16 = 1011;

/// A frame routed toward one side of the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayRoute {
    /// JSON text frame, forwarded verbatim.
    Text(String),
    /// Terminal close signal for the peer connection.
    Close {
        /// WebSocket-style status code.
        code: u16,
        /// Human-readable close reason.
        reason: String,
    },
}

/// Fire-and-forget sink for frames leaving the bridge.
///
/// Implementations must never fail the caller: a sink whose peer is gone
/// simply drops the frame.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Deliver one frame, best effort.
    async fn send(&self, route: RelayRoute);
}

/// [`MessageSink`] backed by a bounded tokio channel.
///
/// Once the receiving half is dropped, sends become no-ops. This matches the
/// session-end contract: results arriving after shutdown are discarded.
pub struct ChannelSink {
    tx: mpsc::Sender<RelayRoute>,
}

impl ChannelSink {
    /// Wrap an existing channel sender.
    pub fn new(tx: mpsc::Sender<RelayRoute>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiving half.
    pub fn pair(capacity: usize) -> (Self, mpsc::Receiver<RelayRoute>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn send(&self, route: RelayRoute) {
        if self.tx.send(route).await.is_err() {
            debug!("Dropping frame, peer is gone");
        }
    }
}
