//! Transport seam between the WebSocket server and the dispatcher
//!
//! The server turns socket activity into [`TransportEvent`]s and implements
//! [`FrameSink`] so the dispatcher can answer. The dispatcher never opens or
//! closes connections itself.

mod registry;
pub mod ws;

pub use registry::PeerRegistry;
pub use ws::{serve, ServerHandle, WsServerConfig};

use crate::session::PeerId;
use std::net::SocketAddr;
use thiserror::Error;

/// Connection activity reported by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Connected { peer: PeerId, address: SocketAddr },
    Disconnected { peer: PeerId },
    Frame { peer: PeerId, text: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("peer {0} is not connected")]
    UnknownPeer(PeerId),

    #[error("outbound channel for peer {0} is closed")]
    ChannelClosed(PeerId),
}

/// Outbound half of the transport
pub trait FrameSink: Send + Sync {
    fn send(&self, peer: PeerId, frame: String) -> Result<(), TransportError>;
}
