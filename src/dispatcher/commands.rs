//! Command enum for the dispatcher actor
//!
//! Transport events and host writes are fire-and-forget; host reads carry a
//! oneshot channel for the answer. Everything travels through the same queue,
//! so reads observe the state left by every frame queued before them.

use std::net::SocketAddr;
use tokio::sync::oneshot;

use crate::session::PeerId;
use crate::transport::TransportEvent;
use crate::widgets::{ControllerSample, WidgetKind};

/// Snapshot of the session for status displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub peer: PeerId,
    pub address: SocketAddr,
}

#[derive(Debug)]
pub enum DispatcherCommand {
    // -------------------------------------------------------------------------
    // Fire and forget
    // -------------------------------------------------------------------------
    /// Connection activity from the transport
    Transport(TransportEvent),

    /// Send `monitor,<text>` to the session peer
    SendLine { text: String },

    /// Reset the pending command slot
    ClearPending,

    /// Reset the last-message arrived flag
    ClearMessageFlag,

    // -------------------------------------------------------------------------
    // Request-response
    // -------------------------------------------------------------------------
    GetSample {
        kind: WidgetKind,
        response: oneshot::Sender<ControllerSample>,
    },

    TakePending {
        response: oneshot::Sender<(String, bool)>,
    },

    LastMessage {
        response: oneshot::Sender<(String, bool)>,
    },

    Status {
        response: oneshot::Sender<Option<SessionStatus>>,
    },
}
