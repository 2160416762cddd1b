//! Command channel - pending inbound command and the outbound print path

use std::sync::Arc;
use tracing::{trace, warn};

use crate::protocol;
use crate::session::{PeerId, SessionGate};
use crate::transport::FrameSink;

/// Single-slot buffer for the most recent `serial` command
///
/// No queue: a command arriving before the host consumed the previous one
/// replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingCommand {
    pub command: String,
    pub arrived: bool,
}

/// Inbound command slot plus the session-gated outbound path
pub struct CommandChannel {
    pending: PendingCommand,
    sink: Arc<dyn FrameSink>,
}

impl CommandChannel {
    pub fn new(sink: Arc<dyn FrameSink>) -> Self {
        Self {
            pending: PendingCommand::default(),
            sink,
        }
    }

    /// Store a command, overwriting any unconsumed one
    pub fn set_pending(&mut self, command: impl Into<String>) {
        let command = command.into();
        if self.pending.arrived {
            trace!(
                "Overwriting unconsumed command {:?} with {:?}",
                self.pending.command,
                command
            );
        }
        self.pending = PendingCommand {
            command,
            arrived: true,
        };
    }

    /// Current command and whether one arrived since the last clear
    ///
    /// Does not reset the flag: repeated polls observe the same value until
    /// the consumer calls [`clear_pending`](Self::clear_pending).
    pub fn take_pending(&self) -> (String, bool) {
        (self.pending.command.clone(), self.pending.arrived)
    }

    pub fn clear_pending(&mut self) {
        self.pending = PendingCommand::default();
    }

    pub fn pending(&self) -> &PendingCommand {
        &self.pending
    }

    /// Send `monitor,<text>` to the session peer
    ///
    /// Silent no-op while no session is active. Returns whether a frame was
    /// handed to the transport.
    pub fn send_line(&self, gate: &SessionGate, text: &str) -> bool {
        match gate.active_peer() {
            Some(peer) => self.send_to(gate, peer, protocol::monitor_frame(text)),
            None => {
                trace!("Dropping print line, no active session");
                false
            },
        }
    }

    /// Send a frame to `peer` if, and only if, it holds the session
    pub(crate) fn send_to(&self, gate: &SessionGate, peer: PeerId, frame: String) -> bool {
        if !gate.is_active_for(peer) {
            trace!("Not sending to {}: not the active session", peer);
            return false;
        }
        match self.sink.send(peer, frame) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to send frame to {}: {}", peer, e);
                false
            },
        }
    }
}
