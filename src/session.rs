//! Session admission - at most one remote peer at a time
//!
//! ```text
//!            peer_connected(id)
//!   Idle ───────────────────────► Active(id)
//!    ▲                              │  peer_connected(other) → refused, no change
//!    │   peer_disconnected(id)      │  peer_disconnected(other) → ignored
//!    └──────────────────────────────┘
//! ```

use std::fmt;
use std::net::SocketAddr;
use tracing::{debug, info, warn};

/// Opaque connection handle assigned by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u64);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The single admitted peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub peer_id: PeerId,
    pub peer_address: SocketAddr,
    pub is_active: bool,
}

/// Result of a connect notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    /// Another peer already holds the session; nothing changed
    Refused { active: PeerId },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum GateState {
    #[default]
    Idle,
    Active(Session),
}

/// Admission-control state machine
#[derive(Debug, Default)]
pub struct SessionGate {
    state: GateState,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a connect notification from the transport
    pub fn peer_connected(&mut self, peer_id: PeerId, peer_address: SocketAddr) -> Admission {
        match &self.state {
            GateState::Idle => {
                info!("Client {} connected from {}", peer_id, peer_address);
                self.state = GateState::Active(Session {
                    peer_id,
                    peer_address,
                    is_active: true,
                });
                Admission::Admitted
            },
            GateState::Active(session) => {
                warn!(
                    "Connection from {} ({}) refused, already connected to client {}",
                    peer_id, peer_address, session.peer_id
                );
                Admission::Refused {
                    active: session.peer_id,
                }
            },
        }
    }

    /// Handle a disconnect notification
    ///
    /// Returns `true` if the session was closed. A disconnect for any id other
    /// than the recorded peer is stale and ignored.
    pub fn peer_disconnected(&mut self, peer_id: PeerId) -> bool {
        match &self.state {
            GateState::Active(session) if session.peer_id == peer_id => {
                info!("Client {} disconnected", peer_id);
                self.state = GateState::Idle;
                true
            },
            GateState::Active(session) => {
                debug!(
                    "Ignoring disconnect of {} (session belongs to {})",
                    peer_id, session.peer_id
                );
                false
            },
            GateState::Idle => {
                debug!("Ignoring disconnect of {} (no active session)", peer_id);
                false
            },
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, GateState::Active(_))
    }

    /// True only while `peer_id` holds the session
    pub fn is_active_for(&self, peer_id: PeerId) -> bool {
        matches!(&self.state, GateState::Active(session) if session.peer_id == peer_id)
    }

    pub fn active_session(&self) -> Option<&Session> {
        match &self.state {
            GateState::Active(session) => Some(session),
            GateState::Idle => None,
        }
    }

    pub fn active_peer(&self) -> Option<PeerId> {
        self.active_session().map(|s| s.peer_id)
    }
}
