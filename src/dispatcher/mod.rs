//! Protocol dispatcher - core orchestration of one client session
//!
//! The dispatcher owns every piece of mutable protocol state:
//! - the [`SessionGate`] deciding which peer may talk to us
//! - one [`ControllerSample`] per widget kind (inside [`WidgetSet`])
//! - the pending host command ([`CommandChannel`])
//! - the last raw frame received from the admitted peer
//!
//! It is constructed explicitly with its collaborators and driven one event
//! at a time, either directly (tests, embedding) or through the
//! [`DispatcherActor`] which serializes transport events and host queries.

mod actor;
mod actor_handle;
mod commands;
mod frame;

pub use actor::DispatcherActor;
pub use actor_handle::DispatcherHandle;
pub use commands::{DispatcherCommand, SessionStatus};
pub use frame::FrameOutcome;


use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;

use crate::command::CommandChannel;
use crate::network::AddressSource;
use crate::session::{Admission, PeerId, Session, SessionGate};
use crate::transport::{FrameSink, TransportEvent};
use crate::widgets::{ControllerSample, WidgetKind, WidgetSet};

/// Most recent raw frame from the admitted peer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastMessage {
    pub text: String,
    /// Set on every admitted frame, cleared only by the host
    pub arrived: bool,
}

/// Routes decoded frames of the single admitted peer to their sinks
pub struct ProtocolDispatcher {
    gate: SessionGate,
    widgets: WidgetSet,
    commands: CommandChannel,
    address: Arc<dyn AddressSource>,
    last_message: LastMessage,
}

impl ProtocolDispatcher {
    /// Create a dispatcher in the `Idle` state with zeroed samples
    pub fn new(sink: Arc<dyn FrameSink>, address: Arc<dyn AddressSource>) -> Self {
        Self {
            gate: SessionGate::new(),
            widgets: WidgetSet::new(),
            commands: CommandChannel::new(sink),
            address,
            last_message: LastMessage::default(),
        }
    }

    /// Apply one transport event
    pub fn on_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected { peer, address } => {
                self.peer_connected(peer, address);
            },
            TransportEvent::Disconnected { peer } => {
                self.peer_disconnected(peer);
            },
            TransportEvent::Frame { peer, text } => {
                let outcome = self.handle_frame(peer, &text);
                debug!("Frame from {}: {:?}", peer, outcome);
            },
        }
    }

    pub fn peer_connected(&mut self, peer: PeerId, address: SocketAddr) -> Admission {
        self.gate.peer_connected(peer, address)
    }

    pub fn peer_disconnected(&mut self, peer: PeerId) -> bool {
        self.gate.peer_disconnected(peer)
    }

    pub fn is_connected(&self) -> bool {
        self.gate.is_active()
    }

    pub fn session(&self) -> Option<&Session> {
        self.gate.active_session()
    }

    /// Snapshot of one widget's sample
    pub fn sample(&self, kind: WidgetKind) -> ControllerSample {
        self.widgets.sample(kind)
    }

    pub fn take_pending(&self) -> (String, bool) {
        self.commands.take_pending()
    }

    pub fn clear_pending(&mut self) {
        self.commands.clear_pending();
    }

    /// Host print path: `monitor,<text>` to the session peer, if any
    pub fn send_line(&self, text: &str) -> bool {
        self.commands.send_line(&self.gate, text)
    }

    pub fn last_message(&self) -> (String, bool) {
        (self.last_message.text.clone(), self.last_message.arrived)
    }

    pub fn clear_message_flag(&mut self) {
        self.last_message.arrived = false;
    }

    pub fn current_address(&self) -> String {
        self.address.current_address()
    }
}
