//! Registry of open sockets and their outbound queues

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::trace;

use super::{FrameSink, TransportError};
use crate::session::PeerId;

/// Maps every open socket to the queue its writer task drains
///
/// Uses DashMap so socket tasks can register and unregister while the
/// dispatcher actor sends concurrently.
#[derive(Default)]
pub struct PeerRegistry {
    peers: DashMap<PeerId, mpsc::UnboundedSender<String>>,
    next_id: AtomicU64,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id and register its outbound queue
    pub fn register(&self) -> (PeerId, mpsc::UnboundedReceiver<String>) {
        let peer = PeerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        self.peers.insert(peer, tx);
        trace!("Registered socket {}", peer);
        (peer, rx)
    }

    pub fn unregister(&self, peer: PeerId) {
        self.peers.remove(&peer);
        trace!("Unregistered socket {}", peer);
    }

    /// Number of open sockets (admitted or not)
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

impl FrameSink for PeerRegistry {
    fn send(&self, peer: PeerId, frame: String) -> Result<(), TransportError> {
        let tx = self
            .peers
            .get(&peer)
            .ok_or(TransportError::UnknownPeer(peer))?;
        tx.send(frame)
            .map_err(|_| TransportError::ChannelClosed(peer))
    }
}
