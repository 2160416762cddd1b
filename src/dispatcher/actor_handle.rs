//! DispatcherHandle - public API for the DispatcherActor
//!
//! Cheap to clone. Transport events and host writes never wait; host reads
//! await a oneshot answer and return `None` once the actor is gone.

use std::net::SocketAddr;
use tokio::sync::{mpsc, oneshot};

use super::commands::{DispatcherCommand, SessionStatus};
use crate::session::PeerId;
use crate::transport::TransportEvent;
use crate::widgets::{ControllerSample, WidgetKind};

#[derive(Clone)]
pub struct DispatcherHandle {
    cmd_tx: mpsc::UnboundedSender<DispatcherCommand>,
}

impl DispatcherHandle {
    pub fn new(cmd_tx: mpsc::UnboundedSender<DispatcherCommand>) -> Self {
        Self { cmd_tx }
    }

    // =========================================================================
    // Transport side (fire-and-forget)
    // =========================================================================

    pub fn on_connect(&self, peer: PeerId, address: SocketAddr) {
        self.send_event(TransportEvent::Connected { peer, address });
    }

    pub fn on_disconnect(&self, peer: PeerId) {
        self.send_event(TransportEvent::Disconnected { peer });
    }

    pub fn on_frame(&self, peer: PeerId, text: String) {
        self.send_event(TransportEvent::Frame { peer, text });
    }

    fn send_event(&self, event: TransportEvent) {
        let _ = self.cmd_tx.send(DispatcherCommand::Transport(event));
    }

    // =========================================================================
    // Host side
    // =========================================================================

    /// Print a line on the client's monitor (no-op without a session)
    pub fn send_line(&self, text: impl Into<String>) {
        let _ = self.cmd_tx.send(DispatcherCommand::SendLine { text: text.into() });
    }

    pub fn clear_pending(&self) {
        let _ = self.cmd_tx.send(DispatcherCommand::ClearPending);
    }

    pub fn clear_message_flag(&self) {
        let _ = self.cmd_tx.send(DispatcherCommand::ClearMessageFlag);
    }

    pub async fn sample(&self, kind: WidgetKind) -> Option<ControllerSample> {
        self.request(|response| DispatcherCommand::GetSample { kind, response })
            .await
    }

    /// Pending command and its arrived flag (flag is not reset)
    pub async fn take_pending(&self) -> Option<(String, bool)> {
        self.request(|response| DispatcherCommand::TakePending { response })
            .await
    }

    pub async fn last_message(&self) -> Option<(String, bool)> {
        self.request(|response| DispatcherCommand::LastMessage { response })
            .await
    }

    /// Current session, `None` when idle or when the actor is gone
    pub async fn status(&self) -> Option<SessionStatus> {
        self.request(|response| DispatcherCommand::Status { response })
            .await
            .flatten()
    }

    pub async fn is_connected(&self) -> bool {
        self.status().await.is_some()
    }

    /// Check if the actor is still running
    pub fn is_alive(&self) -> bool {
        !self.cmd_tx.is_closed()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> DispatcherCommand,
    ) -> Option<T> {
        let (response_tx, response_rx) = oneshot::channel();
        if self.cmd_tx.send(build(response_tx)).is_err() {
            return None;
        }
        response_rx.await.ok()
    }
}
