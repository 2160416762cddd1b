//! DispatcherActor - serializes every access to the dispatcher
//!
//! Socket tasks and the host console run concurrently, but the protocol state
//! must see one event at a time. The actor owns the [`ProtocolDispatcher`]
//! and drains a single command queue, so each frame is processed to
//! completion before the next event or query is looked at.

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use super::actor_handle::DispatcherHandle;
use super::commands::{DispatcherCommand, SessionStatus};
use super::ProtocolDispatcher;

pub struct DispatcherActor {
    dispatcher: ProtocolDispatcher,
    command_rx: mpsc::UnboundedReceiver<DispatcherCommand>,
    frames_processed: u64,
}

impl DispatcherActor {
    /// Spawn the actor's run loop and return a handle to it
    ///
    /// The loop ends once every handle has been dropped.
    pub fn spawn(dispatcher: ProtocolDispatcher) -> DispatcherHandle {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let actor = DispatcherActor {
            dispatcher,
            command_rx: cmd_rx,
            frames_processed: 0,
        };
        tokio::spawn(actor.run());

        info!("DispatcherActor spawned");
        DispatcherHandle::new(cmd_tx)
    }

    async fn run(mut self) {
        debug!("DispatcherActor run loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            trace!(?cmd, "Processing command");
            self.handle(cmd);
        }

        info!(
            "DispatcherActor stopped after {} frame(s)",
            self.frames_processed
        );
    }

    fn handle(&mut self, cmd: DispatcherCommand) {
        match cmd {
            DispatcherCommand::Transport(event) => {
                if matches!(event, crate::transport::TransportEvent::Frame { .. }) {
                    self.frames_processed += 1;
                }
                self.dispatcher.on_event(event);
            },
            DispatcherCommand::SendLine { text } => {
                self.dispatcher.send_line(&text);
            },
            DispatcherCommand::ClearPending => self.dispatcher.clear_pending(),
            DispatcherCommand::ClearMessageFlag => self.dispatcher.clear_message_flag(),

            DispatcherCommand::GetSample { kind, response } => {
                let _ = response.send(self.dispatcher.sample(kind));
            },
            DispatcherCommand::TakePending { response } => {
                let _ = response.send(self.dispatcher.take_pending());
            },
            DispatcherCommand::LastMessage { response } => {
                let _ = response.send(self.dispatcher.last_message());
            },
            DispatcherCommand::Status { response } => {
                let status = self.dispatcher.session().map(|s| SessionStatus {
                    peer: s.peer_id,
                    address: s.peer_address,
                });
                let _ = response.send(status);
            },
        }
    }
}
