//! WebSocket server - accepts clients and feeds the dispatcher actor
//!
//! Every accepted socket gets a fresh [`PeerId`] and an outbound queue in the
//! [`PeerRegistry`]. Text frames are forwarded verbatim; binary, ping and pong
//! frames are ignored. Admission is decided by the dispatcher, not here: a
//! refused socket stays open but nothing it sends has any effect.

use anyhow::{Context, Result};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use parking_lot::RwLock;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::PeerRegistry;
use crate::dispatcher::DispatcherHandle;
use crate::session::PeerId;

/// Listener settings
#[derive(Debug, Clone)]
pub struct WsServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Route the upgrade is served on (e.g. `/`)
    pub path: String,
    /// Expected `Authorization` header value, if clients must authenticate
    pub authorization: Option<String>,
}

/// Value of an HTTP Basic `Authorization` header
pub fn basic_auth_header(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
}

#[derive(Clone)]
struct WsState {
    registry: Arc<PeerRegistry>,
    dispatcher: DispatcherHandle,
    authorization: Arc<RwLock<Option<String>>>,
}

/// Running server
pub struct ServerHandle {
    local_addr: SocketAddr,
    authorization: Arc<RwLock<Option<String>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Swap the required credentials; applies to new upgrades only
    pub fn set_authorization(&self, authorization: Option<String>) {
        let enabled = authorization.is_some();
        *self.authorization.write() = authorization;
        info!(
            "WebSocket authorization {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }

    /// Stop accepting connections and wait for the server task
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            warn!("WebSocket server task ended abnormally: {}", e);
        }
    }
}

/// Bind the listener and start serving in the background
pub async fn serve(
    config: WsServerConfig,
    registry: Arc<PeerRegistry>,
    dispatcher: DispatcherHandle,
) -> Result<ServerHandle> {
    let authorization = Arc::new(RwLock::new(config.authorization.clone()));
    let state = WsState {
        registry,
        dispatcher,
        authorization: authorization.clone(),
    };

    let app = Router::new()
        .route(&config.path, get(websocket_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind((config.bind, config.port))
        .await
        .with_context(|| format!("Failed to bind WebSocket server on {}:{}", config.bind, config.port))?;
    let local_addr = listener
        .local_addr()
        .context("Failed to read bound address")?;

    info!("WebSocket server listening on ws://{}{}", local_addr, config.path);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let server = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });

        if let Err(e) = server.await {
            warn!("WebSocket server failed: {}", e);
        }
        info!("WebSocket server stopped");
    });

    Ok(ServerHandle {
        local_addr,
        authorization,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(address): ConnectInfo<SocketAddr>,
    State(state): State<WsState>,
    headers: HeaderMap,
) -> Response {
    if !is_authorized(&state, &headers) {
        warn!("Rejecting unauthorized upgrade from {}", address);
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"padlink\"")],
        )
            .into_response();
    }

    ws.on_upgrade(move |socket| handle_socket(socket, address, state))
}

fn is_authorized(state: &WsState, headers: &HeaderMap) -> bool {
    let expected = state.authorization.read();
    match expected.as_deref() {
        None => true,
        Some(expected) => headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == expected),
    }
}

async fn handle_socket(mut socket: WebSocket, address: SocketAddr, state: WsState) {
    let (peer, mut outbound) = state.registry.register();
    debug!("Socket {} opened from {}", peer, address);
    state.dispatcher.on_connect(peer, address);

    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => state.dispatcher.on_frame(peer, text),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    debug!("Socket {} read error: {}", peer, e);
                    break;
                },
            },
            Some(frame) = outbound.recv() => {
                if let Err(e) = socket.send(Message::Text(frame)).await {
                    debug!("Socket {} write error: {}", peer, e);
                    break;
                }
            }
        }
    }

    close(peer, &state);
}

fn close(peer: PeerId, state: &WsState) {
    state.registry.unregister(peer);
    state.dispatcher.on_disconnect(peer);
    debug!("Socket {} closed", peer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_header() {
        // RFC 7617 example
        assert_eq!(
            basic_auth_header("Aladdin", "open sesame"),
            "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
        );
    }
}
