//! End-to-end tests: a real WebSocket server driven by tungstenite clients

use futures::{SinkExt, StreamExt};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use padlink::dispatcher::{DispatcherActor, DispatcherHandle, ProtocolDispatcher};
use padlink::network::NetworkInfo;
use padlink::transport::ws::basic_auth_header;
use padlink::transport::{serve, PeerRegistry, ServerHandle, WsServerConfig};
use padlink::widgets::WidgetKind;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const REPORTED_ADDRESS: &str = "pad.test";

async fn start(authorization: Option<String>) -> (ServerHandle, DispatcherHandle) {
    let registry = Arc::new(PeerRegistry::new());
    let network = Arc::new(NetworkInfo::with_detected(
        "pad",
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        Some(REPORTED_ADDRESS.to_string()),
    ));
    let dispatcher = DispatcherActor::spawn(ProtocolDispatcher::new(registry.clone(), network));

    let config = WsServerConfig {
        bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        path: "/".to_string(),
        authorization,
    };
    let server = serve(config, registry, dispatcher.clone()).await.unwrap();
    (server, dispatcher)
}

fn url(addr: SocketAddr) -> String {
    format!("ws://{}/", addr)
}

async fn connect(addr: SocketAddr) -> Client {
    let (ws, _) = connect_async(url(addr)).await.unwrap();
    ws
}

async fn send(ws: &mut Client, text: &str) {
    ws.send(Message::Text(text.to_string())).await.unwrap();
}

/// Next text frame, or `None` if nothing arrives in time
async fn next_text(ws: &mut Client, wait: Duration) -> Option<String> {
    loop {
        match tokio::time::timeout(wait, ws.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => return Some(text),
            Ok(Some(Ok(_))) => continue,
            _ => return None,
        }
    }
}

const WAIT: Duration = Duration::from_secs(2);
const QUIET: Duration = Duration::from_millis(200);

async fn wait_until_idle(dispatcher: &DispatcherHandle) {
    for _ in 0..100 {
        if !dispatcher.is_connected().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session never went idle");
}

#[tokio::test]
async fn test_cms_is_echoed_as_sms() {
    let (server, _dispatcher) = start(None).await;
    let mut client = connect(server.local_addr()).await;

    send(&mut client, "cms,42").await;
    assert_eq!(next_text(&mut client, WAIT).await.as_deref(), Some("sms,42"));

    client.close(None).await.unwrap();
    server.shutdown().await;
}

#[tokio::test]
async fn test_initrequest_gets_greeting() {
    let (server, dispatcher) = start(None).await;
    let mut client = connect(server.local_addr()).await;

    send(&mut client, "serial,initrequest").await;
    assert_eq!(
        next_text(&mut client, WAIT).await.as_deref(),
        Some("monitor,Connected to Server pad.test")
    );
    assert_eq!(dispatcher.take_pending().await, Some((String::new(), false)));
}

#[tokio::test]
async fn test_widgets_commands_and_monitor_lines() {
    let (server, dispatcher) = start(None).await;
    let mut client = connect(server.local_addr()).await;

    send(&mut client, "joystick,0.5,-0.3").await;
    send(&mut client, "serial,movemotor").await;
    // Round trip so the frames above are known to be processed
    send(&mut client, "cms,sync").await;
    assert_eq!(next_text(&mut client, WAIT).await.as_deref(), Some("sms,sync"));

    let sample = dispatcher.sample(WidgetKind::Joystick).await.unwrap();
    assert_eq!((sample.x, sample.y), (0.5, -0.3));
    assert_eq!(
        dispatcher.take_pending().await,
        Some(("movemotor".to_string(), true))
    );

    dispatcher.send_line("hello");
    assert_eq!(
        next_text(&mut client, WAIT).await.as_deref(),
        Some("monitor,hello")
    );
}

#[tokio::test]
async fn test_second_client_is_refused_until_reconnect() {
    let (server, dispatcher) = start(None).await;
    let addr = server.local_addr();

    let mut first = connect(addr).await;
    send(&mut first, "cms,a").await;
    assert_eq!(next_text(&mut first, WAIT).await.as_deref(), Some("sms,a"));

    let mut second = connect(addr).await;
    send(&mut second, "cms,b").await;
    send(&mut second, "serial,hijack").await;
    assert_eq!(next_text(&mut second, QUIET).await, None);

    send(&mut first, "cms,c").await;
    assert_eq!(next_text(&mut first, WAIT).await.as_deref(), Some("sms,c"));
    assert_eq!(dispatcher.take_pending().await, Some((String::new(), false)));

    first.close(None).await.unwrap();
    wait_until_idle(&dispatcher).await;

    // Refused sockets are not promoted; a fresh connection is admitted
    send(&mut second, "cms,d").await;
    assert_eq!(next_text(&mut second, QUIET).await, None);

    let mut third = connect(addr).await;
    send(&mut third, "cms,e").await;
    assert_eq!(next_text(&mut third, WAIT).await.as_deref(), Some("sms,e"));
}

#[tokio::test]
async fn test_authorization_required_when_configured() {
    let header = basic_auth_header("admin", "secret");
    let (server, _dispatcher) = start(Some(header.clone())).await;
    let addr = server.local_addr();

    match connect_async(url(addr)).await {
        Err(WsError::Http(response)) => assert_eq!(response.status().as_u16(), 401),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("upgrade without credentials must fail"),
    }

    let mut request = url(addr).into_client_request().unwrap();
    request
        .headers_mut()
        .insert("Authorization", header.parse().unwrap());
    let (mut client, _) = connect_async(request).await.unwrap();

    send(&mut client, "cms,ok").await;
    assert_eq!(next_text(&mut client, WAIT).await.as_deref(), Some("sms,ok"));

    server.set_authorization(None);
    let mut open = connect(addr).await;
    send(&mut open, "cms,refused").await;
    assert_eq!(next_text(&mut open, QUIET).await, None);
}
