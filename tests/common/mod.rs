//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    routing::post,
    Router,
};
use iiko_gateway::{GatewayConfig, HttpServer, Shutdown};
use serde_json::Value;
use tokio::net::TcpListener;

/// One request as seen by the mock upstream.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Captured {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct UpstreamState {
    captured: Arc<Mutex<Vec<Captured>>>,
    status: StatusCode,
    reply: &'static str,
}

/// A mock upstream that records every request and answers with a fixed reply.
pub struct MockUpstream {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<Captured>>>,
}

#[allow(dead_code)]
impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

/// Start a recording upstream on an ephemeral port.
pub async fn start_mock_upstream(status: u16, reply: &'static str) -> MockUpstream {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = UpstreamState {
        captured: captured.clone(),
        status: StatusCode::from_u16(status).unwrap(),
        reply,
    };

    let app = Router::new()
        .route("/{*path}", post(record))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream { addr, captured }
}

async fn record(
    State(state): State<UpstreamState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.captured.lock().unwrap().push(Captured {
        path: uri.path().to_string(),
        authorization: header_text(&headers, header::AUTHORIZATION),
        content_type: header_text(&headers, header::CONTENT_TYPE),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    (state.status, state.reply)
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Start the gateway on an ephemeral port, forwarding to `upstream_base`.
///
/// The returned `Shutdown` must be kept alive for the server to keep running.
pub async fn start_gateway(upstream_base: &str) -> (SocketAddr, Shutdown) {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = upstream_base.to_string();
    config.upstream.timeout_secs = 5;

    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
