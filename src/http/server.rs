//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, CORS origin header)
//! - Bind server to listener
//! - Dispatch `/api` calls through the translator to the upstream client

use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{any, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::request::{
    parse_envelope, propagate_request_id_layer, request_id, set_request_id_layer,
};
use crate::http::response::ApiError;
use crate::http::upstream::{UpstreamClient, UpstreamError};
use crate::http::welcome::welcome_page;
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::metrics;
use crate::translator::Translator;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub translator: Translator,
    pub upstream: UpstreamClient,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let state = AppState {
            translator: Translator::new(config.security.strict_validation),
            upstream: UpstreamClient::new(&config.upstream)?,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(welcome))
            .route(
                "/api",
                post(api_handler)
                    .options(preflight)
                    .fallback(method_not_allowed),
            )
            .fallback(not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %req.method(),
                            path = %req.uri().path(),
                            request_id = %request_id(req.headers()),
                        )
                    }))
                    .layer(propagate_request_id_layer()),
            )
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ))
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Stops on Ctrl+C, SIGTERM, or a message on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            strict_validation = self.config.security.strict_validation,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {},
                    _ = shutdown.recv() => {},
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Translate a logical request and relay the upstream reply.
async fn api_handler(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let start = Instant::now();

    let envelope = parse_envelope(&body)?;
    let rule = envelope.rule()?;
    let fields = envelope.into_fields()?;
    let outbound = state.translator.apply(rule, &fields)?;

    tracing::debug!(
        endpoint = outbound.endpoint,
        authorized = outbound.headers.contains_key(header::AUTHORIZATION),
        "Forwarding request"
    );

    let reply = state.upstream.forward(&outbound).await?;

    tracing::info!(
        endpoint = outbound.endpoint,
        status = %reply.status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Relayed upstream reply"
    );
    metrics::record_request(outbound.endpoint, reply.status.as_u16(), start);

    Ok(reply.into_response())
}

/// CORS preflight for `/api`.
async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
            (header::ACCESS_CONTROL_MAX_AGE, "86400"),
        ],
    )
}

async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

async fn welcome() -> Html<&'static str> {
    Html(welcome_page())
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = GatewayConfig::default();
        // Nothing listens here; tests below never reach upstream
        config.upstream.base_url = "http://127.0.0.1:9".into();
        HttpServer::new(config).unwrap()
    }

    async fn send(method: Method, uri: &str, body: Body) -> Response {
        server()
            .router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn post_api(payload: Value) -> Response {
        send(Method::POST, "/api", Body::from(payload.to_string())).await
    }

    async fn body_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn allow_origin(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn test_welcome_page() {
        let response = send(Method::GET, "/", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(allow_origin(&response), Some("*"));
        assert!(response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        assert!(body_of(response).await.contains("/api/2/menu"));
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let response = send(Method::GET, "/nope", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(allow_origin(&response), Some("*"));
        assert_eq!(body_of(response).await, "Not Found");
    }

    #[tokio::test]
    async fn test_preflight() {
        let response = send(Method::OPTIONS, "/api", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "POST, OPTIONS"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "Content-Type, Authorization"
        );
        assert_eq!(headers.get(header::ACCESS_CONTROL_MAX_AGE).unwrap(), "86400");
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let response = send(method, "/api", Body::empty()).await;
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(allow_origin(&response), Some("*"));
            assert_eq!(body_of(response).await, "Method Not Allowed");
        }
    }

    #[tokio::test]
    async fn test_forbidden_endpoint() {
        let response = post_api(json!({"endpoint": "/unknown/path", "body": {}})).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(allow_origin(&response), Some("*"));
        assert_eq!(body_of(response).await, "Forbidden endpoint");
    }

    #[tokio::test]
    async fn test_forbidden_endpoint_ignores_body() {
        for body in [
            json!(null),
            json!({"startRevision": "x"}),
            json!({"token": 42}),
            json!("not an object"),
        ] {
            let response = post_api(json!({"endpoint": "/unknown/path", "body": body.clone()})).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "body {}", body);
            assert_eq!(body_of(response).await, "Forbidden endpoint");
        }

        let response = post_api(json!({"body": {}})).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_mistyped_field_on_allowed_endpoint() {
        let response = post_api(json!({
            "endpoint": "/api/2/menu",
            "body": {"startRevision": "x"}
        }))
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_str(&body_of(response).await).unwrap();
        assert_eq!(body["kind"], "malformed_request");
    }

    #[tokio::test]
    async fn test_invalid_identifiers() {
        let response = post_api(json!({
            "endpoint": "/api/1/terminal_groups",
            "body": {"organizationIds": ["not-a-guid"]}
        }))
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_str(&body_of(response).await).unwrap();
        assert_eq!(body["kind"], "invalid_identifier_format");
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let response = send(Method::POST, "/api", Body::from("{not json")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_str(&body_of(response).await).unwrap();
        assert_eq!(body["kind"], "malformed_request");
        assert!(body["error"].as_str().unwrap().starts_with("Malformed request"));
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let response = send(Method::GET, "/", Body::empty()).await;
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_body_limit() {
        let mut config = GatewayConfig::default();
        config.security.max_body_size = 16;
        let server = HttpServer::new(config).unwrap();

        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api")
                    .header(header::CONTENT_LENGTH, "64")
                    .body(Body::from(vec![b'x'; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(allow_origin(&response), Some("*"));
    }
}
