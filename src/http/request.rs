//! Inbound request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) and echo it on the response
//! - Decode the `{endpoint, body}` envelope from the raw body
//! - Resolve the endpoint before the body is typed
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The body is decoded by hand so malformed JSON maps to the gateway's
//!   own error shape instead of axum's extractor rejection
//! - Decoding is staged: an endpoint outside the allow-list is forbidden
//!   whatever its body holds

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName};
use serde::Deserialize;
use serde_json::Value;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::http::response::ApiError;
use crate::translator::{lookup, EndpointRule, RequestFields, TranslateError};

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Assigns an `x-request-id` to requests that lack one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// The request ID, or `"unknown"` if absent or not UTF-8.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// The outer `{endpoint, body}` object, with both members still untyped.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    endpoint: Value,
    #[serde(default)]
    body: Value,
}

impl Envelope {
    /// The rule for the requested endpoint.
    ///
    /// A missing or non-string endpoint is forbidden like any unknown path.
    pub fn rule(&self) -> Result<&'static EndpointRule, TranslateError> {
        self.endpoint.as_str().and_then(lookup).ok_or_else(|| {
            let endpoint = match &self.endpoint {
                Value::String(path) => path.clone(),
                other => other.to_string(),
            };
            TranslateError::ForbiddenEndpoint(endpoint)
        })
    }

    /// Type the body. A missing or `null` body is an empty field bag.
    pub fn into_fields(self) -> Result<RequestFields, ApiError> {
        match self.body {
            Value::Null => Ok(RequestFields::default()),
            body => serde_json::from_value(body)
                .map_err(|e| ApiError::MalformedRequest(format!("body: {}", e))),
        }
    }
}

/// Decode the envelope from a JSON payload.
pub fn parse_envelope(body: &Bytes) -> Result<Envelope, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedRequest(e.to_string()))
}
