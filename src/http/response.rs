//! Response handling.
//!
//! # Responsibilities
//! - Relay upstream replies with their status and body untouched
//! - Map translation, parsing and upstream failures to HTTP responses
//! - Log and count every rejection once, at the point it becomes a response
//!
//! # Design Decisions
//! - A forbidden endpoint is a plain-text 403 with no body shaping
//! - Every other failure carries a JSON body `{error, kind}`
//! - Non-2xx upstream statuses are relayed, not treated as errors

use axum::{
    body::Bytes,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::http::upstream::UpstreamError;
use crate::observability::metrics;
use crate::translator::TranslateError;

/// Everything that can stop a request before a reply is relayed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Translate(TranslateError::ForbiddenEndpoint(_)) => StatusCode::FORBIDDEN,
            ApiError::Translate(TranslateError::MissingField { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Translate(_) | ApiError::MalformedRequest(_) | ApiError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Translate(e) => e.kind(),
            ApiError::MalformedRequest(_) => "malformed_request",
            ApiError::Upstream(_) => "upstream_error",
        }
    }

    fn log(&self) {
        match self {
            ApiError::Translate(TranslateError::ForbiddenEndpoint(endpoint)) => {
                tracing::warn!(%endpoint, "Rejected endpoint outside the allow-list");
            }
            ApiError::Translate(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "Rejected request");
            }
            ApiError::MalformedRequest(reason) => {
                tracing::warn!(%reason, "Could not decode request body");
            }
            ApiError::Upstream(e) => {
                tracing::error!(error = %e, "Upstream call failed");
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        metrics::record_rejection(self.kind());

        let status = self.status();
        if status == StatusCode::FORBIDDEN {
            return (status, "Forbidden endpoint").into_response();
        }

        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

/// An upstream reply, relayed verbatim.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

impl IntoResponse for UpstreamReply {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}
