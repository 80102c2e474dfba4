//! Request translation subsystem.
//!
//! # Data Flow
//! ```text
//! LogicalRequest {endpoint, body}
//!     → rules.rs (exact lookup in the allow-list, else ForbiddenEndpoint)
//!     → required-field check (strict: reject, lenient: warn)
//!     → rules.rs BodyShape::build (defaults)
//!     → identifier.rs (drop malformed IDs, reject if none remain)
//!     → bearer header when the rule forwards auth
//!     → OutboundRequest {endpoint, headers, body}
//! ```
//!
//! # Design Decisions
//! - Pure and synchronous: no I/O, no shared mutable state
//! - The rule table is a `static`; nothing is built at startup
//! - The token is opaque; strings and numbers pass through verbatim

pub mod error;
pub mod identifier;
pub mod outbound;
pub mod request;
pub mod rules;

use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderMap, HeaderValue,
};

pub use error::TranslateError;
pub use outbound::{OutboundBody, OutboundRequest};
pub use request::{Field, LogicalRequest, RequestFields};
pub use rules::{lookup, EndpointRule, ENDPOINT_RULES};

/// Maps logical requests to outbound requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    /// Reject requests missing a required field instead of forwarding them.
    strict: bool,
}

impl Translator {
    /// Create a translator. `strict` enables required-field enforcement.
    pub const fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Translate `fields` for `endpoint`, or reject them.
    pub fn translate(
        &self,
        endpoint: &str,
        fields: &RequestFields,
    ) -> Result<OutboundRequest, TranslateError> {
        let rule =
            lookup(endpoint).ok_or_else(|| TranslateError::ForbiddenEndpoint(endpoint.to_string()))?;
        self.apply(rule, fields)
    }

    /// Shape `fields` according to an already resolved `rule`.
    pub fn apply(
        &self,
        rule: &'static EndpointRule,
        fields: &RequestFields,
    ) -> Result<OutboundRequest, TranslateError> {
        for field in rule.missing_fields(fields) {
            if self.strict {
                return Err(TranslateError::MissingField {
                    endpoint: rule.path,
                    field: field.name(),
                });
            }
            tracing::warn!(
                endpoint = rule.path,
                field = field.name(),
                "Required field missing, forwarding without it"
            );
        }

        let body = rule.shape.build(fields)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if rule.forwards_auth {
            if let Some(token) = fields.bearer_token()? {
                headers.insert(AUTHORIZATION, bearer(&token)?);
            }
        }

        Ok(OutboundRequest {
            endpoint: rule.path,
            headers,
            body,
        })
    }
}

/// Translate with the default (lenient) translator.
pub fn translate(endpoint: &str, fields: &RequestFields) -> Result<OutboundRequest, TranslateError> {
    Translator::default().translate(endpoint, fields)
}

fn bearer(token: &str) -> Result<HeaderValue, TranslateError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| TranslateError::InvalidToken)?;
    value.set_sensitive(true);
    Ok(value)
}
