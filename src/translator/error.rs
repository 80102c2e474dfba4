//! Translation rejections.

use thiserror::Error;

/// Reasons a logical request cannot be turned into an outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// The endpoint is not in the allow-list.
    #[error("Forbidden endpoint: {0}")]
    ForbiddenEndpoint(String),

    /// A non-empty identifier list contained no well-formed identifier.
    #[error("Invalid organization ID format: none of the {supplied} supplied identifiers is a valid UUID")]
    InvalidIdentifierFormat { supplied: usize },

    /// A field the rule requires is absent (strict mode only).
    #[error("Missing required field `{field}` for {endpoint}")]
    MissingField {
        endpoint: &'static str,
        field: &'static str,
    },

    /// The caller's token cannot be carried in an HTTP header.
    #[error("Token contains characters not allowed in an Authorization header")]
    InvalidToken,
}

impl TranslateError {
    /// Stable machine-readable name, used in error bodies and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            TranslateError::ForbiddenEndpoint(_) => "forbidden_endpoint",
            TranslateError::InvalidIdentifierFormat { .. } => "invalid_identifier_format",
            TranslateError::MissingField { .. } => "missing_field",
            TranslateError::InvalidToken => "invalid_token",
        }
    }
}
