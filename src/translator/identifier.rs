//! Organization identifier validation.
//!
//! An identifier is accepted only in the hyphenated 8-4-4-4-12 form, with a
//! version nibble of 1-5 and the RFC 4122 variant (`8`, `9`, `a`, `b`).
//! Hex digits are case-insensitive.

use serde_json::Value;
use uuid::{Uuid, Variant};

use super::error::TranslateError;

/// Length of the hyphenated textual form.
const HYPHENATED_LEN: usize = 36;

/// Returns true if `candidate` is a canonical, versioned UUID.
pub fn is_valid_identifier(candidate: &str) -> bool {
    // The parser also accepts simple, braced and URN forms; those all differ in length.
    if candidate.len() != HYPHENATED_LEN {
        return false;
    }

    match Uuid::parse_str(candidate) {
        Ok(id) => matches!(id.get_version_num(), 1..=5) && id.get_variant() == Variant::RFC4122,
        Err(_) => false,
    }
}

/// Filters a caller-supplied identifier list down to its well-formed members.
///
/// Absent and empty lists yield an empty list. A non-empty list whose members
/// are all malformed (non-strings included) is rejected.
pub fn retain_valid(supplied: Option<&[Value]>) -> Result<Vec<String>, TranslateError> {
    let supplied = match supplied {
        Some(ids) if !ids.is_empty() => ids,
        _ => return Ok(Vec::new()),
    };

    let kept: Vec<String> = supplied
        .iter()
        .filter_map(Value::as_str)
        .filter(|id| is_valid_identifier(id))
        .map(str::to_owned)
        .collect();

    if kept.is_empty() {
        return Err(TranslateError::InvalidIdentifierFormat {
            supplied: supplied.len(),
        });
    }

    if kept.len() < supplied.len() {
        tracing::debug!(
            supplied = supplied.len(),
            kept = kept.len(),
            "Dropped malformed organization identifiers"
        );
    }

    Ok(kept)
}
