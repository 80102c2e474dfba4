//! Upstream-facing request types.
//!
//! Each body struct serializes to exactly the JSON object the upstream API
//! expects for its endpoint. Defaults are applied before these are built.

use axum::http::HeaderMap;
use serde::Serialize;

/// A fully shaped request, ready to be POSTed upstream.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// Upstream path, taken from the matched rule.
    pub endpoint: &'static str,
    /// `Content-Type` and, when forwarded, `Authorization`.
    pub headers: HeaderMap,
    pub body: OutboundBody,
}

impl OutboundRequest {
    /// Serialize the body to JSON bytes.
    pub fn body_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.body)
    }
}

/// Body shapes, one per upstream payload layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundBody {
    AccessToken(AccessTokenBody),
    Organizations(OrganizationsBody),
    Menu(MenuBody),
    TerminalGroups(TerminalGroupsBody),
    OrganizationScoped(OrganizationScopedBody),
}

impl OutboundBody {
    /// The identifier list, for shapes that carry one.
    pub fn organization_ids(&self) -> Option<&[String]> {
        match self {
            OutboundBody::TerminalGroups(b) => Some(&b.organization_ids),
            OutboundBody::OrganizationScoped(b) => Some(&b.organization_ids),
            OutboundBody::Organizations(b) => b.organization_ids.as_deref(),
            OutboundBody::AccessToken(_) | OutboundBody::Menu(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_login: Option<String>,
}

/// `organizationIds` is always sent as `null`: upstream then lists every
/// organization the token can see.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationsBody {
    pub organization_ids: Option<Vec<String>>,
    pub return_additional_info: bool,
    pub include_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub start_revision: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalGroupsBody {
    pub organization_ids: Vec<String>,
    pub include_disabled: bool,
}

/// Shared by order types and payment types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationScopedBody {
    pub organization_ids: Vec<String>,
}
