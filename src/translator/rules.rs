//! Endpoint allow-list and per-endpoint body shaping.
//!
//! # Design Decisions
//! - One immutable record per endpoint; adding an endpoint is a table entry
//! - Exact path match, no prefixes or normalization
//! - Unknown paths have no rule and are rejected by the caller

use super::error::TranslateError;
use super::identifier::retain_valid;
use super::outbound::{
    AccessTokenBody, MenuBody, OrganizationScopedBody, OrganizationsBody, OutboundBody,
    TerminalGroupsBody,
};
use super::request::{Field, RequestFields};

/// Payload layout an endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// `{apiLogin}`
    AccessToken,
    /// `{organizationIds: null, returnAdditionalInfo, includeDisabled}`
    Organizations,
    /// `{organizationId, startRevision}`
    Menu,
    /// `{organizationIds, includeDisabled}`
    TerminalGroups,
    /// `{organizationIds}`
    OrganizationScoped,
}

impl BodyShape {
    /// Build the outbound body, applying defaults and validating identifiers.
    pub fn build(self, fields: &RequestFields) -> Result<OutboundBody, TranslateError> {
        let body = match self {
            BodyShape::AccessToken => OutboundBody::AccessToken(AccessTokenBody {
                api_login: fields.api_login.clone(),
            }),
            BodyShape::Organizations => OutboundBody::Organizations(OrganizationsBody {
                organization_ids: None,
                return_additional_info: fields.return_additional_info.unwrap_or(false),
                include_disabled: fields.include_disabled.unwrap_or(false),
            }),
            BodyShape::Menu => OutboundBody::Menu(MenuBody {
                organization_id: fields.organization_id.clone(),
                start_revision: fields.start_revision.unwrap_or(0),
            }),
            BodyShape::TerminalGroups => OutboundBody::TerminalGroups(TerminalGroupsBody {
                organization_ids: retain_valid(fields.organization_ids.as_deref())?,
                include_disabled: fields.include_disabled.unwrap_or(false),
            }),
            BodyShape::OrganizationScoped => {
                OutboundBody::OrganizationScoped(OrganizationScopedBody {
                    organization_ids: retain_valid(fields.organization_ids.as_deref())?,
                })
            }
        };
        Ok(body)
    }
}

/// Translation policy for one upstream endpoint.
#[derive(Debug)]
pub struct EndpointRule {
    /// Exact upstream path.
    pub path: &'static str,
    /// Short human description, shown on the welcome page.
    pub description: &'static str,
    pub shape: BodyShape,
    /// Attach `body.token` as a bearer credential when present.
    pub forwards_auth: bool,
    pub required: &'static [Field],
}

impl EndpointRule {
    /// Required fields absent from `fields`.
    pub fn missing_fields<'a>(
        &'a self,
        fields: &'a RequestFields,
    ) -> impl Iterator<Item = Field> + 'a {
        self.required.iter().copied().filter(move |f| !fields.has(*f))
    }
}

/// Every endpoint the gateway will forward to.
pub static ENDPOINT_RULES: &[EndpointRule] = &[
    EndpointRule {
        path: "/api/1/access_token",
        description: "obtain an access token",
        shape: BodyShape::AccessToken,
        forwards_auth: false,
        required: &[Field::ApiLogin],
    },
    EndpointRule {
        path: "/api/1/organizations",
        description: "list organizations",
        shape: BodyShape::Organizations,
        forwards_auth: true,
        required: &[],
    },
    EndpointRule {
        path: "/api/2/menu",
        description: "fetch the menu",
        shape: BodyShape::Menu,
        forwards_auth: true,
        required: &[Field::OrganizationId],
    },
    EndpointRule {
        path: "/api/1/terminal_groups",
        description: "list terminal groups",
        shape: BodyShape::TerminalGroups,
        forwards_auth: true,
        required: &[],
    },
    EndpointRule {
        path: "/api/1/deliveries/order_types",
        description: "list order types",
        shape: BodyShape::OrganizationScoped,
        forwards_auth: true,
        required: &[],
    },
    EndpointRule {
        path: "/api/1/payment_types",
        description: "list payment types",
        shape: BodyShape::OrganizationScoped,
        forwards_auth: true,
        required: &[],
    },
];

/// Find the rule for `endpoint`, if it is allowed.
pub fn lookup(endpoint: &str) -> Option<&'static EndpointRule> {
    ENDPOINT_RULES.iter().find(|rule| rule.path == endpoint)
}
