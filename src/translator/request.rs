//! Caller-facing request types.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::TranslateError;

/// The simplified request a caller posts to the gateway.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LogicalRequest {
    /// Upstream endpoint path, e.g. `/api/1/organizations`.
    pub endpoint: String,

    /// Caller-supplied fields; a missing body is an empty field bag.
    #[serde(default)]
    pub body: RequestFields,
}

/// Every field any rule understands. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_login: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    /// Kept loosely typed so non-string members are dropped, not fatal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_ids: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_revision: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_additional_info: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_disabled: Option<bool>,

    /// Opaque upstream access token, forwarded as a bearer credential.
    /// Any JSON scalar is accepted; see [`RequestFields::bearer_token`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<Value>,
}

/// Fields a rule may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ApiLogin,
    OrganizationId,
}

impl Field {
    /// Wire name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Field::ApiLogin => "apiLogin",
            Field::OrganizationId => "organizationId",
        }
    }
}

impl RequestFields {
    /// Whether `field` carries a value.
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::ApiLogin => self.api_login.is_some(),
            Field::OrganizationId => self.organization_id.is_some(),
        }
    }

    /// The token rendered as header text.
    ///
    /// `null`, `false`, `""` and `0` count as no token. Strings and numbers
    /// are rendered verbatim, `true` as `"true"`. Arrays and objects have no
    /// textual form and are rejected.
    pub fn bearer_token(&self) -> Result<Option<Cow<'_, str>>, TranslateError> {
        let token = match &self.token {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(Value::Bool(true)) => Some(Cow::Borrowed("true")),
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(Cow::Borrowed(s.as_str())),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Some(Value::Number(n)) => Some(Cow::Owned(n.to_string())),
            Some(Value::Array(_) | Value::Object(_)) => return Err(TranslateError::InvalidToken),
        };
        Ok(token)
    }
}
