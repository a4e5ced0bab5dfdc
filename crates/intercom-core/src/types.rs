// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Domain value types exchanged with the native Intercom SDKs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{IntercomError, Result};

/// Wire name of the only native-to-application method.
pub const DEVICE_TOKEN_METHOD: &str = "iosDeviceToken";

/// Unique identifier for one outbound call, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One named method invocation crossing the bridge, in either direction.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub id: CallId,
    pub method: String,
    /// Flat string-keyed object, a bare scalar, or `Null` for no arguments.
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: CallId::new(),
            method: method.into(),
            arguments,
        }
    }

    /// Call with no arguments.
    pub fn bare(method: impl Into<String>) -> Self {
        Self::new(method, Value::Null)
    }
}

/// Visibility of an Intercom UI surface (launcher, in-app messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    Gone,
    Visible,
}

impl Visibility {
    /// Literal understood by the native SDKs.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Gone => "GONE",
            Self::Visible => "VISIBLE",
        }
    }
}

/// Identity supplied to `register_identified_user`.
///
/// Exactly one of the two fields must be non-empty; use [`IdentifiedUser::registration`]
/// to validate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedUser {
    pub user_id: Option<String>,
    pub email: Option<String>,
}

impl IdentifiedUser {
    pub fn with_user_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            email: None,
        }
    }

    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            user_id: None,
            email: Some(email.into()),
        }
    }

    /// Resolve to the single registration variant, rejecting both-or-neither.
    pub fn registration(&self) -> Result<Registration> {
        let user_id = self.user_id.as_deref().filter(|s| !s.is_empty());
        let email = self.email.as_deref().filter(|s| !s.is_empty());
        match (user_id, email) {
            (Some(id), None) => Ok(Registration::UserId(id.to_owned())),
            (None, Some(email)) => Ok(Registration::Email(email.to_owned())),
            (Some(_), Some(_)) => Err(IntercomError::InvalidArgument(
                "user id and email are mutually exclusive; supply only one".into(),
            )),
            (None, None) => Err(IntercomError::InvalidArgument(
                "an identified user needs a user id or an email".into(),
            )),
        }
    }
}

/// A validated identified-user registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    UserId(String),
    Email(String),
}

impl Registration {
    /// Native entry point for this variant.
    pub fn method(&self) -> &'static str {
        match self {
            Self::UserId(_) => "registerIdentifiedUserWithUserId",
            Self::Email(_) => "registerIdentifiedUserWithEmail",
        }
    }

    /// Argument key carrying the identifier.
    pub fn key(&self) -> &'static str {
        match self {
            Self::UserId(_) => "userId",
            Self::Email(_) => "email",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::UserId(v) | Self::Email(v) => v,
        }
    }
}

/// Profile fields forwarded by `update_user`.
///
/// Serialises every field, unset ones as `null`; the native SDK decides
/// what `null` means for each attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAttributes {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub company_id: Option<String>,
    pub user_id: Option<String>,
    /// Sent as whole seconds since the Unix epoch.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub signed_up_at: Option<DateTime<Utc>>,
    /// Locale override, e.g. `"de"`.
    pub language: Option<String>,
    pub custom_attributes: Option<Map<String, Value>>,
}

/// A native-to-application notification, re-emitted to the registered
/// message handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// The platform issued a push registration token.
    DeviceToken { token: String },
}

impl InboundMessage {
    /// Wire method name the message arrived under.
    pub fn method(&self) -> &'static str {
        match self {
            Self::DeviceToken { .. } => DEVICE_TOKEN_METHOD,
        }
    }

    /// Tagged map form handed to application code.
    pub fn to_value(&self) -> Value {
        match self {
            Self::DeviceToken { token } => serde_json::json!({
                "method": DEVICE_TOKEN_METHOD,
                "token": token,
            }),
        }
    }
}

/// Push payload with every value confirmed to be a string.
pub type PushPayload = BTreeMap<String, String>;

/// Narrow a loosely typed push payload to string values only.
///
/// Returns `None` as soon as one value is not a JSON string.
pub fn string_payload(message: &Map<String, Value>) -> Option<PushPayload> {
    message
        .iter()
        .map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_owned())))
        .collect()
}
