// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the Intercom bridge.

use serde_json::Value;
use thiserror::Error;

/// Top-level error type for all bridge operations.
#[derive(Debug, Error)]
pub enum IntercomError {
    // -- Caller errors (raised before any native round trip) --
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "no iOS device token has been captured yet; either the native layer has not \
         delivered one (call again after push registration completes) or push \
         notifications are not set up for this app"
    )]
    DeviceTokenUnavailable,

    // -- Protocol errors --
    #[error("inbound method `{0}` is not supported")]
    UnsupportedMethod(String),

    #[error("unexpected reply from native side: {0}")]
    Decode(String),

    // -- Native side --
    #[error("native call failed [{code}]{}", message_suffix(.message))]
    Native {
        code: String,
        message: Option<String>,
        details: Option<Value>,
    },

    #[error("channel `{0}` has no native counterpart attached")]
    ChannelUnavailable(String),

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntercomError {
    /// Native failure with a code and message, no details.
    pub fn native(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Native {
            code: code.into(),
            message: Some(message.into()),
            details: None,
        }
    }

    /// Whether the caller passed arguments that were rejected before any
    /// native round trip.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Whether the call was issued before state it depends on existed
    /// (currently only the captured iOS device token).
    pub fn is_missing_precondition(&self) -> bool {
        matches!(self, Self::DeviceTokenUnavailable)
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, IntercomError>;
