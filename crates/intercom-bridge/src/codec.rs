// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reply decoding for typed queries.
//
// `null` is the only value that takes a soft default; any other unexpected
// shape is a decode failure.

use serde_json::Value;

use intercom_core::error::{IntercomError, Result};

/// Decode a count reply, `null` as zero.
pub fn count_or_zero(reply: Value) -> Result<u32> {
    match reply {
        Value::Null => Ok(0),
        other => count(&other),
    }
}

/// Decode a non-null count, as carried by the unread event channel.
pub fn count(value: &Value) -> Result<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| IntercomError::Decode(format!("expected a count, got {value}")))
}

/// Decode a boolean reply, `null` as false.
pub fn flag_or_false(reply: Value) -> Result<bool> {
    match reply {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        other => Err(IntercomError::Decode(format!(
            "expected a boolean, got {other}"
        ))),
    }
}
