// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Identity verification — HMAC-SHA256 user hashes for `set_user_hash`.
//
// Intercom signs the user id (or email) with the workspace's identity
// verification secret. The secret belongs on a server; these helpers exist
// for that server side and for tests, the bridge never calls them.

use ring::hmac;

use crate::error::{IntercomError, Result};

/// Compute the user hash for `identifier` and return it as lowercase hex.
pub fn user_hash(secret: &[u8], identifier: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret);
    let tag = hmac::sign(&key, identifier.as_bytes());
    hex::encode(tag.as_ref())
}

/// Check a hex user hash against `identifier` in constant time.
pub fn verify_user_hash(secret: &[u8], identifier: &str, hash_hex: &str) -> Result<()> {
    let tag = hex::decode(hash_hex)
        .map_err(|e| IntercomError::InvalidArgument(format!("user hash is not hex: {e}")))?;
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret);
    hmac::verify(&key, identifier.as_bytes(), &tag)
        .map_err(|_| IntercomError::InvalidArgument("user hash does not match".into()))
}
