// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intercom bridge — core types, configuration and error definitions shared
// across all crates.

pub mod config;
pub mod error;
pub mod types;
pub mod verification;

pub use config::{BridgeConfig, IntercomConfig};
pub use error::IntercomError;
pub use types::*;
