// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge and SDK bootstrap configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IntercomError, Result};

/// Default name of the command/response channel.
pub const DEFAULT_METHOD_CHANNEL: &str = "maido.io/intercom";
/// Default name of the unread-count event channel.
pub const DEFAULT_EVENT_CHANNEL: &str = "maido.io/intercom/unread";

/// One-time SDK bootstrap parameters passed to `initialize`.
///
/// The native SDK keeps these after bootstrap; the bridge does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntercomConfig {
    /// Intercom workspace (app) identifier.
    pub app_id: String,
    #[serde(default)]
    pub android_api_key: Option<String>,
    #[serde(default)]
    pub ios_api_key: Option<String>,
}

impl IntercomConfig {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            android_api_key: None,
            ios_api_key: None,
        }
    }

    pub fn with_android_api_key(mut self, key: impl Into<String>) -> Self {
        self.android_api_key = Some(key.into());
        self
    }

    pub fn with_ios_api_key(mut self, key: impl Into<String>) -> Self {
        self.ios_api_key = Some(key.into());
        self
    }

    /// Read a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| {
            IntercomError::Config(format!("{}: {e}", path.display()))
        })
    }

    /// Write the configuration as pretty JSON.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Transport-level settings: channel names and event buffering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Name of the command/response channel.
    pub method_channel: String,
    /// Name of the unread-count event channel.
    pub event_channel: String,
    /// Broadcast buffer per event channel. Slow subscribers skip older values.
    pub event_capacity: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            method_channel: DEFAULT_METHOD_CHANNEL.into(),
            event_channel: DEFAULT_EVENT_CHANNEL.into(),
            event_capacity: 16,
        }
    }
}
