// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native-to-application call dispatch.
//
// One method is recognised: the device-token notification. Anything else is
// a protocol violation and fails the dispatch without touching state.

use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use tracing::{debug, info, warn};

use intercom_core::error::{IntercomError, Result};
use intercom_core::types::{DEVICE_TOKEN_METHOD, InboundMessage, MethodCall};

use crate::traits::{CallHandler, MessageHandler};

/// The two process-wide slots: registered handler and cached device token.
#[derive(Default)]
pub(crate) struct SharedState {
    handler: RwLock<Option<Arc<dyn MessageHandler>>>,
    device_token: RwLock<Option<String>>,
}

impl SharedState {
    pub(crate) fn set_handler(&self, handler: Option<Arc<dyn MessageHandler>>) {
        *self.handler.write().unwrap_or_else(PoisonError::into_inner) = handler;
    }

    pub(crate) fn has_handler(&self) -> bool {
        self.handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub(crate) fn device_token(&self) -> Option<String> {
        self.device_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store_token(&self, token: &str) {
        *self
            .device_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
    }

    fn handler(&self) -> Option<Arc<dyn MessageHandler>> {
        self.handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Parse an inbound call into a typed message.
pub fn parse_inbound(call: &MethodCall) -> Result<InboundMessage> {
    match call.method.as_str() {
        DEVICE_TOKEN_METHOD => match &call.arguments {
            Value::String(token) => Ok(InboundMessage::DeviceToken {
                token: token.clone(),
            }),
            other => Err(IntercomError::Decode(format!(
                "{DEVICE_TOKEN_METHOD} expects a string token, got {other}"
            ))),
        },
        other => Err(IntercomError::UnsupportedMethod(other.to_owned())),
    }
}

/// Applies inbound messages to the shared state and re-emits them.
pub(crate) struct InboundDispatcher {
    state: Arc<SharedState>,
}

impl InboundDispatcher {
    pub(crate) fn new(state: Arc<SharedState>) -> Self {
        Self { state }
    }

    pub(crate) fn dispatch(&self, call: &MethodCall) -> Result<()> {
        let message = parse_inbound(call).inspect_err(|e| {
            warn!(method = %call.method, error = %e, "rejected inbound call");
        })?;

        match &message {
            InboundMessage::DeviceToken { token } => {
                self.state.store_token(token);
                info!(len = token.len(), "captured iOS device token");
            }
        }

        // Clone out of the lock so the handler may call back into the bridge.
        if let Some(handler) = self.state.handler() {
            handler.on_message(&message);
        }
        Ok(())
    }
}

impl CallHandler for InboundDispatcher {
    fn handle_call(&self, call: &MethodCall) -> Result<Value> {
        self.dispatch(call).map(|()| Value::Null)
    }
}

/// Fallback handler for debug builds when the application supplied none.
pub struct LogMessageHandler;

impl MessageHandler for LogMessageHandler {
    fn on_message(&self, message: &InboundMessage) {
        debug!(method = message.method(), "inbound Intercom message (no handler registered)");
    }
}
