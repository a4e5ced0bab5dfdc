// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic transport traits.
//
// The facade never talks to a native SDK directly. It issues named calls on a
// `MethodChannel` and listens on an `EventChannel`; the host wires those to
// whatever carries messages to the native side (FFI glue, a platform message
// loop, or the in-memory loopback used by tests).

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

use intercom_core::error::Result;
use intercom_core::types::{InboundMessage, MethodCall};

/// Command/response channel to the native counterpart.
#[async_trait]
pub trait MethodChannel: Send + Sync {
    /// Channel identifier, e.g. `maido.io/intercom`.
    fn name(&self) -> &str;

    /// Send one call and await its single reply.
    ///
    /// `Value::Null` means the native side answered with no result. Native
    /// failures come back as `IntercomError::Native`.
    async fn invoke(&self, call: MethodCall) -> Result<Value>;

    /// Install the handler for calls originating on the native side.
    /// Replaces any previously installed handler.
    fn set_call_handler(&self, handler: Arc<dyn CallHandler>);
}

/// Push-only channel carrying values from the native side.
pub trait EventChannel: Send + Sync {
    /// Channel identifier, e.g. `maido.io/intercom/unread`.
    fn name(&self) -> &str;

    /// Start a new native listener. Dropping the stream cancels it.
    fn listen(&self) -> Result<BoxStream<'static, Result<Value>>>;
}

/// Receives native-to-application calls from a [`MethodChannel`].
pub trait CallHandler: Send + Sync {
    fn handle_call(&self, call: &MethodCall) -> Result<Value>;
}

/// Application observer for inbound notifications.
pub trait MessageHandler: Send + Sync {
    fn on_message(&self, message: &InboundMessage);
}

impl<F> MessageHandler for F
where
    F: Fn(&InboundMessage) + Send + Sync,
{
    fn on_message(&self, message: &InboundMessage) {
        self(message)
    }
}
