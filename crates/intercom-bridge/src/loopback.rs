// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory native side for desktop/CI builds and tests.
//
// `LoopbackChannel` records every outbound call and answers from scripted
// replies; `LoopbackEvents` broadcasts values to every live listener. Both
// play the role the iOS/Android SDK glue plays on a device.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::task::{Context, Poll, ready};

use async_trait::async_trait;
use futures::stream::{BoxStream, Stream, StreamExt};
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{debug, warn};

use intercom_core::config::BridgeConfig;
use intercom_core::error::{IntercomError, Result};
use intercom_core::types::MethodCall;

use crate::traits::{CallHandler, EventChannel, MethodChannel};

/// Build both loopback channels named after `config`.
pub fn loopback(config: &BridgeConfig) -> (Arc<LoopbackChannel>, Arc<LoopbackEvents>) {
    (
        Arc::new(LoopbackChannel::new(&config.method_channel)),
        Arc::new(LoopbackEvents::new(&config.event_channel, config.event_capacity)),
    )
}

// ---------------------------------------------------------------------------
// Method channel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Scripted {
    Reply(Value),
    Fail { code: String, message: String },
}

/// Scriptable command channel.
pub struct LoopbackChannel {
    name: String,
    calls: Mutex<Vec<MethodCall>>,
    script: Mutex<HashMap<String, Scripted>>,
    handler: RwLock<Option<Arc<dyn CallHandler>>>,
}

impl LoopbackChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(HashMap::new()),
            handler: RwLock::new(None),
        }
    }

    /// Answer every future call to `method` with `reply`.
    pub fn reply_with(&self, method: &str, reply: Value) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(method.to_owned(), Scripted::Reply(reply));
    }

    /// Fail every future call to `method` with a native error.
    pub fn fail_with(&self, method: &str, code: &str, message: &str) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                method.to_owned(),
                Scripted::Fail {
                    code: code.to_owned(),
                    message: message.to_owned(),
                },
            );
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Calls received for one method name.
    pub fn calls_to(&self, method: &str) -> Vec<MethodCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    pub fn last_call(&self) -> Option<MethodCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Play a native-originated call through the installed handler.
    pub fn deliver(&self, call: MethodCall) -> Result<Value> {
        let handler = self
            .handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| IntercomError::ChannelUnavailable(self.name.clone()))?;
        debug!(channel = %self.name, method = %call.method, "delivering inbound call");
        handler.handle_call(&call)
    }
}

#[async_trait]
impl MethodChannel for LoopbackChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, call: MethodCall) -> Result<Value> {
        let scripted = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&call.method)
            .cloned();
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);

        match scripted {
            None => Ok(Value::Null),
            Some(Scripted::Reply(value)) => Ok(value),
            Some(Scripted::Fail { code, message }) => Err(IntercomError::native(code, message)),
        }
    }

    fn set_call_handler(&self, handler: Arc<dyn CallHandler>) {
        *self.handler.write().unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }
}

// ---------------------------------------------------------------------------
// Event channel
// ---------------------------------------------------------------------------

/// Broadcast event channel; each `listen` is an independent receiver.
pub struct LoopbackEvents {
    name: String,
    tx: broadcast::Sender<Value>,
}

impl LoopbackEvents {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            name: name.into(),
            tx,
        }
    }

    /// Push an unread count to every live listener. Returns how many
    /// received it.
    pub fn emit_unread(&self, count: u32) -> usize {
        self.tx.send(Value::from(count)).unwrap_or(0)
    }

    /// Number of subscriptions that have not been dropped.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl EventChannel for LoopbackEvents {
    fn name(&self) -> &str {
        &self.name
    }

    fn listen(&self) -> Result<BoxStream<'static, Result<Value>>> {
        debug!(channel = %self.name, "event listener attached");
        Ok(Listener {
            inner: BroadcastStream::new(self.tx.subscribe()),
            channel: self.name.clone(),
        }
        .boxed())
    }
}

struct Listener {
    inner: BroadcastStream<Value>,
    channel: String,
}

impl Stream for Listener {
    type Item = Result<Value>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match ready!(self.inner.poll_next_unpin(cx)) {
                Some(Ok(value)) => return Poll::Ready(Some(Ok(value))),
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    warn!(channel = %self.channel, skipped, "slow listener skipped events");
                }
                None => return Poll::Ready(None),
            }
        }
    }
}
