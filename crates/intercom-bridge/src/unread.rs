// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unread conversation count subscription.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{BoxStream, Stream, StreamExt};
use serde_json::Value;

use intercom_core::error::Result;

use crate::codec;

/// One live subscription to the unread-count event channel.
///
/// Yields every count the native side pushes after the subscription was
/// opened. Dropping it cancels the native listener; other subscriptions are
/// unaffected.
pub struct UnreadStream {
    inner: BoxStream<'static, Result<u32>>,
}

impl UnreadStream {
    pub(crate) fn new(events: BoxStream<'static, Result<Value>>) -> Self {
        let inner = events
            .map(|event| event.and_then(|value| codec::count(&value)))
            .boxed();
        Self { inner }
    }
}

impl Stream for UnreadStream {
    type Item = Result<u32>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for UnreadStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnreadStream").finish_non_exhaustive()
    }
}
