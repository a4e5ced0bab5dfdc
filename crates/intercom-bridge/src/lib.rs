// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intercom bridge — async facade over the native Intercom SDKs.
//
// The facade talks to the native side only through the `MethodChannel` and
// `EventChannel` traits. On a device the host wires these to its platform
// message loop; on desktop/CI the `loopback` module stands in.

pub mod codec;
pub mod facade;
pub mod inbound;
pub mod loopback;
pub mod traits;
pub mod unread;

pub use facade::IntercomBridge;
pub use inbound::{LogMessageHandler, parse_inbound};
pub use loopback::{LoopbackChannel, LoopbackEvents, loopback};
pub use traits::{CallHandler, EventChannel, MessageHandler, MethodChannel};
pub use unread::UnreadStream;
