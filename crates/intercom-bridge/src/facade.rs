// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The Intercom facade — one async method per native SDK capability.
//
// Every forwarding method packs its arguments into a flat JSON object (all
// keys present, unset optionals as null), issues one call on the method
// channel and awaits the single reply. Nothing is retried or cached apart
// from the message handler and the iOS device token.

use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use intercom_core::config::IntercomConfig;
use intercom_core::error::{IntercomError, Result};
use intercom_core::types::{
    IdentifiedUser, MethodCall, UserAttributes, Visibility, string_payload,
};

use crate::codec;
use crate::inbound::{InboundDispatcher, LogMessageHandler, SharedState};
use crate::traits::{EventChannel, MessageHandler, MethodChannel};
use crate::unread::UnreadStream;

/// Shared handle to the native Intercom SDK.
///
/// Construct once at startup and clone freely; clones share the registered
/// handler and the cached device token.
#[derive(Clone)]
pub struct IntercomBridge {
    channel: Arc<dyn MethodChannel>,
    events: Arc<dyn EventChannel>,
    state: Arc<SharedState>,
}

impl IntercomBridge {
    pub fn new(channel: Arc<dyn MethodChannel>, events: Arc<dyn EventChannel>) -> Self {
        Self {
            channel,
            events,
            state: Arc::new(SharedState::default()),
        }
    }

    // -- Bootstrap -----------------------------------------------------------

    /// Install the inbound handler and bootstrap the native SDK.
    ///
    /// With no handler, debug builds log inbound messages and release builds
    /// drop them. Calling this again replaces the handler.
    pub async fn initialize(
        &self,
        config: &IntercomConfig,
        on_message: Option<Arc<dyn MessageHandler>>,
    ) -> Result<()> {
        let handler = on_message.or_else(|| {
            cfg!(debug_assertions).then(|| Arc::new(LogMessageHandler) as Arc<dyn MessageHandler>)
        });
        self.state.set_handler(handler);
        self.channel
            .set_call_handler(Arc::new(InboundDispatcher::new(Arc::clone(&self.state))));

        self.send(
            "initialize",
            json!({
                "appId": config.app_id,
                "androidApiKey": config.android_api_key,
                "iosApiKey": config.ios_api_key,
            }),
        )
        .await
    }

    /// Load an [`IntercomConfig`] from a JSON file and initialise with it.
    pub async fn initialize_from_file(
        &self,
        path: &Path,
        on_message: Option<Arc<dyn MessageHandler>>,
    ) -> Result<()> {
        let config = IntercomConfig::load(path)?;
        self.initialize(&config, on_message).await
    }

    /// Apply a native-originated call directly, bypassing the channel.
    pub fn handle_inbound(&self, call: &MethodCall) -> Result<()> {
        InboundDispatcher::new(Arc::clone(&self.state)).dispatch(call)
    }

    // -- Unread counts -------------------------------------------------------

    /// Open a new subscription to unread conversation counts.
    pub fn unread_stream(&self) -> Result<UnreadStream> {
        debug!(channel = self.events.name(), "subscribing to unread counts");
        Ok(UnreadStream::new(self.events.listen()?))
    }

    /// Current unread conversation count; no reply counts as zero.
    pub async fn unread_conversation_count(&self) -> Result<u32> {
        let reply = self.call("unreadConversationCount", Value::Null).await?;
        codec::count_or_zero(reply)
    }

    // -- Layout & visibility -------------------------------------------------

    pub async fn set_bottom_padding(&self, padding: i32) -> Result<()> {
        self.send("setBottomPadding", json!({ "bottomPadding": padding }))
            .await
    }

    pub async fn set_launcher_visibility(&self, visibility: Visibility) -> Result<()> {
        self.send(
            "setLauncherVisibility",
            json!({ "visibility": visibility.as_wire() }),
        )
        .await
    }

    pub async fn set_in_app_messages_visibility(&self, visibility: Visibility) -> Result<()> {
        self.send(
            "setInAppMessagesVisibility",
            json!({ "visibility": visibility.as_wire() }),
        )
        .await
    }

    // -- Identity ------------------------------------------------------------

    /// Identity-verification HMAC for the current user.
    pub async fn set_user_hash(&self, user_hash: &str) -> Result<()> {
        self.send("setUserHash", json!({ "userHash": user_hash }))
            .await
    }

    /// Register a known user by user id or email, never both.
    pub async fn register_identified_user(&self, user: &IdentifiedUser) -> Result<()> {
        let registration = user.registration()?;
        let mut args = Map::new();
        args.insert(
            registration.key().to_owned(),
            Value::from(registration.value()),
        );
        self.send(registration.method(), Value::Object(args)).await
    }

    pub async fn register_unidentified_user(&self) -> Result<()> {
        self.send("registerUnidentifiedUser", Value::Null).await
    }

    /// Forward all nine profile fields; unset ones go across as null.
    pub async fn update_user(&self, attributes: &UserAttributes) -> Result<()> {
        self.send("updateUser", serde_json::to_value(attributes)?)
            .await
    }

    /// Clear the native identity. The cached device token is kept.
    pub async fn logout(&self) -> Result<()> {
        self.send("logout", Value::Null).await
    }

    // -- Messenger UI --------------------------------------------------------

    pub async fn display_messenger(&self) -> Result<()> {
        self.send("displayMessenger", Value::Null).await
    }

    pub async fn hide_messenger(&self) -> Result<()> {
        self.send("hideMessenger", Value::Null).await
    }

    pub async fn display_help_center(&self) -> Result<()> {
        self.send("displayHelpCenter", Value::Null).await
    }

    pub async fn display_message_composer(&self, message: &str) -> Result<()> {
        self.send("displayMessageComposer", json!({ "message": message }))
            .await
    }

    pub async fn display_article(&self, article_id: &str) -> Result<()> {
        self.send("displayArticle", json!({ "articleId": article_id }))
            .await
    }

    pub async fn display_carousel(&self, carousel_id: &str) -> Result<()> {
        self.send("displayCarousel", json!({ "carouselId": carousel_id }))
            .await
    }

    // -- Events --------------------------------------------------------------

    pub async fn log_event(&self, name: &str, meta_data: Option<&Map<String, Value>>) -> Result<()> {
        self.send("logEvent", json!({ "name": name, "metaData": meta_data }))
            .await
    }

    // -- Push ----------------------------------------------------------------

    /// Register a push token with the native SDK. The token must not be empty.
    pub async fn send_token_to_intercom(&self, token: &str) -> Result<()> {
        if token.is_empty() {
            return Err(IntercomError::InvalidArgument(
                "push token must not be empty".into(),
            ));
        }
        self.send("sendTokenToIntercom", json!({ "token": token }))
            .await
    }

    /// Forward the captured iOS device token, as `send_token_to_intercom` would.
    pub async fn register_ios_token_to_intercom(&self) -> Result<()> {
        let token = self
            .state
            .device_token()
            .ok_or(IntercomError::DeviceTokenUnavailable)?;
        self.send_token_to_intercom(&token).await
    }

    /// Last device token delivered by the native side, if any.
    pub fn ios_token(&self) -> Option<String> {
        self.state.device_token()
    }

    /// Let the native side process the push payload it has queued.
    pub async fn handle_push_message(&self) -> Result<()> {
        self.send("handlePushMessage", Value::Null).await
    }

    /// Whether a push payload belongs to Intercom.
    ///
    /// A payload with non-string values is answered `false` locally.
    pub async fn is_intercom_push(&self, message: &Map<String, Value>) -> Result<bool> {
        let Some(payload) = string_payload(message) else {
            debug!("push payload has non-string values, not an Intercom push");
            return Ok(false);
        };
        let reply = self
            .call("isIntercomPush", json!({ "message": payload }))
            .await?;
        codec::flag_or_false(reply)
    }

    /// Hand a push payload to the native SDK. All values must be strings.
    pub async fn handle_push(&self, message: &Map<String, Value>) -> Result<()> {
        let payload = string_payload(message).ok_or_else(|| {
            IntercomError::InvalidArgument("push payload values must all be strings".into())
        })?;
        self.send("handlePush", json!({ "message": payload }))
            .await
    }

    /// Ask iOS for notification permission.
    ///
    /// A denial is sticky on the platform side; later calls will not prompt
    /// again until the user changes it in system settings.
    pub async fn request_ios_notification_permissions(&self) -> Result<bool> {
        let reply = self
            .call("requestNotificationPermissions", Value::Null)
            .await?;
        codec::flag_or_false(reply)
    }

    // -- Transport -----------------------------------------------------------

    async fn call(&self, method: &str, arguments: Value) -> Result<Value> {
        let call = MethodCall::new(method, arguments);
        let id = call.id;
        debug!(channel = self.channel.name(), %id, method, "invoking native method");
        self.channel.invoke(call).await.inspect_err(|e| {
            warn!(%id, method, error = %e, "native call failed");
        })
    }

    async fn send(&self, method: &str, arguments: Value) -> Result<()> {
        self.call(method, arguments).await.map(|_| ())
    }
}

impl std::fmt::Debug for IntercomBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntercomBridge")
            .field("channel", &self.channel.name())
            .field("events", &self.events.name())
            .field("handler_registered", &self.state.has_handler())
            .field("token_cached", &self.state.device_token().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loopback::{LoopbackChannel, LoopbackEvents, loopback};
    use futures::StreamExt;
    use intercom_core::config::BridgeConfig;
    use intercom_core::types::InboundMessage;
    use std::sync::Mutex;

    fn bridge() -> (IntercomBridge, Arc<LoopbackChannel>, Arc<LoopbackEvents>) {
        let (channel, events) = loopback(&BridgeConfig::default());
        let bridge = IntercomBridge::new(channel.clone(), events.clone());
        (bridge, channel, events)
    }

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    // -- initialize / inbound ------------------------------------------------

    #[tokio::test]
    async fn initialize_forwards_all_keys() {
        let (bridge, channel, _) = bridge();
        let config = IntercomConfig::new("app").with_android_api_key("android_sdk-1");
        bridge.initialize(&config, None).await.unwrap();

        let call = channel.last_call().unwrap();
        assert_eq!(call.method, "initialize");
        assert_eq!(
            call.arguments,
            json!({"appId": "app", "androidApiKey": "android_sdk-1", "iosApiKey": null})
        );
    }

    #[tokio::test]
    async fn initialize_propagates_native_failure() {
        let (bridge, channel, _) = bridge();
        channel.fail_with("initialize", "INVALID_APP_ID", "app id is empty");
        let err = bridge
            .initialize(&IntercomConfig::new(""), None)
            .await
            .unwrap_err();
        assert!(matches!(err, IntercomError::Native { code, .. } if code == "INVALID_APP_ID"));
    }

    #[tokio::test]
    async fn initialize_from_file_reads_config() {
        let (bridge, channel, _) = bridge();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intercom.json");
        IntercomConfig::new("from-file").persist(&path).unwrap();

        bridge.initialize_from_file(&path, None).await.unwrap();
        assert_eq!(channel.last_call().unwrap().arguments["appId"], json!("from-file"));
    }

    #[tokio::test]
    async fn device_token_round_trip_through_channel() {
        let (bridge, channel, _) = bridge();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler: Arc<dyn MessageHandler> = Arc::new(move |m: &InboundMessage| {
            sink.lock().unwrap().push(m.to_value());
        });
        bridge
            .initialize(&IntercomConfig::new("app"), Some(handler))
            .await
            .unwrap();

        channel
            .deliver(MethodCall::new("iosDeviceToken", json!("T1")))
            .unwrap();

        assert_eq!(bridge.ios_token().as_deref(), Some("T1"));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![json!({"method": "iosDeviceToken", "token": "T1"})]
        );
    }

    #[tokio::test]
    async fn unknown_inbound_method_fails_and_keeps_token() {
        let (bridge, channel, _) = bridge();
        bridge
            .initialize(&IntercomConfig::new("app"), None)
            .await
            .unwrap();
        channel
            .deliver(MethodCall::new("iosDeviceToken", json!("T1")))
            .unwrap();

        let err = channel
            .deliver(MethodCall::new("unknownMethod", json!("T2")))
            .unwrap_err();
        assert!(matches!(err, IntercomError::UnsupportedMethod(_)));
        assert_eq!(bridge.ios_token().as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn reinitialize_replaces_handler() {
        let (bridge, _, _) = bridge();
        let first = Arc::new(Mutex::new(0));
        let second = Arc::new(Mutex::new(0));
        let (f, s) = (Arc::clone(&first), Arc::clone(&second));
        let config = IntercomConfig::new("app");

        bridge
            .initialize(&config, Some(Arc::new(move |_: &InboundMessage| *f.lock().unwrap() += 1)))
            .await
            .unwrap();
        bridge
            .initialize(&config, Some(Arc::new(move |_: &InboundMessage| *s.lock().unwrap() += 1)))
            .await
            .unwrap();

        bridge
            .handle_inbound(&MethodCall::new("iosDeviceToken", json!("T")))
            .unwrap();
        assert_eq!(*first.lock().unwrap(), 0);
        assert_eq!(*second.lock().unwrap(), 1);
    }

    #[cfg(debug_assertions)]
    #[tokio::test]
    async fn debug_build_installs_log_handler_when_none_given() {
        let (bridge, _, _) = bridge();
        bridge
            .initialize(&IntercomConfig::new("app"), None)
            .await
            .unwrap();
        assert!(format!("{bridge:?}").contains("handler_registered: true"));
    }

    #[cfg(not(debug_assertions))]
    #[tokio::test]
    async fn release_build_leaves_handler_empty_when_none_given() {
        let (bridge, _, _) = bridge();
        bridge
            .initialize(&IntercomConfig::new("app"), None)
            .await
            .unwrap();
        assert!(format!("{bridge:?}").contains("handler_registered: false"));
    }

    #[cfg(not(debug_assertions))]
    #[tokio::test]
    async fn release_reinitialize_without_handler_clears_previous() {
        let (bridge, _, _) = bridge();
        let config = IntercomConfig::new("app");
        bridge
            .initialize(&config, Some(Arc::new(|_: &InboundMessage| {})))
            .await
            .unwrap();
        assert!(format!("{bridge:?}").contains("handler_registered: true"));

        bridge.initialize(&config, None).await.unwrap();
        assert!(format!("{bridge:?}").contains("handler_registered: false"));
    }

    #[tokio::test]
    async fn ios_token_is_stable_without_new_notifications() {
        let (bridge, _, _) = bridge();
        assert_eq!(bridge.ios_token(), None);
        assert_eq!(bridge.ios_token(), None);
        bridge
            .handle_inbound(&MethodCall::new("iosDeviceToken", json!("T1")))
            .unwrap();
        assert_eq!(bridge.ios_token(), bridge.ios_token());
    }

    // -- Identity ------------------------------------------------------------

    #[tokio::test]
    async fn register_with_user_id_uses_user_id_entry_point() {
        let (bridge, channel, _) = bridge();
        bridge
            .register_identified_user(&IdentifiedUser::with_user_id("u-1"))
            .await
            .unwrap();
        let call = channel.last_call().unwrap();
        assert_eq!(call.method, "registerIdentifiedUserWithUserId");
        assert_eq!(call.arguments, json!({"userId": "u-1"}));
    }

    #[tokio::test]
    async fn register_with_email_uses_email_entry_point() {
        let (bridge, channel, _) = bridge();
        bridge
            .register_identified_user(&IdentifiedUser::with_email("a@b.c"))
            .await
            .unwrap();
        let call = channel.last_call().unwrap();
        assert_eq!(call.method, "registerIdentifiedUserWithEmail");
        assert_eq!(call.arguments, json!({"email": "a@b.c"}));
    }

    #[tokio::test]
    async fn register_rejects_both_or_neither_without_dispatch() {
        let (bridge, channel, _) = bridge();
        let both = IdentifiedUser {
            user_id: Some("u".into()),
            email: Some("e@x".into()),
        };
        assert!(bridge.register_identified_user(&both).await.is_err());
        assert!(
            bridge
                .register_identified_user(&IdentifiedUser::default())
                .await
                .is_err()
        );
        assert!(channel.calls().is_empty());
    }

    #[tokio::test]
    async fn update_user_sends_nine_keys() {
        let (bridge, channel, _) = bridge();
        let attrs = UserAttributes {
            name: Some("Ada".into()),
            ..Default::default()
        };
        bridge.update_user(&attrs).await.unwrap();

        let call = channel.last_call().unwrap();
        assert_eq!(call.method, "updateUser");
        let args = call.arguments.as_object().unwrap();
        assert_eq!(args.len(), 9);
        assert_eq!(args.values().filter(|v| v.is_null()).count(), 8);
    }

    #[tokio::test]
    async fn logout_keeps_cached_token() {
        let (bridge, channel, _) = bridge();
        bridge
            .handle_inbound(&MethodCall::new("iosDeviceToken", json!("T1")))
            .unwrap();
        bridge.logout().await.unwrap();
        assert_eq!(channel.last_call().unwrap().method, "logout");
        assert_eq!(bridge.ios_token().as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn user_hash_and_padding_forwarded() {
        let (bridge, channel, _) = bridge();
        bridge.set_user_hash("abc").await.unwrap();
        bridge.set_bottom_padding(24).await.unwrap();
        let calls = channel.calls();
        assert_eq!(calls[0].arguments, json!({"userHash": "abc"}));
        assert_eq!(calls[1].arguments, json!({"bottomPadding": 24}));
    }

    // -- UI ------------------------------------------------------------------

    #[tokio::test]
    async fn visibility_maps_to_wire_literals() {
        let (bridge, channel, _) = bridge();
        bridge
            .set_launcher_visibility(Visibility::Visible)
            .await
            .unwrap();
        bridge
            .set_in_app_messages_visibility(Visibility::Gone)
            .await
            .unwrap();

        let calls = channel.calls();
        assert_eq!(calls[0].method, "setLauncherVisibility");
        assert_eq!(calls[0].arguments, json!({"visibility": "VISIBLE"}));
        assert_eq!(calls[1].method, "setInAppMessagesVisibility");
        assert_eq!(calls[1].arguments, json!({"visibility": "GONE"}));
    }

    #[tokio::test]
    async fn messenger_surfaces_are_bare_calls() {
        let (bridge, channel, _) = bridge();
        bridge.display_messenger().await.unwrap();
        bridge.hide_messenger().await.unwrap();
        bridge.display_help_center().await.unwrap();
        bridge.handle_push_message().await.unwrap();
        bridge.register_unidentified_user().await.unwrap();

        let methods: Vec<_> = channel.calls().into_iter().map(|c| c.method).collect();
        assert_eq!(
            methods,
            [
                "displayMessenger",
                "hideMessenger",
                "displayHelpCenter",
                "handlePushMessage",
                "registerUnidentifiedUser",
            ]
        );
        assert!(channel.calls().iter().all(|c| c.arguments.is_null()));
    }

    #[tokio::test]
    async fn content_identifiers_forwarded() {
        let (bridge, channel, _) = bridge();
        bridge.display_message_composer("Hello").await.unwrap();
        bridge.display_article("123").await.unwrap();
        bridge.display_carousel("456").await.unwrap();

        let calls = channel.calls();
        assert_eq!(calls[0].arguments, json!({"message": "Hello"}));
        assert_eq!(calls[1].arguments, json!({"articleId": "123"}));
        assert_eq!(calls[2].arguments, json!({"carouselId": "456"}));
    }

    #[tokio::test]
    async fn log_event_with_and_without_metadata() {
        let (bridge, channel, _) = bridge();
        bridge.log_event("opened", None).await.unwrap();
        let meta = payload(json!({"plan": "pro", "seats": 3}));
        bridge.log_event("upgraded", Some(&meta)).await.unwrap();

        let calls = channel.calls_to("logEvent");
        assert_eq!(calls[0].arguments, json!({"name": "opened", "metaData": null}));
        assert_eq!(
            calls[1].arguments,
            json!({"name": "upgraded", "metaData": {"plan": "pro", "seats": 3}})
        );
    }

    // -- Queries -------------------------------------------------------------

    #[tokio::test]
    async fn unread_count_defaults_to_zero() {
        let (bridge, channel, _) = bridge();
        assert_eq!(bridge.unread_conversation_count().await.unwrap(), 0);
        channel.reply_with("unreadConversationCount", json!(7));
        assert_eq!(bridge.unread_conversation_count().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn unread_count_of_wrong_type_is_decode_error() {
        let (bridge, channel, _) = bridge();
        channel.reply_with("unreadConversationCount", json!("seven"));
        assert!(matches!(
            bridge.unread_conversation_count().await,
            Err(IntercomError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn notification_permission_defaults_to_false() {
        let (bridge, channel, _) = bridge();
        assert!(!bridge.request_ios_notification_permissions().await.unwrap());
        channel.reply_with("requestNotificationPermissions", json!(true));
        assert!(bridge.request_ios_notification_permissions().await.unwrap());
    }

    // -- Push ----------------------------------------------------------------

    #[tokio::test]
    async fn non_string_payload_is_not_intercom_push_and_not_sent() {
        let (bridge, channel, _) = bridge();
        let message = payload(json!({"intercom_push_type": "notification", "badge": 1}));
        assert!(!bridge.is_intercom_push(&message).await.unwrap());
        assert!(channel.calls().is_empty());
    }

    #[tokio::test]
    async fn non_string_payload_fails_handle_push_without_dispatch() {
        let (bridge, channel, _) = bridge();
        let message = payload(json!({"body": "hi", "nested": {"a": "b"}}));
        let err = bridge.handle_push(&message).await.unwrap_err();
        assert!(err.is_caller_error());
        assert!(channel.calls().is_empty());
    }

    #[tokio::test]
    async fn string_payload_is_forwarded() {
        let (bridge, channel, _) = bridge();
        let message = payload(json!({"intercom_push_type": "notification"}));

        assert!(!bridge.is_intercom_push(&message).await.unwrap());
        channel.reply_with("isIntercomPush", json!(true));
        assert!(bridge.is_intercom_push(&message).await.unwrap());
        bridge.handle_push(&message).await.unwrap();

        let pushed = channel.calls_to("handlePush");
        assert_eq!(
            pushed[0].arguments,
            json!({"message": {"intercom_push_type": "notification"}})
        );
        assert_eq!(channel.calls_to("isIntercomPush").len(), 2);
    }

    #[tokio::test]
    async fn empty_token_is_rejected_locally() {
        let (bridge, channel, _) = bridge();
        let err = bridge.send_token_to_intercom("").await.unwrap_err();
        assert!(matches!(err, IntercomError::InvalidArgument(_)));
        assert!(channel.calls().is_empty());
    }

    #[tokio::test]
    async fn ios_token_registration_requires_captured_token() {
        let (bridge, channel, _) = bridge();
        let err = bridge.register_ios_token_to_intercom().await.unwrap_err();
        assert!(matches!(err, IntercomError::DeviceTokenUnavailable));
        assert!(err.is_missing_precondition());
        assert!(channel.calls().is_empty());

        bridge
            .handle_inbound(&MethodCall::new("iosDeviceToken", json!("T1")))
            .unwrap();
        bridge.register_ios_token_to_intercom().await.unwrap();
        bridge.send_token_to_intercom("T1").await.unwrap();

        let sent = channel.calls_to("sendTokenToIntercom");
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].arguments, sent[1].arguments);
        assert_eq!(sent[0].arguments, json!({"token": "T1"}));
    }

    // -- Unread stream -------------------------------------------------------

    #[tokio::test]
    async fn cancelling_one_subscription_leaves_the_other() {
        let (bridge, _, events) = bridge();
        let mut first = bridge.unread_stream().unwrap();
        let second = bridge.unread_stream().unwrap();
        assert_eq!(events.listener_count(), 2);

        events.emit_unread(1);
        assert_eq!(first.next().await.unwrap().unwrap(), 1);

        drop(second);
        assert_eq!(events.listener_count(), 1);

        events.emit_unread(2);
        events.emit_unread(3);
        assert_eq!(first.next().await.unwrap().unwrap(), 2);
        assert_eq!(first.next().await.unwrap().unwrap(), 3);
    }

    #[tokio::test]
    async fn new_subscription_sees_no_replay() {
        let (bridge, _, events) = bridge();
        let _early = bridge.unread_stream().unwrap();
        events.emit_unread(4);

        let mut late = bridge.unread_stream().unwrap();
        events.emit_unread(5);
        assert_eq!(late.next().await.unwrap().unwrap(), 5);
    }

    #[tokio::test]
    async fn debug_view_hides_token() {
        let (bridge, _, _) = bridge();
        bridge
            .handle_inbound(&MethodCall::new("iosDeviceToken", json!("secret-token")))
            .unwrap();
        let view = format!("{bridge:?}");
        assert!(view.contains("token_cached: true"));
        assert!(!view.contains("secret-token"));
    }
}
