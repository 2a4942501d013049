//! The pass-through surface of a located bridge handle.

use async_trait::async_trait;

use crate::error::Result;
use crate::platform::PlatformSendSync;
use crate::types::{
    FetchRequest, FetchResponse, MantleOrganization, MantleUser, NewWindowOptions, SaveBarOptions,
    ToastStatus,
};

/// Callback invoked when a subscribed bridge event fires. The payload is
/// whatever the parent attached to the event, if anything.
#[cfg(not(target_arch = "wasm32"))]
pub type EventHandler = Box<dyn Fn(Option<serde_json::Value>) + Send + Sync>;

#[cfg(target_arch = "wasm32")]
pub type EventHandler = Box<dyn Fn(Option<serde_json::Value>)>;

#[cfg(not(target_arch = "wasm32"))]
type UnsubscribeFn = Box<dyn FnOnce() + Send>;

#[cfg(target_arch = "wasm32")]
type UnsubscribeFn = Box<dyn FnOnce()>;

/// Guard for an event subscription. Dropping it (or calling
/// [`unsubscribe`](Self::unsubscribe)) detaches the handler; the handler never
/// fires again afterwards.
pub struct EventSubscription {
    detach: Option<UnsubscribeFn>,
}

impl EventSubscription {
    pub fn new(detach: UnsubscribeFn) -> Self {
        Self {
            detach: Some(detach),
        }
    }

    /// Detach the handler now instead of at drop time.
    pub fn unsubscribe(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSubscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}

/// A handle to the host-provided Mantle App Bridge object.
///
/// The handle is borrowed from host state: this layer never constructs or
/// destroys the underlying object (the one-time legacy-constructor call during
/// discovery aside) and treats it as read-only. Handles are cheap reference
/// clones, not deep copies.
///
/// Async getters must surface the underlying bridge's rejection unchanged
/// (message intact, as [`BridgeError::UpstreamRejected`]) rather than
/// swallowing it.
///
/// [`BridgeError::UpstreamRejected`]: crate::error::BridgeError::UpstreamRejected
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AppBridge: PlatformSendSync {
    /// The bridge's handshake flag. `None` means this bridge revision exposes
    /// no readiness attribute at all; readiness detection treats that as
    /// "ready upon existence" for compatibility with older bridge shapes.
    fn initialized(&self) -> Option<bool>;

    /// Fetch the current user from the parent. The bridge may cache this.
    async fn get_user(&self) -> Result<MantleUser>;

    /// Fetch the current organization from the parent. The bridge may cache
    /// this.
    async fn get_organization(&self) -> Result<MantleOrganization>;

    /// Fetch the current session token (a JWT string) from the parent.
    async fn get_session_token(&self) -> Result<String>;

    /// Navigate the top frame to `url`.
    fn redirect(&self, url: &str);

    /// Change the in-app path without a full navigation.
    fn set_path(&self, path: &str);

    /// Open `url` in a new tab.
    fn open_in_new_tab(&self, url: &str);

    /// Open `url` in a new window.
    fn open_in_new_window(&self, url: &str, options: NewWindowOptions);

    /// Show a toast notification. Fire-and-forget.
    fn show_toast(&self, message: &str, status: ToastStatus);

    /// Show the modal with the given id. Fire-and-forget.
    fn show_modal(&self, id: &str);

    /// Hide the modal with the given id. Fire-and-forget.
    fn hide_modal(&self, id: &str);

    /// Show the save bar. Fire-and-forget.
    fn show_save_bar(&self, options: SaveBarOptions);

    /// Hide the save bar. Fire-and-forget.
    fn hide_save_bar(&self);

    /// Perform a fetch with the bridge's bearer token attached.
    async fn authenticated_fetch(&self, request: FetchRequest) -> Result<FetchResponse>;

    /// Subscribe to a bridge event by name. The returned guard detaches the
    /// handler on drop.
    fn subscribe(&self, event: &str, handler: EventHandler) -> Result<EventSubscription>;
}
