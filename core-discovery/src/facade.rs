//! Ready-handle wrapper consumers call through after discovery.

use bridge_api::{
    AppBridge, BridgeError, EventHandler, EventSubscription, FetchRequest, FetchResponse,
    MantleOrganization, MantleUser, NewWindowOptions, Result, SaveBarOptions, ToastStatus,
};

use crate::readiness::is_ready;

/// Pass-through surface over a discovered bridge.
///
/// Only the discovery supervisor hands these out, and only for bridges whose
/// handshake was complete at resolution time, so holding a `BridgeFacade` is
/// itself evidence the bridge was ready. [`authenticated_fetch`] still
/// re-checks readiness at call time because host state can regress (the
/// parent may reload the bridge script); it fails fast with
/// [`BridgeError::NotReady`] rather than attempting a request.
///
/// [`authenticated_fetch`]: Self::authenticated_fetch
pub struct BridgeFacade<B> {
    inner: B,
}

impl<B: AppBridge> BridgeFacade<B> {
    pub(crate) fn new(inner: B) -> Self {
        Self { inner }
    }

    /// The underlying bridge handle.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Re-check the handshake flag on the live handle.
    pub fn is_ready(&self) -> bool {
        is_ready(&self.inner)
    }

    /// Current user, as the parent reports it. Upstream rejections pass
    /// through with their message intact.
    pub async fn get_user(&self) -> Result<MantleUser> {
        self.inner.get_user().await
    }

    /// Current organization, from the dedicated organization call.
    pub async fn get_organization(&self) -> Result<MantleOrganization> {
        self.inner.get_organization().await
    }

    /// Current session token (JWT string).
    pub async fn get_session_token(&self) -> Result<String> {
        self.inner.get_session_token().await
    }

    pub fn redirect(&self, url: &str) {
        self.inner.redirect(url)
    }

    pub fn set_path(&self, path: &str) {
        self.inner.set_path(path)
    }

    pub fn open_in_new_tab(&self, url: &str) {
        self.inner.open_in_new_tab(url)
    }

    pub fn open_in_new_window(&self, url: &str, options: NewWindowOptions) {
        self.inner.open_in_new_window(url, options)
    }

    pub fn show_toast(&self, message: &str, status: ToastStatus) {
        self.inner.show_toast(message, status)
    }

    /// Success-flavored toast.
    pub fn show_success(&self, message: &str) {
        self.inner.show_toast(message, ToastStatus::Success)
    }

    /// Error-flavored toast.
    pub fn show_error(&self, message: &str) {
        self.inner.show_toast(message, ToastStatus::Error)
    }

    pub fn show_modal(&self, id: &str) {
        self.inner.show_modal(id)
    }

    pub fn hide_modal(&self, id: &str) {
        self.inner.hide_modal(id)
    }

    pub fn show_save_bar(&self, options: SaveBarOptions) {
        self.inner.show_save_bar(options)
    }

    pub fn hide_save_bar(&self) {
        self.inner.hide_save_bar()
    }

    /// Fetch with the bridge's bearer token attached. Fails fast with
    /// [`BridgeError::NotReady`] when the handshake flag has regressed; no
    /// request is attempted in that case.
    pub async fn authenticated_fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        if !self.is_ready() {
            return Err(BridgeError::NotReady);
        }
        self.inner.authenticated_fetch(request).await
    }

    /// Subscribe to a bridge event by name.
    pub fn subscribe(&self, event: &str, handler: EventHandler) -> Result<EventSubscription> {
        self.inner.subscribe(event, handler)
    }
}

impl<B: std::fmt::Debug> std::fmt::Debug for BridgeFacade<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeFacade")
            .field("inner", &self.inner)
            .finish()
    }
}
