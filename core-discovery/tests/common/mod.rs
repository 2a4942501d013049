//! Stateful fakes for exercising discovery without a browser: a bridge whose
//! handshake flag can flip mid-session, and a host scope whose slots can be
//! populated after polling has already started.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_api::{
    AppBridge, BridgeError, EventHandler, EventSubscription, FetchRequest, FetchResponse,
    HostScope, LegacySlot, MantleOrganization, MantleUser, NewWindowOptions, Result,
    SaveBarOptions, ToastStatus,
};

struct Handler {
    id: usize,
    event: String,
    callback: EventHandler,
}

#[derive(Default)]
struct BridgeState {
    initialized: Option<bool>,
    user: Option<MantleUser>,
    organization: Option<MantleOrganization>,
    session_token: Option<String>,
    upstream_error: Option<String>,
    fetch_response: Option<(u16, String)>,
    commands: Vec<String>,
    handlers: Vec<Handler>,
    next_handler_id: usize,
    ready_checks: usize,
    fetch_calls: usize,
}

/// In-memory bridge whose readiness and responses tests control directly.
#[derive(Clone)]
pub struct FakeBridge {
    state: Arc<Mutex<BridgeState>>,
}

impl std::fmt::Debug for FakeBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap();
        f.debug_struct("FakeBridge")
            .field("initialized", &state.initialized)
            .finish()
    }
}

impl FakeBridge {
    fn with_initialized(initialized: Option<bool>) -> Self {
        Self {
            state: Arc::new(Mutex::new(BridgeState {
                initialized,
                ..BridgeState::default()
            })),
        }
    }

    /// Handshake already complete.
    pub fn ready() -> Self {
        Self::with_initialized(Some(true))
    }

    /// Located but handshake pending.
    pub fn pending() -> Self {
        Self::with_initialized(Some(false))
    }

    /// Old bridge shape with no readiness attribute at all.
    pub fn without_readiness_attribute() -> Self {
        Self::with_initialized(None)
    }

    pub fn set_initialized(&self, initialized: bool) {
        self.state.lock().unwrap().initialized = Some(initialized);
    }

    pub fn set_user(&self, user: MantleUser) {
        self.state.lock().unwrap().user = Some(user);
    }

    pub fn set_organization(&self, organization: MantleOrganization) {
        self.state.lock().unwrap().organization = Some(organization);
    }

    pub fn set_session_token(&self, token: impl Into<String>) {
        self.state.lock().unwrap().session_token = Some(token.into());
    }

    /// Make every async getter and fetch reject with this message.
    pub fn set_upstream_error(&self, message: impl Into<String>) {
        self.state.lock().unwrap().upstream_error = Some(message.into());
    }

    pub fn set_fetch_response(&self, status: u16, body: impl Into<String>) {
        self.state.lock().unwrap().fetch_response = Some((status, body.into()));
    }

    /// Fire an event to all matching subscribed handlers.
    pub fn emit(&self, event: &str, payload: Option<serde_json::Value>) {
        let state = self.state.lock().unwrap();
        for handler in state.handlers.iter().filter(|h| h.event == event) {
            (handler.callback)(payload.clone());
        }
    }

    pub fn subscription_count(&self, event: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .handlers
            .iter()
            .filter(|h| h.event == event)
            .count()
    }

    /// How many times the readiness attribute was read.
    pub fn ready_checks(&self) -> usize {
        self.state.lock().unwrap().ready_checks
    }

    pub fn fetch_calls(&self) -> usize {
        self.state.lock().unwrap().fetch_calls
    }

    /// Fire-and-forget commands recorded in call order.
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().commands.clone()
    }

    fn record(&self, command: String) {
        self.state.lock().unwrap().commands.push(command);
    }

    fn upstream_error(&self) -> Option<String> {
        self.state.lock().unwrap().upstream_error.clone()
    }
}

#[async_trait]
impl AppBridge for FakeBridge {
    fn initialized(&self) -> Option<bool> {
        let mut state = self.state.lock().unwrap();
        state.ready_checks += 1;
        state.initialized
    }

    async fn get_user(&self) -> Result<MantleUser> {
        if let Some(message) = self.upstream_error() {
            return Err(BridgeError::UpstreamRejected(message));
        }
        self.state
            .lock()
            .unwrap()
            .user
            .clone()
            .ok_or_else(|| BridgeError::UpstreamRejected("no user configured".into()))
    }

    async fn get_organization(&self) -> Result<MantleOrganization> {
        if let Some(message) = self.upstream_error() {
            return Err(BridgeError::UpstreamRejected(message));
        }
        self.state
            .lock()
            .unwrap()
            .organization
            .clone()
            .ok_or_else(|| BridgeError::UpstreamRejected("no organization configured".into()))
    }

    async fn get_session_token(&self) -> Result<String> {
        if let Some(message) = self.upstream_error() {
            return Err(BridgeError::UpstreamRejected(message));
        }
        self.state
            .lock()
            .unwrap()
            .session_token
            .clone()
            .ok_or_else(|| BridgeError::UpstreamRejected("no session configured".into()))
    }

    fn redirect(&self, url: &str) {
        self.record(format!("redirect:{url}"));
    }

    fn set_path(&self, path: &str) {
        self.record(format!("set-path:{path}"));
    }

    fn open_in_new_tab(&self, url: &str) {
        self.record(format!("new-tab:{url}"));
    }

    fn open_in_new_window(&self, url: &str, _options: NewWindowOptions) {
        self.record(format!("new-window:{url}"));
    }

    fn show_toast(&self, message: &str, status: ToastStatus) {
        self.record(format!("toast:{}:{message}", status.as_str()));
    }

    fn show_modal(&self, id: &str) {
        self.record(format!("show-modal:{id}"));
    }

    fn hide_modal(&self, id: &str) {
        self.record(format!("hide-modal:{id}"));
    }

    fn show_save_bar(&self, _options: SaveBarOptions) {
        self.record("show-save-bar".into());
    }

    fn hide_save_bar(&self) {
        self.record("hide-save-bar".into());
    }

    async fn authenticated_fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        {
            let mut state = self.state.lock().unwrap();
            state.fetch_calls += 1;
            state.commands.push(format!("fetch:{}", request.url));
        }
        if let Some(message) = self.upstream_error() {
            return Err(BridgeError::UpstreamRejected(message));
        }
        let (status, body) = self
            .state
            .lock()
            .unwrap()
            .fetch_response
            .clone()
            .unwrap_or((200, "{}".to_string()));
        Ok(FetchResponse { status, body })
    }

    fn subscribe(&self, event: &str, handler: EventHandler) -> Result<EventSubscription> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_handler_id;
        state.next_handler_id += 1;
        state.handlers.push(Handler {
            id,
            event: event.to_string(),
            callback: handler,
        });

        let registry = self.state.clone();
        Ok(EventSubscription::new(Box::new(move || {
            registry.lock().unwrap().handlers.retain(|h| h.id != id);
        })))
    }
}

enum LegacyShape {
    Instance(FakeBridge),
    Constructs(FakeBridge),
    ConstructorThrows(String),
}

struct ScopeState {
    available: bool,
    in_iframe: bool,
    primary: Option<FakeBridge>,
    legacy: Option<LegacyShape>,
}

/// In-memory host scope; slots can be (re)populated while a supervisor polls.
#[derive(Clone)]
pub struct FakeScope {
    state: Arc<Mutex<ScopeState>>,
    probes: Arc<AtomicUsize>,
    constructions: Arc<AtomicUsize>,
}

impl FakeScope {
    fn new(state: ScopeState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            probes: Arc::new(AtomicUsize::new(0)),
            constructions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Browser context with neither global slot populated.
    pub fn absent() -> Self {
        Self::new(ScopeState {
            available: true,
            in_iframe: false,
            primary: None,
            legacy: None,
        })
    }

    /// No global scope at all (server-side evaluation context).
    pub fn headless() -> Self {
        Self::new(ScopeState {
            available: false,
            in_iframe: false,
            primary: None,
            legacy: None,
        })
    }

    pub fn with_primary(bridge: FakeBridge) -> Self {
        let scope = Self::absent();
        scope.install_primary(bridge);
        scope
    }

    pub fn with_legacy_instance(bridge: FakeBridge) -> Self {
        let scope = Self::absent();
        scope.state.lock().unwrap().legacy = Some(LegacyShape::Instance(bridge));
        scope
    }

    /// Legacy slot holds a constructor that yields `bridge` when invoked.
    pub fn with_constructor(bridge: FakeBridge) -> Self {
        let scope = Self::absent();
        scope.state.lock().unwrap().legacy = Some(LegacyShape::Constructs(bridge));
        scope
    }

    /// Legacy slot holds a constructor that throws.
    pub fn with_failing_constructor(message: impl Into<String>) -> Self {
        let scope = Self::absent();
        scope.state.lock().unwrap().legacy =
            Some(LegacyShape::ConstructorThrows(message.into()));
        scope
    }

    pub fn install_primary(&self, bridge: FakeBridge) {
        self.state.lock().unwrap().primary = Some(bridge);
    }

    pub fn clear_slots(&self) {
        let mut state = self.state.lock().unwrap();
        state.primary = None;
        state.legacy = None;
    }

    pub fn set_in_iframe(&self, in_iframe: bool) {
        self.state.lock().unwrap().in_iframe = in_iframe;
    }

    /// How many times the global slots were read.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    /// How many times the legacy constructor was actually invoked.
    pub fn construct_count(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }
}

impl HostScope for FakeScope {
    type Bridge = FakeBridge;

    fn available(&self) -> bool {
        self.state.lock().unwrap().available
    }

    fn primary_slot(&self) -> Option<FakeBridge> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().primary.clone()
    }

    fn legacy_slot(&self) -> Option<LegacySlot<FakeBridge>> {
        let state = self.state.lock().unwrap();
        match &state.legacy {
            Some(LegacyShape::Instance(bridge)) => Some(LegacySlot::Instance(bridge.clone())),
            Some(LegacyShape::Constructs(bridge)) => {
                let bridge = bridge.clone();
                let constructions = self.constructions.clone();
                Some(LegacySlot::Constructor(Box::new(move || {
                    constructions.fetch_add(1, Ordering::SeqCst);
                    Ok(bridge)
                })))
            }
            Some(LegacyShape::ConstructorThrows(message)) => {
                let message = message.clone();
                Some(LegacySlot::Constructor(Box::new(move || Err(message))))
            }
            None => None,
        }
    }

    fn in_iframe(&self) -> bool {
        self.state.lock().unwrap().in_iframe
    }
}

/// A user shaped like the parent's user response.
pub fn sample_user() -> MantleUser {
    MantleUser {
        id: "usr_1".into(),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        roles: vec!["admin".into()],
        allowed_features: vec!["billing".into()],
        is_super_user: None,
    }
}

/// An organization shaped like the parent's organization response.
pub fn sample_organization() -> MantleOrganization {
    MantleOrganization {
        id: "org_1".into(),
        name: "Acme".into(),
        customer_tags: vec!["beta".into()],
        contact_tags: vec![],
        created_at: Some("2024-01-01T00:00:00Z".into()),
        updated_at: None,
    }
}
