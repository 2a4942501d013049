//! Polling/timeout supervisor driving discovery to a typed outcome.
//!
//! The supervisor owns the only mutable state in the protocol: which bridge
//! object (if any) has been located this session, and whether the discovery
//! attempt has resolved. The legacy constructor shape is invoked at most once
//! per session; after that, every cadence tick only re-checks readiness on
//! the same handle.
//!
//! Cancellation is drop-based: dropping the `await_ready` future stops the
//! cadence timer, the deadline accounting, and detaches the ready-event
//! subscription. Nothing observable happens after the drop.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use bridge_api::{AppBridge, BridgeError, EventSubscription, HostScope, Result};
use futures::channel::mpsc;
use futures::StreamExt;
use tracing::{debug, warn};

use crate::facade::BridgeFacade;
use crate::locator::{locate, Located};
use crate::readiness::is_ready;
use crate::time::{sleep, Duration, Instant};

/// Interval between readiness re-checks.
pub const DEFAULT_CADENCE: Duration = Duration::from_millis(100);

/// Deadline for one-shot waits ([`wait_for_bridge`]).
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

/// Deadline for mount-time discovery, where the parent page may still be
/// loading the bridge script itself.
pub const MOUNT_DEADLINE: Duration = Duration::from_secs(10);

/// Event the bridge fires once its parent handshake completes. Subscribed to
/// as a fast-path supplement; polling remains the fallback in case the event
/// never fires.
const READY_EVENT: &str = "ready";

/// Cadence and deadline for one discovery session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub cadence: Duration,
    pub deadline: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            cadence: DEFAULT_CADENCE,
            deadline: DEFAULT_DEADLINE,
        }
    }
}

impl PollConfig {
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            deadline,
            ..Self::default()
        }
    }
}

/// Supervisor lifecycle. `Checking` is entered synchronously on start;
/// `Polling` re-enters `Checking` on every cadence tick; `Ready`, `TimedOut`,
/// `Failed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SupervisorState {
    Idle = 0,
    Checking = 1,
    Polling = 2,
    Ready = 3,
    TimedOut = 4,
    Failed = 5,
    Cancelled = 6,
}

impl SupervisorState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SupervisorState::Ready
                | SupervisorState::TimedOut
                | SupervisorState::Failed
                | SupervisorState::Cancelled
        )
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => SupervisorState::Checking,
            2 => SupervisorState::Polling,
            3 => SupervisorState::Ready,
            4 => SupervisorState::TimedOut,
            5 => SupervisorState::Failed,
            6 => SupervisorState::Cancelled,
            _ => SupervisorState::Idle,
        }
    }
}

/// State is shared between the supervisor and its in-flight `await_ready`
/// future so teardown can record `Cancelled` even though the future never
/// returns.
#[derive(Debug)]
struct StateCell(AtomicU8);

impl StateCell {
    fn new(state: SupervisorState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    fn get(&self) -> SupervisorState {
        SupervisorState::from_u8(self.0.load(Ordering::SeqCst))
    }

    fn set(&self, state: SupervisorState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }
}

/// Marks the session `Cancelled` if `await_ready` is dropped before reaching
/// a terminal state.
struct CancelGuard {
    state: Arc<StateCell>,
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if !self.state.get().is_terminal() {
            self.state.set(SupervisorState::Cancelled);
        }
    }
}

/// Result of a discovery attempt.
///
/// `NotFound` and `NotReady` are the non-terminal reports of a single
/// [`check_now`](DiscoverySupervisor::check_now) probe; `await_ready` keeps
/// polling through both until the deadline.
pub enum DiscoveryOutcome<B> {
    /// A bridge was located and its handshake is complete.
    Found(BridgeFacade<B>),
    /// No global slot is populated.
    NotFound,
    /// A bridge is located but its handshake has not completed.
    NotReady,
    /// The deadline elapsed. `located` separates "script never loaded" from
    /// "handshake never completed".
    TimedOut { located: bool },
    /// The legacy constructor threw.
    InstantiationFailed(String),
}

impl<B> DiscoveryOutcome<B> {
    /// Stable name of the outcome kind, independent of any payload.
    pub fn kind(&self) -> &'static str {
        match self {
            DiscoveryOutcome::Found(_) => "found",
            DiscoveryOutcome::NotFound => "not-found",
            DiscoveryOutcome::NotReady => "not-ready",
            DiscoveryOutcome::TimedOut { .. } => "timed-out",
            DiscoveryOutcome::InstantiationFailed(_) => "instantiation-failed",
        }
    }
}

impl<B> std::fmt::Debug for DiscoveryOutcome<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryOutcome::TimedOut { located } => {
                f.debug_struct("TimedOut").field("located", located).finish()
            }
            DiscoveryOutcome::InstantiationFailed(reason) => {
                f.debug_tuple("InstantiationFailed").field(reason).finish()
            }
            other => f.write_str(other.kind()),
        }
    }
}

enum Probe<B> {
    Ready(B),
    Located,
    Absent,
    Fatal(String),
}

/// Drives repeated locate/readiness checks until success or deadline.
///
/// One supervisor covers one discovery session. Re-discovery after a timeout
/// is caller-initiated: call [`await_ready`](Self::await_ready) again.
pub struct DiscoverySupervisor<H: HostScope> {
    scope: H,
    config: PollConfig,
    state: Arc<StateCell>,
    located: Option<H::Bridge>,
    resolved: bool,
}

impl<H: HostScope> DiscoverySupervisor<H>
where
    H::Bridge: Clone,
{
    pub fn new(scope: H, config: PollConfig) -> Self {
        Self {
            scope,
            config,
            state: Arc::new(StateCell::new(SupervisorState::Idle)),
            located: None,
            resolved: false,
        }
    }

    /// Current lifecycle state of the most recent `await_ready` session.
    pub fn state(&self) -> SupervisorState {
        self.state.get()
    }

    /// One non-blocking probe: locate if nothing is located yet, then check
    /// readiness. Repeated calls with no host-side change report the same
    /// outcome kind.
    pub fn check_now(&mut self) -> DiscoveryOutcome<H::Bridge> {
        match self.probe() {
            Probe::Ready(bridge) => DiscoveryOutcome::Found(BridgeFacade::new(bridge)),
            Probe::Located => DiscoveryOutcome::NotReady,
            Probe::Absent => DiscoveryOutcome::NotFound,
            Probe::Fatal(reason) => DiscoveryOutcome::InstantiationFailed(reason),
        }
    }

    /// Wait until the bridge is ready, the deadline elapses, or instantiation
    /// fails.
    ///
    /// The first check runs synchronously before any timer is created, so a
    /// bridge that is already present and ready resolves with zero scheduled
    /// ticks. Dropping the returned future cancels the session: timers stop,
    /// the ready-event subscription detaches, and the state machine records
    /// `Cancelled`.
    pub async fn await_ready(&mut self) -> DiscoveryOutcome<H::Bridge> {
        self.resolved = false;
        // Each session re-reads the host slots from scratch; the cache only
        // spans ticks within one session (constructor runs at most once).
        self.located = None;
        let _cancel_guard = CancelGuard {
            state: self.state.clone(),
        };
        self.state.set(SupervisorState::Checking);

        match self.probe() {
            Probe::Ready(bridge) => return self.resolve_found(bridge),
            Probe::Fatal(reason) => return self.resolve_failed(reason),
            Probe::Located | Probe::Absent => {}
        }

        let started = Instant::now();
        // Keep the sender alive for the whole session so the receiver can
        // never report an empty closed channel.
        let (ready_tx, mut ready_rx) = mpsc::unbounded::<()>();
        let mut ready_sub = self.subscribe_ready(&ready_tx);

        loop {
            debug_assert!(!self.resolved, "supervisor polled after resolution");

            let elapsed = started.elapsed();
            if elapsed >= self.config.deadline {
                return self.resolve_timed_out();
            }

            self.state.set(SupervisorState::Polling);
            let wait = std::cmp::min(self.config.cadence, self.config.deadline - elapsed);
            {
                let tick = sleep(wait);
                futures::pin_mut!(tick);
                let _ = futures::future::select(tick, ready_rx.next()).await;
            }

            self.state.set(SupervisorState::Checking);
            match self.probe() {
                Probe::Ready(bridge) => return self.resolve_found(bridge),
                Probe::Fatal(reason) => return self.resolve_failed(reason),
                Probe::Located => {
                    if ready_sub.is_none() {
                        ready_sub = self.subscribe_ready(&ready_tx);
                    }
                }
                Probe::Absent => {}
            }
        }
    }

    fn probe(&mut self) -> Probe<H::Bridge> {
        if self.located.is_none() {
            match locate(&self.scope) {
                Ok(Located::Bridge(bridge)) => {
                    debug!("bridge located, awaiting handshake");
                    self.located = Some(bridge);
                }
                Ok(Located::Absent) => return Probe::Absent,
                Err(BridgeError::InstantiationFailed(reason)) => return Probe::Fatal(reason),
                Err(other) => return Probe::Fatal(other.to_string()),
            }
        }

        match self.located.as_ref() {
            Some(bridge) if is_ready(bridge) => Probe::Ready(bridge.clone()),
            Some(_) => Probe::Located,
            None => Probe::Absent,
        }
    }

    /// Fast-path supplement to polling: wake immediately when the bridge
    /// announces readiness. Detached automatically when the returned guard is
    /// dropped (resolution or cancellation).
    fn subscribe_ready(
        &self,
        ready_tx: &mpsc::UnboundedSender<()>,
    ) -> Option<EventSubscription> {
        let bridge = self.located.as_ref()?;
        let tx = ready_tx.clone();
        bridge
            .subscribe(
                READY_EVENT,
                Box::new(move |_| {
                    let _ = tx.unbounded_send(());
                }),
            )
            .ok()
    }

    fn resolve_found(&mut self, bridge: H::Bridge) -> DiscoveryOutcome<H::Bridge> {
        self.mark_resolved(SupervisorState::Ready);
        DiscoveryOutcome::Found(BridgeFacade::new(bridge))
    }

    fn resolve_failed(&mut self, reason: String) -> DiscoveryOutcome<H::Bridge> {
        warn!(%reason, "bridge constructor threw during discovery");
        self.mark_resolved(SupervisorState::Failed);
        DiscoveryOutcome::InstantiationFailed(reason)
    }

    fn resolve_timed_out(&mut self) -> DiscoveryOutcome<H::Bridge> {
        let located = self.located.is_some();
        warn!(
            located,
            deadline_ms = self.config.deadline.as_millis() as u64,
            "bridge discovery timed out"
        );
        self.mark_resolved(SupervisorState::TimedOut);
        DiscoveryOutcome::TimedOut { located }
    }

    fn mark_resolved(&mut self, state: SupervisorState) {
        debug_assert!(!self.resolved, "supervisor resolved twice");
        self.resolved = true;
        self.state.set(state);
    }
}

/// One-shot helper: discover the bridge with default cadence and the given
/// deadline, converting non-success outcomes into [`BridgeError`].
pub async fn wait_for_bridge<H>(scope: H, deadline: Duration) -> Result<BridgeFacade<H::Bridge>>
where
    H: HostScope,
    H::Bridge: Clone,
{
    let mut supervisor = DiscoverySupervisor::new(scope, PollConfig::with_deadline(deadline));
    match supervisor.await_ready().await {
        DiscoveryOutcome::Found(facade) => Ok(facade),
        DiscoveryOutcome::NotFound => Err(BridgeError::NotFound),
        DiscoveryOutcome::NotReady => Err(BridgeError::NotReady),
        DiscoveryOutcome::TimedOut { located } => Err(BridgeError::TimedOut { located }),
        DiscoveryOutcome::InstantiationFailed(reason) => {
            Err(BridgeError::InstantiationFailed(reason))
        }
    }
}
