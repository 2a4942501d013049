//! Bridge discovery and readiness protocol.
//!
//! The Mantle App Bridge is injected by the embedding parent page, which
//! races against this layer's startup: the bridge object may not exist yet
//! when a consumer mounts, and once it exists it still has to finish its own
//! handshake with the parent before it can serve requests. This crate owns
//! that temporal edge:
//!
//! - [`locator`]: find the bridge under its primary or legacy global name,
//!   instantiating the legacy constructor shape exactly once.
//! - [`readiness`]: decide whether a located bridge has completed its parent
//!   handshake (existence alone is not enough).
//! - [`supervisor`]: drive repeated checks on a fixed cadence until ready or
//!   deadline, with an event-driven fast path and drop-based cancellation.
//! - [`facade`]: the ready-handle wrapper consumers call through once
//!   discovery succeeds.
//! - [`status`]: one-shot availability/connection queries.
//!
//! The protocol is expressed as an explicit state machine independent of any
//! UI framework, so it is testable with nothing but a fake host scope and a
//! paused clock.

pub mod facade;
pub mod locator;
pub mod readiness;
pub mod status;
pub mod supervisor;
pub mod time;

pub use facade::BridgeFacade;
pub use locator::{locate, Located};
pub use readiness::is_ready;
pub use status::{connection_status, is_available, require_bridge};
pub use supervisor::{
    wait_for_bridge, DiscoveryOutcome, DiscoverySupervisor, PollConfig, SupervisorState,
    DEFAULT_CADENCE, DEFAULT_DEADLINE, MOUNT_DEADLINE,
};
