//! # App Bridge Contract
//!
//! Trait contract between the discovery/identify core and the platform that
//! actually holds the Mantle App Bridge global.
//!
//! ## Overview
//!
//! The App Bridge itself is an object the embedding parent page injects into
//! the host global scope; this workspace never loads or implements it. What
//! this crate pins down is the seam between the two sides:
//!
//! - [`HostScope`](host::HostScope) - read-only view of the host's global
//!   slots (primary `mantle` instance, legacy `MantleAppBridge` slot, iframe
//!   probe). Implemented per platform (`bridge-web` for browsers, fakes for
//!   tests).
//! - [`AppBridge`](bridge::AppBridge) - the pass-through surface of a located
//!   bridge handle: readiness probe, identity/session getters, navigation and
//!   UI commands, authenticated fetch, event subscription.
//!
//! ## Error Handling
//!
//! Everything funnels into [`BridgeError`](error::BridgeError). Nothing in
//! this layer is fatal to the host page: every failure is a typed outcome a
//! consumer can render as UI state.
//!
//! ## Thread Safety
//!
//! Browser-provided objects are not thread-safe, so trait bounds are
//! conditional: native targets get the full `Send + Sync` bounds, `wasm32`
//! builds get none. See [`platform`].

pub mod bridge;
pub mod error;
pub mod host;
pub mod platform;
pub mod types;

pub use bridge::{AppBridge, EventHandler, EventSubscription};
pub use error::{BridgeError, Result};
pub use host::{BridgeFactory, HostScope, LegacySlot};
pub use types::{
    ConnectionStatus, FetchRequest, FetchResponse, HttpMethod, MantleOrganization, MantleUser,
    NewWindowOptions, SaveBarOptions, ToastStatus,
};
