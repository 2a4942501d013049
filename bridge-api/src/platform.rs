//! Conditional trait bounds shared by every bridge trait.
//!
//! Native targets hand bridge objects across async tasks, so the traits need
//! `Send + Sync` there. On `wasm32` everything runs on the single browser
//! thread and the underlying `js-sys` handles cannot satisfy those bounds, so
//! the markers collapse to no-ops. One trait definition, both targets.

/// `Send + Sync` on native targets, unconstrained on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T> PlatformSendSync for T where T: Send + Sync {}

#[cfg(target_arch = "wasm32")]
pub trait PlatformSendSync {}

#[cfg(target_arch = "wasm32")]
impl<T> PlatformSendSync for T {}

/// `Send` on native targets, unconstrained on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformSend: Send {}

#[cfg(not(target_arch = "wasm32"))]
impl<T> PlatformSend for T where T: Send {}

#[cfg(target_arch = "wasm32")]
pub trait PlatformSend {}

#[cfg(target_arch = "wasm32")]
impl<T> PlatformSend for T {}
