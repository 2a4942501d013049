//! Read-only view of the host global scope.

use crate::bridge::AppBridge;
use crate::platform::PlatformSend;

/// One-shot factory for the legacy constructor shape. Errors carry the
/// message the constructor threw.
#[cfg(not(target_arch = "wasm32"))]
pub type BridgeFactory<B> = Box<dyn FnOnce() -> Result<B, String> + Send>;

#[cfg(target_arch = "wasm32")]
pub type BridgeFactory<B> = Box<dyn FnOnce() -> Result<B, String>>;

/// What the legacy global slot held, decided by a single capability probe at
/// discovery time rather than scattered type inspection.
pub enum LegacySlot<B> {
    /// The slot held a ready-made bridge instance.
    Instance(B),
    /// The slot held a zero-argument constructor that must be invoked exactly
    /// once to obtain an instance.
    Constructor(BridgeFactory<B>),
}

impl<B> std::fmt::Debug for LegacySlot<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LegacySlot::Instance(_) => f.write_str("LegacySlot::Instance"),
            LegacySlot::Constructor(_) => f.write_str("LegacySlot::Constructor"),
        }
    }
}

/// Platform seam over the host's well-known global slots.
///
/// Implementations must re-read the underlying slots on every call - no
/// caching of previously located handles, so a host-side reload of the bridge
/// script is picked up by the next discovery session.
pub trait HostScope: PlatformSend {
    type Bridge: AppBridge;

    /// Whether a global scope exists at all. `false` in server-side or other
    /// non-browser evaluation contexts; lookups must not panic there.
    fn available(&self) -> bool;

    /// The primary slot (`mantle`): the instance the bridge script installs.
    fn primary_slot(&self) -> Option<Self::Bridge>;

    /// The legacy slot (`MantleAppBridge`): an instance or a constructor.
    fn legacy_slot(&self) -> Option<LegacySlot<Self::Bridge>>;

    /// Whether the page is embedded in a frame. Implementations should treat
    /// a cross-origin access failure while probing as "embedded".
    fn in_iframe(&self) -> bool;
}
