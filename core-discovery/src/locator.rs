//! Global locator: find the bridge under its well-known global names.

use bridge_api::{BridgeError, HostScope, LegacySlot, Result};
use tracing::debug;

/// Result of a single lookup of the host's global slots.
pub enum Located<B> {
    /// A bridge object was found (or constructed from the legacy slot).
    Bridge(B),
    /// Neither slot is populated, or no global scope exists at all.
    Absent,
}

impl<B> Located<B> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Located::Absent)
    }
}

impl<B> std::fmt::Debug for Located<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Located::Bridge(_) => f.write_str("Located::Bridge"),
            Located::Absent => f.write_str("Located::Absent"),
        }
    }
}

/// Look up the bridge: primary slot first, then the legacy slot.
///
/// The legacy slot may hold a ready-made instance or a zero-argument
/// constructor; a constructor is invoked exactly once, and a throwing
/// constructor yields [`BridgeError::InstantiationFailed`] rather than a
/// panic. Outside a browser-like environment this always returns
/// [`Located::Absent`].
///
/// No located handle is cached anywhere: every call re-reads the host slots,
/// so a host-side reload of the bridge script can never leave a stale handle
/// behind.
pub fn locate<H: HostScope>(scope: &H) -> Result<Located<H::Bridge>> {
    if !scope.available() {
        return Ok(Located::Absent);
    }

    if let Some(bridge) = scope.primary_slot() {
        return Ok(Located::Bridge(bridge));
    }

    match scope.legacy_slot() {
        Some(LegacySlot::Instance(bridge)) => Ok(Located::Bridge(bridge)),
        Some(LegacySlot::Constructor(construct)) => {
            debug!("legacy slot holds a constructor, instantiating");
            construct()
                .map(Located::Bridge)
                .map_err(BridgeError::InstantiationFailed)
        }
        None => Ok(Located::Absent),
    }
}
