//! One-shot availability and connection queries.

use bridge_api::{BridgeError, ConnectionStatus, HostScope, Result};

use crate::locator::{locate, Located};
use crate::readiness::is_ready;

/// Derive the consumer-facing connection view from the current host state.
///
/// `available` means a bridge object exists (constructing the legacy shape if
/// that is what the slot holds); `connected` additionally requires a
/// completed handshake.
pub fn connection_status<H: HostScope>(scope: &H) -> ConnectionStatus {
    let bridge = match locate(scope) {
        Ok(Located::Bridge(bridge)) => Some(bridge),
        Ok(Located::Absent) | Err(_) => None,
    };

    ConnectionStatus {
        available: bridge.is_some(),
        connected: bridge.as_ref().map(|b| is_ready(b)).unwrap_or(false),
        in_iframe: scope.in_iframe(),
    }
}

/// Whether any bridge object can currently be located.
pub fn is_available<H: HostScope>(scope: &H) -> bool {
    matches!(locate(scope), Ok(Located::Bridge(_)))
}

/// Fetch the bridge handle directly, without waiting.
///
/// Unlike the polling paths, calling this with no global scope available at
/// all is treated as a programming error: it fails loudly with
/// [`BridgeError::NoGlobalScope`], whose message tells the caller to guard
/// the access behind an availability check.
pub fn require_bridge<H: HostScope>(scope: &H) -> Result<H::Bridge> {
    if !scope.available() {
        return Err(BridgeError::NoGlobalScope);
    }
    match locate(scope)? {
        Located::Bridge(bridge) => Ok(bridge),
        Located::Absent => Err(BridgeError::NotFound),
    }
}
