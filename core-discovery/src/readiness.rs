//! Readiness detection: has the bridge finished its parent handshake?

use bridge_api::AppBridge;

/// True only when the handle reports a completed handshake with its embedding
/// parent - mere existence of the object is not readiness.
///
/// Older bridge revisions expose no readiness attribute at all; those are
/// treated as ready upon existence. This is a compatibility fallback, not an
/// error.
pub fn is_ready<B: AppBridge + ?Sized>(bridge: &B) -> bool {
    bridge.initialized().unwrap_or(true)
}
