//! Error taxonomy for bridge discovery and facade calls.

use thiserror::Error;

/// Errors surfaced by discovery and by facade operations.
///
/// Every variant is recoverable from the host page's point of view: callers
/// are expected to render these as loading/error UI state and, where it makes
/// sense, retry discovery themselves.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// No global slot is populated; the bridge script was never loaded.
    #[error("Mantle App Bridge not found: no global slot is populated")]
    NotFound,

    /// The legacy slot held a constructor and invoking it failed.
    #[error("failed to instantiate Mantle App Bridge: {0}")]
    InstantiationFailed(String),

    /// The discovery deadline elapsed. `located` distinguishes "bridge script
    /// missing" from "parent handshake never completed" - two different
    /// operator diagnoses.
    #[error("timed out waiting for Mantle App Bridge: {}", timed_out_detail(*.located))]
    TimedOut {
        /// Whether a bridge object was located before the deadline.
        located: bool,
    },

    /// A facade operation was attempted on a bridge whose handshake with the
    /// embedding parent has not completed.
    #[error("Mantle App Bridge is not ready: parent handshake incomplete")]
    NotReady,

    /// The underlying bridge or vendor client rejected the call. The original
    /// message is preserved verbatim so callers can distinguish "not
    /// available" from "available but the request failed".
    #[error("{0}")]
    UpstreamRejected(String),

    /// No global scope exists at all (server-side evaluation context). This
    /// is a programming error, not an environment condition, so the message
    /// tells the caller how to fix it.
    #[error(
        "Mantle App Bridge cannot be used here: no global scope is available. \
         Guard this call behind an availability check and only touch the \
         bridge from a browser context"
    )]
    NoGlobalScope,
}

fn timed_out_detail(located: bool) -> &'static str {
    if located {
        "bridge located but the parent handshake never completed"
    } else {
        "the bridge script was never loaded by the parent page"
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_out_messages_stay_distinguishable() {
        let never_located = BridgeError::TimedOut { located: false }.to_string();
        let never_ready = BridgeError::TimedOut { located: true }.to_string();

        assert!(never_located.contains("never loaded"));
        assert!(never_ready.contains("handshake never completed"));
        assert_ne!(never_located, never_ready);
    }

    #[test]
    fn upstream_rejection_preserves_message() {
        let err = BridgeError::UpstreamRejected("session request denied by parent".into());
        assert_eq!(err.to_string(), "session request denied by parent");
    }

    #[test]
    fn no_global_scope_points_at_the_fix() {
        let msg = BridgeError::NoGlobalScope.to_string();
        assert!(msg.contains("availability check"));
    }
}
