//! Process-level client registry.
//!
//! Mirrors the one-client-per-app usage pattern: the app configures the
//! client once at startup, and everything else calls [`identify_customer`]
//! without threading a client handle around. [`reset_client`] exists for
//! tests and re-initialization.

use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use tracing::warn;

use crate::client::{IdentifyOutcome, IdentifyParams, MantleClient, MantleConfig};

static CLIENT: Lazy<RwLock<Option<Arc<MantleClient>>>> = Lazy::new(|| RwLock::new(None));

/// Configure the shared client. Returns the installed client, or `None` when
/// the config is missing credentials (in which case nothing is installed and
/// any previous client is cleared).
pub fn init_client(config: MantleConfig) -> Option<Arc<MantleClient>> {
    let client = MantleClient::new(config).map(Arc::new);
    let mut slot = CLIENT.write().expect("client registry poisoned");
    slot.clone_from(&client);
    client
}

/// The currently configured client, if any.
pub fn client() -> Option<Arc<MantleClient>> {
    CLIENT.read().expect("client registry poisoned").clone()
}

pub fn is_initialized() -> bool {
    client().is_some()
}

/// Drop the shared client.
pub fn reset_client() {
    CLIENT.write().expect("client registry poisoned").take();
}

/// Identify a customer through the shared client.
///
/// When no client is configured this returns the normalized failure shape
/// synchronously - no network attempt is made.
pub async fn identify_customer(params: &IdentifyParams) -> IdentifyOutcome {
    match client() {
        Some(client) => client.identify(params).await,
        None => {
            warn!("identify_customer called before init_client");
            IdentifyOutcome::failed(
                "Mantle client not initialized - call init_client with your app credentials first",
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> IdentifyParams {
        IdentifyParams {
            platform: "shopify".into(),
            platform_id: "abc".into(),
            name: "Acme".into(),
            email: "owner@acme.example".into(),
            custom_fields: None,
        }
    }

    // One test drives the whole registry lifecycle: the registry is process
    // state, and parallel test threads must not interleave on it.
    #[tokio::test]
    async fn registry_lifecycle() {
        reset_client();
        assert!(!is_initialized());

        let outcome = identify_customer(&params()).await;
        assert!(!outcome.success);
        assert!(outcome.customer_api_token.is_none());
        assert!(outcome.error.unwrap().contains("not initialized"));

        // Missing credentials install nothing.
        assert!(init_client(MantleConfig::new("", "")).is_none());
        assert!(!is_initialized());

        assert!(init_client(MantleConfig::new("app", "key")).is_some());
        assert!(is_initialized());
        assert_eq!(client().unwrap().api_url(), crate::DEFAULT_API_URL);

        reset_client();
        assert!(!is_initialized());
    }
}
