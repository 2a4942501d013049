//! Vendor identify client.
//!
//! Wraps the single outbound Mantle API call this layer makes: identifying a
//! customer to obtain a customer API token. Every outcome - success, API
//! rejection, transport failure, even "the client was never configured" - is
//! normalized into one [`IdentifyOutcome`] shape so consumers render it as
//! state instead of catching errors.

pub mod client;
pub mod registry;

pub use client::{IdentifyOutcome, IdentifyParams, MantleClient, MantleConfig, DEFAULT_API_URL};
pub use registry::{client, identify_customer, init_client, is_initialized, reset_client};
