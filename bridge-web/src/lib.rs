//! Browser implementation of the bridge contract.
//!
//! Binds the `bridge-api` traits to the real host globals through `js-sys`
//! and `web-sys`: [`WebHostScope`] reads the `window.mantle` /
//! `window.MantleAppBridge` slots, and [`WebAppBridge`] forwards trait calls
//! to the underlying JavaScript object, preserving rejection messages.
//!
//! This crate is designed exclusively for the `wasm32-unknown-unknown`
//! target; native builds get an empty crate.

#![cfg(target_arch = "wasm32")]

mod error;
pub mod bridge;
pub mod scope;

pub use bridge::WebAppBridge;
pub use scope::WebHostScope;
