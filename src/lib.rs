//! Workspace umbrella crate.
//!
//! Hosts depend on `spotify-core-workspace` and enable features here instead
//! of wiring each workspace crate individually. With the default
//! `desktop-shims` feature the `core-service` façade (and the reqwest-backed
//! HTTP client it injects) is re-exported.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;
