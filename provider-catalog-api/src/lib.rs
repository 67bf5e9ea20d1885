//! # Catalog API Provider
//!
//! Implements `CatalogApi` over the catalog server's HTTP JSON API.
//!
//! ## Overview
//!
//! This module provides:
//! - `GET feed`: the home feed as an ordered list of sections
//! - `GET playlist/{id}`: one album's metadata and ordered songs
//!
//! Each call is a single request through the injected `HttpClient`. There is
//! no retry or backoff.

pub mod client;
pub mod error;

pub use client::HttpCatalogApi;
pub use error::{CatalogApiError, Result};
