//! # Host Bridge Traits
//!
//! Platform abstraction traits that each host (Android, iOS, desktop) must
//! satisfy for the catalog core.
//!
//! ## Overview
//!
//! The core never talks to the network or to the host logger directly. It
//! goes through the traits in this crate so the mobile shell can inject its
//! own transport (OkHttp/URLSession bridges) while desktop builds use the
//! reqwest-backed adapter from `bridge-desktop`.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP request execution
//! - [`CatalogApi`](catalog::CatalogApi) - Catalog server client (home feed, playlists)
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Platform
//! implementations convert their native errors into it and keep the message
//! actionable (URL, status code, underlying cause).
//!
//! ## Thread Safety
//!
//! Every bridge trait requires `Send + Sync`: the core shares the handles
//! across the background runtime's worker threads.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         todo!()
//!     }
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod http;
pub mod logging;

pub use catalog::{CatalogApi, RemoteAlbum, RemotePlaylist, RemoteSection, RemoteSong};
pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
