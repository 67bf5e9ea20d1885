//! # Catalog Data Module
//!
//! Owns the local favorites database and the repositories the screen
//! controllers read from.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite connection pool, schema migrations and health check
//! - The `favorite_album` store with live (self-refreshing) queries
//! - Repositories that dispatch catalog fetches and store calls onto the
//!   background context
//! - Domain models converted from the catalog server's wire shapes

pub mod db;
pub mod error;
pub mod live;
pub mod models;
pub mod repositories;
pub mod store;

pub use error::{CatalogError, Result};
pub use models::{Album, AlbumId, Playlist, Section, Song};
pub use repositories::{FavoriteAlbumRepository, FeedRepository, PlaylistRepository};
pub use store::{FavoriteAlbumStore, SqliteFavoriteAlbumStore};
