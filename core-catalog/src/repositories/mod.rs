//! # Repositories
//!
//! Repositories sit between the screen controllers and the data sources.
//! Every call is dispatched onto the [`BackgroundContext`] so the caller's
//! thread never performs I/O.
//!
//! ## Available Repositories
//!
//! - `FavoriteAlbumRepository` - Favorite toggles and live favorite queries
//! - `PlaylistRepository` - Playlist fetch for one album
//! - `FeedRepository` - Home feed sections
//!
//! [`BackgroundContext`]: core_runtime::BackgroundContext

pub mod favorite_album;
pub mod feed;
pub mod playlist;

pub use favorite_album::FavoriteAlbumRepository;
pub use feed::FeedRepository;
pub use playlist::PlaylistRepository;
