//! Playlist repository

use crate::error::Result;
use crate::models::{AlbumId, Playlist};
use bridge_traits::CatalogApi;
use core_runtime::BackgroundContext;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Fetches an album's playlist on the background context.
#[derive(Clone)]
pub struct PlaylistRepository {
    api: Arc<dyn CatalogApi>,
    context: BackgroundContext,
}

impl PlaylistRepository {
    pub fn new(api: Arc<dyn CatalogApi>, context: BackgroundContext) -> Self {
        Self { api, context }
    }

    /// One request, no retry. Transport, status and decoding failures are
    /// returned as [`CatalogError::Bridge`](crate::CatalogError::Bridge).
    #[instrument(skip(self))]
    pub async fn fetch_playlist(&self, album_id: AlbumId) -> Result<Playlist> {
        let api = Arc::clone(&self.api);
        let remote = self
            .context
            .run(async move { api.playlist(album_id.0).await })
            .await??;

        let playlist = Playlist::from_remote(album_id, remote);
        debug!(songs = playlist.songs.len(), "Playlist fetched");
        Ok(playlist)
    }
}
