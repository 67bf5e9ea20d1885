//! Favorite album repository

use crate::error::Result;
use crate::models::{Album, AlbumId};
use crate::store::FavoriteAlbumStore;
use core_runtime::BackgroundContext;
use futures::stream::BoxStream;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Favorite toggles and live favorite queries, run on the background context.
#[derive(Clone)]
pub struct FavoriteAlbumRepository {
    store: Arc<dyn FavoriteAlbumStore>,
    context: BackgroundContext,
}

impl FavoriteAlbumRepository {
    pub fn new(store: Arc<dyn FavoriteAlbumStore>, context: BackgroundContext) -> Self {
        Self { store, context }
    }

    /// Current favorite status of `id`, re-emitted whenever it changes.
    ///
    /// A storage failure is yielded once and ends the stream.
    pub fn is_favorite(&self, id: AlbumId) -> BoxStream<'static, Result<bool>> {
        self.context.forward(self.store.observe_exists(id))
    }

    /// Every favorite ordered by album id, re-emitted whenever the set changes.
    pub fn all_favorites(&self) -> BoxStream<'static, Result<Vec<Album>>> {
        self.context.forward(self.store.observe_all())
    }

    /// Durably mark `album` as favorite. Replaces a previously stored payload.
    #[instrument(skip(self, album), fields(album_id = %album.id))]
    pub async fn favorite(&self, album: &Album) -> Result<()> {
        let store = Arc::clone(&self.store);
        let album = album.clone();
        self.context
            .run(async move { store.insert(&album).await })
            .await?
    }

    /// Durably remove `album` from favorites. Removing a non-favorite is a no-op.
    #[instrument(skip(self, album), fields(album_id = %album.id))]
    pub async fn unfavorite(&self, album: &Album) -> Result<()> {
        let store = Arc::clone(&self.store);
        let album = album.clone();
        let removed = self
            .context
            .run(async move { store.delete(&album).await })
            .await??;

        if !removed {
            debug!("Album was not a favorite");
        }
        Ok(())
    }
}
