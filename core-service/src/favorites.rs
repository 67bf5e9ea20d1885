//! Favorites screen controller
//!
//! Follows every favorite album from construction until the controller is
//! dropped.

use core_catalog::{Album, FavoriteAlbumRepository};
use core_runtime::{BackgroundContext, TaskGroup};
use futures::StreamExt;
use serde::Serialize;
use tokio::sync::watch;
use tracing::error;

use crate::state::StateHolder;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FavoritesUiState {
    /// Ordered by album id
    pub albums: Vec<Album>,
}

pub struct FavoritesViewModel {
    state: StateHolder<FavoritesUiState>,
    tasks: TaskGroup,
}

impl FavoritesViewModel {
    pub fn new(favorites: &FavoriteAlbumRepository, context: BackgroundContext) -> Self {
        let state = StateHolder::new(FavoritesUiState::default());
        let tasks = TaskGroup::new(context);

        let mut albums = favorites.all_favorites();
        let writer = state.clone();
        tasks.spawn(async move {
            while let Some(item) = albums.next().await {
                match item {
                    Ok(albums) => writer.set(FavoritesUiState { albums }),
                    Err(err) => {
                        error!(error = %err, "Favorites stream failed");
                        break;
                    }
                }
            }
        });

        Self { state, tasks }
    }

    pub fn state(&self) -> FavoritesUiState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<FavoritesUiState> {
        self.state.subscribe()
    }

    pub fn close(&self) {
        self.tasks.cancel();
    }
}
