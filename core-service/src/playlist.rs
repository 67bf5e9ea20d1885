//! # Playlist Screen Controller
//!
//! Combines three inputs into one observable [`PlaylistUiState`]:
//!
//! 1. `fetch_playlist(album)` seeds the album synchronously, then fetches the
//!    playlist and follows the album's favorite status in the background.
//! 2. `toggle_favorite(desired)` writes or removes the favorite row. It never
//!    touches the state itself; the favorite-status subscription reports the
//!    stored result. Writes are applied one at a time, in the order they
//!    were requested, so the last toggle always wins.
//!
//! Selecting another album cancels the previous selection's fetch and
//! subscription. Dropping the controller (or calling `close`) cancels all of
//! its work.

use core_catalog::{Album, AlbumId, FavoriteAlbumRepository, PlaylistRepository, Song};
use core_runtime::{BackgroundContext, TaskGroup};
use futures::StreamExt;
use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, warn};

use crate::state::StateHolder;

/// Everything the playlist screen renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaylistUiState {
    pub album: Album,
    pub is_favorite: bool,
    pub playlist: Vec<Song>,
}

/// A pending favorite write for one album
struct FavoriteWrite {
    album: Album,
    desired: bool,
}

pub struct PlaylistViewModel {
    favorites: FavoriteAlbumRepository,
    playlists: PlaylistRepository,
    state: StateHolder<PlaylistUiState>,
    tasks: TaskGroup,
    selection: Mutex<Option<TaskGroup>>,
    writes: mpsc::UnboundedSender<FavoriteWrite>,
}

impl PlaylistViewModel {
    pub fn new(
        favorites: FavoriteAlbumRepository,
        playlists: PlaylistRepository,
        context: BackgroundContext,
    ) -> Self {
        let tasks = TaskGroup::new(context);
        let (writes, queue) = mpsc::unbounded_channel();
        tasks.spawn(apply_favorite_writes(favorites.clone(), queue));

        Self {
            favorites,
            playlists,
            state: StateHolder::new(PlaylistUiState::default()),
            tasks,
            selection: Mutex::new(None),
            writes,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> PlaylistUiState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaylistUiState> {
        self.state.subscribe()
    }

    /// Show `album` and start loading its songs and favorite status.
    pub fn fetch_playlist(&self, album: Album) {
        let album_id = album.id;
        debug!(album_id = %album_id, "Album selected");

        let group = self.tasks.child();
        {
            let mut selection = self.selection.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = selection.take() {
                previous.cancel();
            }

            self.state.set(PlaylistUiState {
                album,
                ..PlaylistUiState::default()
            });

            self.spawn_playlist_fetch(&group, album_id);
            self.spawn_favorite_subscription(&group, album_id);
            *selection = Some(group);
        }
    }

    /// Mark the selected album as favorite (`true`) or remove it (`false`).
    pub fn toggle_favorite(&self, desired: bool) {
        let album = self.state.get().album;
        if album == Album::empty() {
            warn!("Favorite toggled before an album was selected");
            return;
        }

        if self.writes.send(FavoriteWrite { album, desired }).is_err() {
            warn!("Favorite toggled after the controller was closed");
        }
    }

    /// Cancel every task this controller started.
    pub fn close(&self) {
        self.tasks.cancel();
    }

    fn spawn_playlist_fetch(&self, group: &TaskGroup, album_id: AlbumId) {
        let playlists = self.playlists.clone();
        let state = self.state.clone();

        group.spawn(async move {
            match playlists.fetch_playlist(album_id).await {
                Ok(playlist) => {
                    state.update_if(|current| {
                        if current.album.id != album_id {
                            return false;
                        }
                        current.playlist = playlist.songs;
                        true
                    });
                }
                Err(err) => {
                    error!(album_id = %album_id, error = %err, "Playlist fetch failed");
                }
            }
        });
    }

    fn spawn_favorite_subscription(&self, group: &TaskGroup, album_id: AlbumId) {
        let mut status = self.favorites.is_favorite(album_id);
        let state = self.state.clone();

        group.spawn(async move {
            while let Some(item) = status.next().await {
                match item {
                    Ok(is_favorite) => {
                        state.update_if(|current| {
                            if current.album.id != album_id || current.is_favorite == is_favorite {
                                return false;
                            }
                            current.is_favorite = is_favorite;
                            true
                        });
                    }
                    Err(err) => {
                        error!(album_id = %album_id, error = %err, "Favorite status stream failed");
                        break;
                    }
                }
            }
        });
    }
}

/// Apply queued favorite writes strictly in arrival order.
async fn apply_favorite_writes(
    favorites: FavoriteAlbumRepository,
    mut queue: mpsc::UnboundedReceiver<FavoriteWrite>,
) {
    while let Some(FavoriteWrite { album, desired }) = queue.recv().await {
        let result = if desired {
            favorites.favorite(&album).await
        } else {
            favorites.unfavorite(&album).await
        };

        if let Err(err) = result {
            error!(album_id = %album.id, desired, error = %err, "Favorite update failed");
        }
    }
}
