//! Core service façade and bootstrap helpers.
//!
//! [`CoreService::bootstrap`] builds every process-wide dependency exactly
//! once (catalog HTTP client, favorites database pool, background context,
//! repositories) and hands them explicitly to the screen controllers it
//! creates. Desktop apps typically enable the `desktop-shims` feature so the
//! reqwest-backed `HttpClient` is injected when the config carries none;
//! mobile hosts pass their own transport through `CoreConfig`.
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use core_service::CoreService;
//!
//! let core = CoreService::bootstrap(CoreConfig::builder().build()?).await?;
//! let playlist = core.playlist_view_model();
//! playlist.fetch_playlist(album);
//! let mut state = playlist.subscribe();
//! ```

pub mod error;
pub mod favorites;
pub mod home;
pub mod playlist;
pub mod state;

pub use error::{CoreError, Result};
pub use favorites::{FavoritesUiState, FavoritesViewModel};
pub use home::{HomeUiState, HomeViewModel};
pub use playlist::{PlaylistUiState, PlaylistViewModel};
pub use state::StateHolder;

pub use core_catalog::{Album, AlbumId, Playlist, Section, Song};
pub use core_runtime::config::CoreConfig;

use std::sync::Arc;

use bridge_traits::CatalogApi;
use core_catalog::db::{create_pool, DatabaseConfig};
use core_catalog::{
    FavoriteAlbumRepository, FavoriteAlbumStore, FeedRepository, PlaylistRepository,
    SqliteFavoriteAlbumStore,
};
use core_runtime::logging::{init_logging, strip_path};
use core_runtime::BackgroundContext;
use provider_catalog_api::HttpCatalogApi;
use sqlx::SqlitePool;
use tracing::{debug, info};

struct CoreInner {
    config: CoreConfig,
    context: BackgroundContext,
    pool: SqlitePool,
    favorites: FavoriteAlbumRepository,
    playlists: PlaylistRepository,
    feed: FeedRepository,
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    inner: Arc<CoreInner>,
}

impl CoreService {
    /// Build the core against the catalog server named in `config`.
    ///
    /// Must be called from within a Tokio runtime; that runtime becomes the
    /// background context for all I/O.
    pub async fn bootstrap(config: CoreConfig) -> Result<Self> {
        let api: Arc<dyn CatalogApi> = Arc::new(HttpCatalogApi::from_config(&config));
        Self::bootstrap_with_api(config, api).await
    }

    /// Build the core with an already constructed catalog client.
    pub async fn bootstrap_with_api(config: CoreConfig, api: Arc<dyn CatalogApi>) -> Result<Self> {
        if let Err(err) = init_logging(config.logging.clone()) {
            debug!(error = %err, "Keeping the installed tracing subscriber");
        }

        let context = BackgroundContext::current()?;

        let database_path = config.database_path.display().to_string();
        info!(
            api_base_url = %config.api_base_url,
            database = %strip_path(&database_path),
            "Bootstrapping catalog core"
        );

        let pool = create_pool(DatabaseConfig::new(&config.database_path))
            .await
            .map_err(|e| CoreError::InitializationFailed(format!("favorites database: {}", e)))?;

        let store: Arc<dyn FavoriteAlbumStore> =
            Arc::new(SqliteFavoriteAlbumStore::new(pool.clone()));

        let inner = CoreInner {
            favorites: FavoriteAlbumRepository::new(store, context.clone()),
            playlists: PlaylistRepository::new(Arc::clone(&api), context.clone()),
            feed: FeedRepository::new(api, context.clone()),
            config,
            context,
            pool,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.inner.config
    }

    pub fn favorites(&self) -> &FavoriteAlbumRepository {
        &self.inner.favorites
    }

    pub fn playlists(&self) -> &PlaylistRepository {
        &self.inner.playlists
    }

    pub fn feed(&self) -> &FeedRepository {
        &self.inner.feed
    }

    pub fn playlist_view_model(&self) -> PlaylistViewModel {
        PlaylistViewModel::new(
            self.inner.favorites.clone(),
            self.inner.playlists.clone(),
            self.inner.context.clone(),
        )
    }

    pub fn home_view_model(&self) -> HomeViewModel {
        HomeViewModel::new(self.inner.feed.clone(), self.inner.context.clone())
    }

    pub fn favorites_view_model(&self) -> FavoritesViewModel {
        FavoritesViewModel::new(&self.inner.favorites, self.inner.context.clone())
    }

    /// Store `album` as a favorite at startup, through the regular upsert path.
    ///
    /// ```ignore
    /// core.seed_favorite(
    ///     &Album::new(1, "Hexagonal").with_year("2008").with_artists("Leessang"),
    /// ).await?;
    /// ```
    pub async fn seed_favorite(&self, album: &Album) -> Result<()> {
        self.inner.favorites.favorite(album).await?;
        info!(album_id = %album.id, "Seeded favorite album");
        Ok(())
    }

    /// Close the database pool. Storage calls made afterwards fail.
    pub async fn shutdown(&self) {
        self.inner.pool.close().await;
        info!("Catalog core shut down");
    }
}
