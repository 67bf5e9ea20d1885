//! Favorite album store
//!
//! Data access for the `favorite_album` table. Row presence means the album
//! is favorited; inserts replace on conflict, so favoriting the same id twice
//! leaves one row carrying the later payload.

use crate::error::Result;
use crate::live::{live_query, ChangeTracker};
use crate::models::{Album, AlbumId};
use async_trait::async_trait;
use futures::stream::BoxStream;
use sqlx::{query, query_as, query_scalar, SqlitePool};
use tracing::debug;

/// Favorite album store interface
#[async_trait]
pub trait FavoriteAlbumStore: Send + Sync {
    /// Insert or replace the row keyed by `album.id`
    async fn insert(&self, album: &Album) -> Result<()>;

    /// Delete the row keyed by `album.id`
    ///
    /// # Returns
    /// - `Ok(true)` if a row was deleted
    /// - `Ok(false)` if the album was not a favorite
    async fn delete(&self, album: &Album) -> Result<bool>;

    /// Whether a row exists for `id`
    async fn exists(&self, id: AlbumId) -> Result<bool>;

    /// Every favorite, ordered by album id
    async fn all(&self) -> Result<Vec<Album>>;

    /// Live version of [`exists`](Self::exists)
    fn observe_exists(&self, id: AlbumId) -> BoxStream<'static, Result<bool>>;

    /// Live version of [`all`](Self::all)
    fn observe_all(&self) -> BoxStream<'static, Result<Vec<Album>>>;
}

/// SQLite implementation of FavoriteAlbumStore
#[derive(Clone)]
pub struct SqliteFavoriteAlbumStore {
    pool: SqlitePool,
    changes: ChangeTracker,
}

impl SqliteFavoriteAlbumStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            changes: ChangeTracker::new(),
        }
    }
}

#[async_trait]
impl FavoriteAlbumStore for SqliteFavoriteAlbumStore {
    async fn insert(&self, album: &Album) -> Result<()> {
        query(
            r#"
            INSERT OR REPLACE INTO favorite_album (id, name, year, cover, artists, description)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(album.id)
        .bind(&album.name)
        .bind(&album.year)
        .bind(&album.cover)
        .bind(&album.artists)
        .bind(&album.description)
        .execute(&self.pool)
        .await?;

        debug!(album_id = %album.id, "Favorite album stored");
        self.changes.notify();
        Ok(())
    }

    async fn delete(&self, album: &Album) -> Result<bool> {
        let result = query("DELETE FROM favorite_album WHERE id = ?")
            .bind(album.id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            debug!(album_id = %album.id, "Favorite album removed");
            self.changes.notify();
        }
        Ok(deleted)
    }

    async fn exists(&self, id: AlbumId) -> Result<bool> {
        let count = query_scalar::<_, i64>("SELECT COUNT(*) FROM favorite_album WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    async fn all(&self) -> Result<Vec<Album>> {
        let albums = query_as::<_, Album>(
            "SELECT id, name, year, cover, artists, description FROM favorite_album ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(albums)
    }

    fn observe_exists(&self, id: AlbumId) -> BoxStream<'static, Result<bool>> {
        let store = self.clone();
        live_query(&self.changes, move || {
            let store = store.clone();
            async move { store.exists(id).await }
        })
    }

    fn observe_all(&self) -> BoxStream<'static, Result<Vec<Album>>> {
        let store = self.clone();
        live_query(&self.changes, move || {
            let store = store.clone();
            async move { store.all().await }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use futures::StreamExt;

    async fn setup() -> SqliteFavoriteAlbumStore {
        let pool = create_test_pool().await.unwrap();
        SqliteFavoriteAlbumStore::new(pool)
    }

    fn hexagonal() -> Album {
        Album::new(1, "Hexagonal")
            .with_year("2008")
            .with_artists("Leessang")
            .with_cover("https://img/hexagonal.jpg")
    }

    #[tokio::test]
    async fn test_insert_and_exists() {
        let store = setup().await;
        assert!(!store.exists(AlbumId(1)).await.unwrap());

        store.insert(&hexagonal()).await.unwrap();
        assert!(store.exists(AlbumId(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_twice_keeps_one_row_with_latest_payload() {
        let store = setup().await;
        store.insert(&hexagonal()).await.unwrap();
        store
            .insert(&hexagonal().with_description("Remastered"))
            .await
            .unwrap();

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description, "Remastered");
    }

    #[tokio::test]
    async fn test_delete() {
        let store = setup().await;
        store.insert(&hexagonal()).await.unwrap();

        assert!(store.delete(&hexagonal()).await.unwrap());
        assert!(!store.delete(&hexagonal()).await.unwrap());
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_all_ordered_by_id() {
        let store = setup().await;
        store.insert(&Album::new(7, "Seven")).await.unwrap();
        store.insert(&Album::new(2, "Two")).await.unwrap();
        store.insert(&Album::new(5, "Five")).await.unwrap();

        let ids: Vec<i64> = store.all().await.unwrap().iter().map(|a| a.id.0).collect();
        assert_eq!(ids, vec![2, 5, 7]);
    }

    #[tokio::test]
    async fn test_round_trips_all_columns() {
        let store = setup().await;
        let album = hexagonal().with_description("Fifth studio album");
        store.insert(&album).await.unwrap();

        assert_eq!(store.all().await.unwrap(), vec![album]);
    }

    #[tokio::test]
    async fn test_observe_exists_follows_writes() {
        let store = setup().await;
        let mut stream = store.observe_exists(AlbumId(1));
        assert!(!stream.next().await.unwrap().unwrap());

        store.insert(&hexagonal()).await.unwrap();
        assert!(stream.next().await.unwrap().unwrap());

        store.delete(&hexagonal()).await.unwrap();
        assert!(!stream.next().await.unwrap().unwrap());
    }

    #[tokio::test]
    async fn test_observe_exists_ignores_other_albums() {
        let store = setup().await;
        let mut stream = store.observe_exists(AlbumId(1));
        assert!(!stream.next().await.unwrap().unwrap());

        store.insert(&Album::new(2, "Other")).await.unwrap();
        store.insert(&hexagonal()).await.unwrap();

        // The write to album 2 does not produce a duplicate `false`.
        assert!(stream.next().await.unwrap().unwrap());
    }

    #[tokio::test]
    async fn test_observe_all_follows_writes() {
        let store = setup().await;
        let mut stream = store.observe_all();
        assert!(stream.next().await.unwrap().unwrap().is_empty());

        store.insert(&hexagonal()).await.unwrap();
        let albums = stream.next().await.unwrap().unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].id, AlbumId(1));

        store.delete(&hexagonal()).await.unwrap();
        assert!(stream.next().await.unwrap().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_and_ends_live_query() {
        let store = setup().await;
        sqlx::query("DROP TABLE favorite_album")
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(store.insert(&hexagonal()).await.is_err());

        let mut stream = store.observe_all();
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_persists_across_pools() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spotify_db");

        {
            let pool = crate::db::create_pool(crate::db::DatabaseConfig::new(&path))
                .await
                .unwrap();
            SqliteFavoriteAlbumStore::new(pool.clone())
                .insert(&hexagonal())
                .await
                .unwrap();
            pool.close().await;
        }

        let pool = crate::db::create_pool(crate::db::DatabaseConfig::new(&path))
            .await
            .unwrap();
        let store = SqliteFavoriteAlbumStore::new(pool);
        assert!(store.exists(AlbumId(1)).await.unwrap());
    }
}
