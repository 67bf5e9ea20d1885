//! Catalog Server Abstractions
//!
//! Wire shapes served by the catalog HTTP API and the trait every catalog
//! client implements. The core converts these into its own domain models;
//! nothing here is persisted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Album as served by the catalog API
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemoteAlbum {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// Release year exactly as served (e.g. `"2008"`)
    #[serde(default)]
    pub year: String,
    /// Cover image URL
    #[serde(default)]
    pub cover: String,
    /// Display string of the artist list
    #[serde(default)]
    pub artists: String,
    #[serde(default)]
    pub description: String,
}

/// Titled grouping of albums on the home feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSection {
    pub section_title: String,
    #[serde(default)]
    pub albums: Vec<RemoteAlbum>,
}

/// One song of a playlist response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSong {
    #[serde(alias = "name")]
    pub title: String,
    /// Display duration as served (e.g. `"3:41"`)
    #[serde(alias = "length", default)]
    pub duration: String,
    /// 1-based track position, when the server provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    /// Stream URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyric: Option<String>,
}

/// Body of `GET playlist/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePlaylist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<RemoteAlbum>,
    #[serde(default)]
    pub songs: Vec<RemoteSong>,
}

/// Catalog server client
///
/// Implementations perform exactly one request per call. There is no retry
/// or backoff; transport, status and decoding failures are returned as
/// [`BridgeError`](crate::error::BridgeError).
///
/// # Example
///
/// ```ignore
/// use bridge_traits::catalog::CatalogApi;
///
/// async fn titles(api: &dyn CatalogApi) -> Result<Vec<String>> {
///     let sections = api.home_feed().await?;
///     Ok(sections.into_iter().map(|s| s.section_title).collect())
/// }
/// ```
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET feed`: the ordered home feed sections
    async fn home_feed(&self) -> Result<Vec<RemoteSection>>;

    /// `GET playlist/{album_id}`: album metadata plus its ordered songs
    async fn playlist(&self, album_id: i64) -> Result<RemotePlaylist>;
}
