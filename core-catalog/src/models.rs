//! Domain models for the catalog
//!
//! Albums are the only persisted entity (as favorites). Sections, songs and
//! playlists are transient values fetched per screen visit.

use bridge_traits::{RemoteAlbum, RemotePlaylist, RemoteSection, RemoteSong};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

// =============================================================================
// ID Types
// =============================================================================

/// Catalog-assigned album identifier
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct AlbumId(pub i64);

impl From<i64> for AlbumId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Album
// =============================================================================

/// A catalog album. A row in `favorite_album` means it is favorited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    /// Release year exactly as served
    pub year: String,
    /// Cover image URL
    pub cover: String,
    /// Display string of the artist list
    pub artists: String,
    pub description: String,
}

impl Album {
    pub fn new(id: impl Into<AlbumId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Placeholder shown before any album is selected (id 0, empty strings)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = cover.into();
        self
    }

    pub fn with_artists(mut self, artists: impl Into<String>) -> Self {
        self.artists = artists.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl From<RemoteAlbum> for Album {
    fn from(remote: RemoteAlbum) -> Self {
        Self {
            id: AlbumId(remote.id),
            name: remote.name,
            year: remote.year,
            cover: remote.cover,
            artists: remote.artists,
            description: remote.description,
        }
    }
}

// =============================================================================
// Feed
// =============================================================================

/// Titled grouping of albums on the home feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub section_title: String,
    pub albums: Vec<Album>,
}

impl From<RemoteSection> for Section {
    fn from(remote: RemoteSection) -> Self {
        Self {
            section_title: remote.section_title,
            albums: remote.albums.into_iter().map(Album::from).collect(),
        }
    }
}

// =============================================================================
// Playlist
// =============================================================================

/// One song of an album's playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    /// Display duration as served (e.g. `"3:41"`)
    pub duration: String,
    /// 1-based track position
    pub position: u32,
    pub src: Option<String>,
    pub lyric: Option<String>,
}

impl Song {
    pub fn new(title: impl Into<String>, duration: impl Into<String>, position: u32) -> Self {
        Self {
            title: title.into(),
            duration: duration.into(),
            position,
            src: None,
            lyric: None,
        }
    }
}

/// An album plus its ordered songs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub album: Album,
    pub songs: Vec<Song>,
}

impl Playlist {
    /// Convert a playlist response for `requested`.
    ///
    /// Songs without a position take their 1-based list index. A response
    /// without album metadata gets a placeholder carrying the requested id.
    pub fn from_remote(requested: AlbumId, remote: RemotePlaylist) -> Self {
        let album = remote
            .album
            .map(Album::from)
            .unwrap_or_else(|| Album {
                id: requested,
                ..Album::empty()
            });

        let songs = remote
            .songs
            .into_iter()
            .enumerate()
            .map(|(index, song)| song_from_remote(index, song))
            .collect();

        Self { album, songs }
    }
}

fn song_from_remote(index: usize, remote: RemoteSong) -> Song {
    let fallback = u32::try_from(index + 1).unwrap_or(u32::MAX);
    Song {
        title: remote.title,
        duration: remote.duration,
        position: remote.position.unwrap_or(fallback),
        src: remote.src,
        lyric: remote.lyric,
    }
}
