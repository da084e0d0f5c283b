use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use chrono::NaiveDate;
use fieldgate_core::AppResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Album identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlbumId(Uuid);

impl AlbumId {
    /// Creates a random album identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an album identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AlbumId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AlbumId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// One track of an album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Position on the album, starting at 1.
    pub order: u32,
    /// Track title.
    pub title: String,
    /// Duration in seconds.
    pub duration: u32,
}

/// Album stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Stable album id.
    pub album_id: AlbumId,
    /// Album title.
    pub album_name: String,
    /// Username of the recording artist.
    pub artist: String,
    /// Private recording notes, visible to the artist only.
    pub diary: String,
    /// Release date.
    pub release_date: NaiveDate,
    /// Retail price.
    pub price: Decimal,
    /// Tracks in album order.
    pub tracks: Vec<Track>,
}

/// Repository port for catalog albums.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Inserts or replaces an album.
    async fn save_album(&self, album: Album) -> AppResult<()>;

    /// Lists every album ordered by name.
    async fn list_albums(&self) -> AppResult<Vec<Album>>;

    /// Finds an album by id.
    async fn find_album(&self, album_id: AlbumId) -> AppResult<Option<Album>>;
}
