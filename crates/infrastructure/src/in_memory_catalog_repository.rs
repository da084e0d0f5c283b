use std::collections::HashMap;

use async_trait::async_trait;
use fieldgate_application::{Album, AlbumId, CatalogRepository};
use fieldgate_core::AppResult;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory catalog repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryCatalogRepository {
    albums: RwLock<HashMap<AlbumId, Album>>,
}

impl InMemoryCatalogRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            albums: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn save_album(&self, album: Album) -> AppResult<()> {
        let replaced = self
            .albums
            .write()
            .await
            .insert(album.album_id, album)
            .is_some();

        debug!(replaced, "stored album");
        Ok(())
    }

    async fn list_albums(&self) -> AppResult<Vec<Album>> {
        let albums = self.albums.read().await;

        let mut values: Vec<Album> = albums.values().cloned().collect();
        values.sort_by(|left, right| {
            left.album_name
                .cmp(&right.album_name)
                .then_with(|| left.album_id.cmp(&right.album_id))
        });

        Ok(values)
    }

    async fn find_album(&self, album_id: AlbumId) -> AppResult<Option<Album>> {
        Ok(self.albums.read().await.get(&album_id).cloned())
    }
}

#[cfg(test)]
mod tests;
