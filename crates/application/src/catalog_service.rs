use std::sync::Arc;

use fieldgate_core::{AppError, AppResult, RequestContext};
use fieldgate_domain::{ListOptions, ListSerializer, Serializer, SerializerContext};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{Album, AlbumId, CatalogRepository, album_serializer};

/// Application service rendering catalog albums for one request.
#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn CatalogRepository>,
    album: Arc<Serializer<Album>>,
    albums: Arc<ListSerializer<Album>>,
}

impl CatalogService {
    /// Creates a catalog service from a repository implementation.
    pub fn new(repository: Arc<dyn CatalogRepository>) -> AppResult<Self> {
        Ok(Self {
            repository,
            album: Arc::new(album_serializer()?),
            albums: Arc::new(album_serializer()?.many(ListOptions::default())),
        })
    }

    /// Stores an album.
    pub async fn save_album(&self, album: Album) -> AppResult<()> {
        if album.album_name.trim().is_empty() {
            return Err(AppError::Validation(
                "album_name must not be empty".to_owned(),
            ));
        }

        info!(album_id = %album.album_id, artist = %album.artist, "saving album");
        self.repository.save_album(album).await
    }

    /// Lists every album as seen by `request`.
    pub async fn list_albums(&self, request: &RequestContext) -> AppResult<Vec<Value>> {
        let albums = self.repository.list_albums().await?;
        let context = SerializerContext::with_request(request.clone());
        let rendered = self.albums.to_representation(&albums, &context)?;

        debug!(
            albums = albums.len(),
            rendered = rendered.len(),
            "rendered album list"
        );
        Ok(rendered)
    }

    /// Renders one album as seen by `request`.
    pub async fn get_album(
        &self,
        request: &RequestContext,
        album_id: AlbumId,
    ) -> AppResult<Map<String, Value>> {
        let album = self
            .repository
            .find_album(album_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("album '{album_id}' does not exist")))?;

        let context = SerializerContext::with_request(request.clone());
        self.album.to_representation(&album, &context)
    }
}
