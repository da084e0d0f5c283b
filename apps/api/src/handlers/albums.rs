use axum::Json;
use axum::extract::{Extension, Path, State};
use fieldgate_application::AlbumId;
use fieldgate_core::RequestContext;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_albums_handler(
    State(state): State<AppState>,
    Extension(request): Extension<RequestContext>,
) -> ApiResult<Json<Vec<Value>>> {
    let albums = state.catalog_service.list_albums(&request).await?;
    Ok(Json(albums))
}

pub async fn get_album_handler(
    State(state): State<AppState>,
    Extension(request): Extension<RequestContext>,
    Path(album_id): Path<Uuid>,
) -> ApiResult<Json<Map<String, Value>>> {
    let album = state
        .catalog_service
        .get_album(&request, AlbumId::from_uuid(album_id))
        .await?;
    Ok(Json(album))
}

#[cfg(test)]
mod tests;
