use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::{HeaderName, StatusCode};
use axum::response::IntoResponse;
use fieldgate_application::CatalogService;
use fieldgate_core::{AppError, RequestContext, RequestUser};
use fieldgate_infrastructure::InMemoryCatalogRepository;
use serde_json::json;
use uuid::Uuid;

use crate::dev_seed;
use crate::state::AppState;

use super::{get_album_handler, list_albums_handler};

async fn seeded_state() -> AppState {
    let catalog_service = CatalogService::new(Arc::new(InMemoryCatalogRepository::new()))
        .unwrap_or_else(|_| unreachable!());
    assert!(dev_seed::run(&catalog_service).await.is_ok());

    AppState {
        catalog_service,
        user_header: HeaderName::from_static("x-forwarded-user"),
    }
}

fn signed_in(username: &str) -> RequestContext {
    RequestContext::for_user(RequestUser::authenticated(username, username, None))
}

fn first_album_id() -> Uuid {
    dev_seed::demo_albums()
        .unwrap_or_else(|_| unreachable!())
        .first()
        .map(|album| album.album_id.as_uuid())
        .unwrap_or_else(|| unreachable!())
}

#[tokio::test]
async fn list_albums_scrubs_each_album_for_the_caller() {
    let state = seeded_state().await;

    let result = list_albums_handler(State(state), Extension(signed_in("nina"))).await;
    assert!(result.is_ok());
    let Json(albums) = result.unwrap_or_else(|_| unreachable!());

    assert_eq!(albums.len(), 2);
    assert_eq!(albums[0]["album_name"], json!("Harbour Lights"));
    assert!(albums[0].get("diary").is_none());
    assert_eq!(albums[1]["artist"], json!("nina"));
    assert!(albums[1].get("diary").is_some());
    assert_eq!(albums[1]["price"], json!("14.99"));
}

#[tokio::test]
async fn anonymous_caller_gets_public_fields_only() {
    let state = seeded_state().await;

    let result = get_album_handler(
        State(state),
        Extension(RequestContext::anonymous()),
        Path(first_album_id()),
    )
    .await;
    assert!(result.is_ok());
    let Json(album) = result.unwrap_or_else(|_| unreachable!());

    assert!(!album.contains_key("diary"));
    assert!(!album.contains_key("tracks"));
    assert_eq!(album.get("track_count"), Some(&json!(3)));
}

#[tokio::test]
async fn artist_gets_diary_and_tracks() {
    let state = seeded_state().await;

    let result = get_album_handler(
        State(state),
        Extension(signed_in("nina")),
        Path(first_album_id()),
    )
    .await;
    assert!(result.is_ok());
    let Json(album) = result.unwrap_or_else(|_| unreachable!());

    assert!(album.contains_key("diary"));
    assert_eq!(
        album.get("tracks").and_then(|tracks| tracks.as_array()).map(Vec::len),
        Some(3)
    );
}

#[tokio::test]
async fn unknown_album_maps_to_not_found_response() {
    let state = seeded_state().await;

    let result = get_album_handler(
        State(state),
        Extension(RequestContext::anonymous()),
        Path(Uuid::new_v4()),
    )
    .await;

    let error = result.err().unwrap_or_else(|| unreachable!());
    assert!(matches!(error.0, AppError::NotFound(_)));
    assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
}
