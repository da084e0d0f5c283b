use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState) -> Router {
    let catalog_routes = Router::new()
        .route("/api/albums", get(handlers::albums::list_albums_handler))
        .route(
            "/api/albums/{album_id}",
            get(handlers::albums::get_album_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::resolve_request_context,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(catalog_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
