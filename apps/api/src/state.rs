use axum::http::HeaderName;
use fieldgate_application::CatalogService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub catalog_service: CatalogService,
    pub user_header: HeaderName,
}
