//! Fieldgate API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use fieldgate_application::CatalogService;
use fieldgate_core::AppError;
use fieldgate_infrastructure::InMemoryCatalogRepository;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let catalog_service = CatalogService::new(Arc::new(InMemoryCatalogRepository::new()))?;

    if config.seed_demo_data {
        dev_seed::run(&catalog_service).await?;
    }

    let app = api_router::build_router(AppState {
        catalog_service,
        user_header: config.user_header.clone(),
    });

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, user_header = %config.user_header, "fieldgate-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
